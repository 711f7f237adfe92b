use std::ffi::OsString;
use std::fs;
use std::path::Path;

use fnv::FnvHashMap;
use log::{debug, warn};

use crate::config::SyncInfo;
use crate::error::{DescribeIoError, SyncError};
use crate::report::{ActionKind, ActionReason, EventSink, SyncAction, SyncReport};
use crate::state::EntryKind;

/// Pass 2: walks the replica tree and removes every entry that no longer has
/// a counterpart of the same kind in the source.
///
/// Each directory's children are snapshotted before anything in it is
/// deleted, and a deleted directory is never descended into afterwards, so
/// the walk stays clear of its own mutations.
pub fn prune<S: EventSink>(
    config: &SyncInfo,
    sink: &S,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    prune_directory(config, Path::new(""), sink, report)
}

fn prune_directory<S: EventSink>(
    config: &SyncInfo,
    relative_dir: &Path,
    sink: &S,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    let replica_dir = config.replica.join(relative_dir);
    let source_dir = config.source.join(relative_dir);

    // one listing of the source level answers every membership question below
    let source_children = read_children(&source_dir)?;
    let replica_children = read_children(&replica_dir)?;

    for (name, kind) in replica_children {
        let relative = relative_dir.join(&name);
        if config.ignore.is_ignored(&relative) {
            debug!("Ignoring entry {:?}", relative);
            continue;
        }

        let expected = source_children
            .get(&name)
            .copied()
            .unwrap_or(EntryKind::Missing);
        let absolute = replica_dir.join(&name);

        match kind {
            EntryKind::Directory => {
                if expected == EntryKind::Directory {
                    prune_directory(config, &relative, sink, report)?;
                } else {
                    debug!("Removing directory {:?}", absolute);
                    match fs::remove_dir_all(&absolute) {
                        Ok(()) => report.record(
                            sink,
                            SyncAction {
                                kind: ActionKind::DeletedDir,
                                path: relative,
                                reason: ActionReason::AbsentInSource,
                            },
                        ),
                        Err(e) => {
                            warn!("Leaving directory {:?} behind: {}", relative, e);
                            report.statistics.entries_skipped += 1;
                        }
                    }
                }
            }
            EntryKind::File => {
                if expected != EntryKind::File {
                    debug!("Removing file {:?}", absolute);
                    match fs::remove_file(&absolute) {
                        Ok(()) => report.record(
                            sink,
                            SyncAction {
                                kind: ActionKind::DeletedFile,
                                path: relative,
                                reason: ActionReason::AbsentInSource,
                            },
                        ),
                        Err(e) => {
                            warn!("Leaving file {:?} behind: {}", relative, e);
                            report.statistics.entries_skipped += 1;
                        }
                    }
                }
            }
            EntryKind::Missing => {}
        }
    }

    Ok(())
}

/// Reads the immediate children of `directory` into a map from name to
/// entry kind. A directory that does not exist yields an empty map.
fn read_children(directory: &Path) -> Result<FnvHashMap<OsString, EntryKind>, SyncError> {
    let mut children = FnvHashMap::default();
    if !directory.is_dir() {
        return Ok(children);
    }
    for entry in fs::read_dir(directory).describe(|| format!("while listing {:?}", directory))? {
        let entry = entry.describe(|| format!("while listing {:?}", directory))?;
        let kind = if entry.file_type()?.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        children.insert(entry.file_name(), kind);
    }
    Ok(children)
}

use std::fs::{self, File};
use std::path::Path;

use log::{debug, trace, warn};
use walkdir::WalkDir;

use crate::config::SyncInfo;
use crate::error::{DescribeIoError, SyncError};
use crate::fingerprint::fingerprint;
use crate::report::{ActionKind, ActionReason, EventSink, SyncAction, SyncReport};
use crate::state::EntryKind;

/// Pass 1: walks the source tree and creates or refreshes every entry in the
/// replica.
///
/// Parent directories are visited before their contents, so a target
/// directory always exists by the time the files inside it are compared.
/// A failure on a single file is logged and skipped; a failure to create a
/// directory or to keep walking aborts the pass, since everything below that
/// point would fail anyway.
pub fn propagate<S: EventSink>(
    config: &SyncInfo,
    sink: &S,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    let walker = WalkDir::new(&config.source)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            let relative = entry
                .path()
                .strip_prefix(&config.source)
                .unwrap_or_else(|_| entry.path());
            if config.ignore.is_ignored(relative) {
                debug!("Ignoring entry {:?}", relative);
                false
            } else {
                true
            }
        });

    for entry in walker {
        let entry = entry?;
        let relative = entry.path().strip_prefix(&config.source).unwrap_or_else(|_| {
            panic!(
                "couldn't strip prefix {:?} from {:?}",
                config.source,
                entry.path()
            )
        });
        let target = config.replica.join(relative);

        if entry.file_type().is_dir() {
            propagate_directory(&target, relative, sink, report)?;
        } else if let Err(e) = propagate_file(entry.path(), &target, relative, sink, report) {
            warn!("Skipping file {:?}: {}", relative, e);
            report.statistics.entries_skipped += 1;
        }
    }

    Ok(())
}

/// Makes sure a directory from the source exists in the replica, clearing
/// out a file that stands in its way first.
fn propagate_directory<S: EventSink>(
    target: &Path,
    relative: &Path,
    sink: &S,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    match EntryKind::from(target) {
        EntryKind::Directory => {}
        EntryKind::File => {
            debug!("File {:?} stands where a directory belongs", relative);
            fs::remove_file(target).describe(|| format!("while removing file {:?}", target))?;
            report.record(sink, action(ActionKind::DeletedFile, relative, ActionReason::KindMismatch));
            fs::create_dir(target).describe(|| format!("while creating directory {:?}", target))?;
            report.record(sink, action(ActionKind::CreatedDir, relative, ActionReason::MissingInReplica));
        }
        EntryKind::Missing => {
            fs::create_dir_all(target).describe(|| format!("while creating directory {:?}", target))?;
            report.record(sink, action(ActionKind::CreatedDir, relative, ActionReason::MissingInReplica));
        }
    }
    Ok(())
}

/// Brings one replica file up to date with its source counterpart.
///
/// An existing replica file is only rewritten when the content fingerprints
/// differ, so an already-converged file causes no filesystem operation at
/// all.
fn propagate_file<S: EventSink>(
    source: &Path,
    target: &Path,
    relative: &Path,
    sink: &S,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    match EntryKind::from(target) {
        EntryKind::Missing => {
            copy_file(source, target)?;
            report.record(sink, action(ActionKind::CopiedFile, relative, ActionReason::MissingInReplica));
        }
        EntryKind::File => {
            if fingerprint(source)? != fingerprint(target)? {
                copy_file(source, target)?;
                report.record(sink, action(ActionKind::CopiedFile, relative, ActionReason::ContentMismatch));
            } else {
                trace!("{:?} is unchanged", relative);
                report.statistics.files_unchanged += 1;
            }
        }
        EntryKind::Directory => {
            debug!("Directory {:?} stands where a file belongs", relative);
            fs::remove_dir_all(target).describe(|| format!("when removing directory {:?}", target))?;
            report.record(sink, action(ActionKind::DeletedDir, relative, ActionReason::KindMismatch));
            copy_file(source, target)?;
            report.record(sink, action(ActionKind::CopiedFile, relative, ActionReason::MissingInReplica));
        }
    }
    Ok(())
}

/// Copies `source` over `target`, carrying the modification time across.
fn copy_file(source: &Path, target: &Path) -> Result<(), SyncError> {
    debug!("Copying {:?} to {:?}", source, target);
    fs::copy(source, target)
        .describe(|| format!("while copying {:?} to {:?}", source, target))?;
    let modified = fs::metadata(source)
        .and_then(|metadata| metadata.modified())
        .describe(|| format!("while reading the modification time of {:?}", source))?;
    File::options()
        .write(true)
        .open(target)
        .and_then(|file| file.set_modified(modified))
        .describe(|| format!("while carrying the modification time over to {:?}", target))?;
    Ok(())
}

fn action(kind: ActionKind, path: &Path, reason: ActionReason) -> SyncAction {
    SyncAction {
        kind,
        path: path.to_path_buf(),
        reason,
    }
}

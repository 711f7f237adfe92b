use std::fs;

use log::{info, warn};

use crate::config::SyncInfo;
use crate::error::{DescribeIoError, SyncError};
use crate::report::{EventSink, SyncReport};
use crate::{propagate, prune};

/// Makes the replica tree an exact mirror of the source tree.
///
/// Two passes run over the trees: first every directory and file in the
/// source is propagated into the replica, then every replica entry without a
/// source counterpart is pruned. Propagation always fully completes before
/// pruning begins, so a rename in the source is realized as copy-then-delete
/// and the data is never absent from both names at once.
///
/// A missing source root is not an error: a warning is logged and an empty
/// report is returned, leaving the replica untouched until the root
/// reappears (it may live on a removable volume). A missing replica root is
/// created before the passes run.
///
/// The pass holds no state between invocations; re-running on an
/// already-converged pair performs zero copies and zero deletions.
pub fn synchronize<S: EventSink>(config: &SyncInfo, sink: &S) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    if !config.source.is_dir() {
        warn!(
            "Source {:?} does not exist, skipping this pass",
            config.source
        );
        return Ok(report);
    }

    if !config.replica.is_dir() {
        info!("Creating replica root {:?}", config.replica);
        fs::create_dir_all(&config.replica)
            .describe(|| format!("while creating replica root {:?}", config.replica))?;
    }

    propagate::propagate(config, sink, &mut report)?;
    prune::prune(config, sink, &mut report)?;

    Ok(report)
}

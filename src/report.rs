use std::fmt;
use std::path::PathBuf;

/// One filesystem operation applied to the replica tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncAction {
    pub kind: ActionKind,
    /// The path the action touched, relative to the tree roots.
    pub path: PathBuf,
    pub reason: ActionReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    CreatedDir,
    CopiedFile,
    DeletedFile,
    DeletedDir,
}

/// Why an action was taken on a replica entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionReason {
    /// The entry exists in the source tree but not in the replica.
    MissingInReplica,
    /// Both trees hold a file at this path but the contents differ.
    ContentMismatch,
    /// The replica entry has no counterpart in the source tree.
    AbsentInSource,
    /// Both trees hold this path but as different kinds of entry.
    KindMismatch,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {:?} ({})", self.kind, self.path, self.reason)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ActionKind::CreatedDir => "Created directory",
            ActionKind::CopiedFile => "Copied file",
            ActionKind::DeletedFile => "Deleted file",
            ActionKind::DeletedDir => "Deleted directory",
        })
    }
}

impl fmt::Display for ActionReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ActionReason::MissingInReplica => "missing in replica",
            ActionReason::ContentMismatch => "content mismatch",
            ActionReason::AbsentInSource => "absent in source",
            ActionReason::KindMismatch => "kind mismatch",
        })
    }
}

/// Basic statistics about the work a pass performed beyond its actions.
#[derive(Debug, Default)]
pub struct SyncStatistics {
    /// Files present in both trees whose fingerprints already matched.
    pub files_unchanged: usize,
    /// Entries whose operation failed in isolation and was skipped.
    pub entries_skipped: usize,
}

/// The result of one complete synchronization pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Every action applied to the replica, in application order.
    pub actions: Vec<SyncAction>,
    pub statistics: SyncStatistics,
}

impl SyncReport {
    /// Forwards an action to the sink and keeps it for the report.
    pub(crate) fn record<S: EventSink>(&mut self, sink: &S, action: SyncAction) {
        sink.record(&action);
        self.actions.push(action);
    }
}

/// Receives each action as soon as it has been applied to the replica.
///
/// The reconciler has no log destination of its own; the caller decides
/// where recorded events end up.
pub trait EventSink {
    fn record(&self, action: &SyncAction);
}

/// An `EventSink` that discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _: &SyncAction) {}
}

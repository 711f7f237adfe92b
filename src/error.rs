use std::fmt;
use std::io;
use walkdir::Error as WalkDirError;

#[derive(Debug)]
pub enum SyncError {
    IoError(io::Error),
    /// An io error annotated with what the reconciler was doing at the time.
    Described(String, io::Error),
    WalkDirError(WalkDirError),
}

impl From<io::Error> for SyncError {
    fn from(e: io::Error) -> Self {
        SyncError::IoError(e)
    }
}

impl From<WalkDirError> for SyncError {
    fn from(e: WalkDirError) -> Self {
        SyncError::WalkDirError(e)
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SyncError::IoError(ref io) => write!(f, "io error: {}", io),
            SyncError::Described(ref what, ref io) => write!(f, "io error {}: {}", what, io),
            SyncError::WalkDirError(ref e) => write!(f, "walk dir error: {}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::IoError(e) | SyncError::Described(_, e) => Some(e),
            SyncError::WalkDirError(e) => Some(e),
        }
    }
}

/// Attaches a description of the operation that failed to an io error.
pub trait DescribeIoError<T> {
    fn describe<F>(self, what: F) -> Result<T, SyncError>
    where
        F: FnOnce() -> String;
}

impl<T> DescribeIoError<T> for io::Result<T> {
    fn describe<F>(self, what: F) -> Result<T, SyncError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SyncError::Described(what(), e))
    }
}

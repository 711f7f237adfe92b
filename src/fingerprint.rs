use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::trace;

use crate::error::{DescribeIoError, SyncError};

/// Number of bytes fed into the digest per read. Keeps peak memory flat no
/// matter how large the file is.
const CHUNK_SIZE: usize = 4096;

/// A content-derived digest of a file.
///
/// Two files are considered equal iff their fingerprints are bit-identical;
/// timestamps and other metadata play no part in the comparison.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(md5::Digest);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Fingerprint({:x})", self.0)
    }
}

/// Computes the fingerprint of the file at `path` by streaming its contents
/// through an incremental digest.
///
/// A failure to open or read the file propagates to the caller, which must
/// treat the comparison as undecided rather than assuming equality either
/// way.
pub fn fingerprint(path: &Path) -> Result<Fingerprint, SyncError> {
    trace!("Fingerprinting {:?}", path);
    let mut file = File::open(path).describe(|| format!("while opening {:?} for hashing", path))?;
    let mut context = md5::Context::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let read = file
            .read(&mut chunk)
            .describe(|| format!("while hashing {:?}", path))?;
        if read == 0 {
            break;
        }
        context.consume(&chunk[..read]);
    }
    Ok(Fingerprint(context.compute()))
}

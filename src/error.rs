//! Error taxonomy surfaced through the public API.

use std::fmt;

/// The kinds of failure a store operation can report.
#[derive(Debug)]
pub enum Error {
    /// `get`/`delete` of a key that isn't in the index.
    NotFound,
    /// Malformed header, incompatible version, or a truncation the loader
    /// can't safely treat as a recoverable crash tail.
    Load(String),
    /// A record's CRC-32 didn't match on a checksum-verified read.
    Checksum,
    /// A mutating operation was attempted on a read-only handle.
    ReadOnly,
    /// `open` was called with an unrecognized mode value.
    InvalidMode(String),
    /// An underlying OS I/O failure (open, read, write, fsync, rename, unlink).
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "key not found"),
            Error::Load(msg) => write!(f, "error loading db: {msg}"),
            Error::Checksum => write!(f, "corrupt data detected: invalid checksum"),
            Error::ReadOnly => write!(f, "can't modify: db opened in read-only mode"),
            Error::InvalidMode(mode) => write!(f, "invalid open mode: {mode}"),
            Error::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! An embedded, single-process, append-only key-value store: a data log,
//! an in-memory index rebuilt from it at open time, and the compaction
//! procedure that reclaims space from superseded and deleted records.

mod bitcask;
mod index;
mod loader;
mod log;
mod rename;

pub use bitcask::Store;
pub use loader::LoaderKind;

/// How a store's directory is expected to look, and what's allowed on the
/// resulting handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The directory and its `data` file must already exist. The returned
    /// handle rejects all mutating operations.
    Read,
    /// The directory must exist and `data` must be a regular file.
    /// Mutating operations are allowed.
    ReadWrite,
    /// The directory and `data` are created if missing. Mutating
    /// operations are allowed.
    Create,
    /// Any existing `data` in the directory is removed, then behaves as
    /// [`Mode::Create`].
    New,
}

/// Compaction-on-open thresholds, mirroring what a bitcask-style engine
/// checks before deciding a log is worth rewriting immediately.
#[derive(Debug, Clone, Copy)]
pub struct AutoCompact {
    /// Minimum fraction of the file that must be garbage.
    pub min_ratio: f64,
    /// Minimum absolute number of garbage bytes, regardless of ratio.
    pub min_bytes: u64,
}

/// Options controlling a store handle. Constructed in-process by the
/// caller; no external config-file format is read here (that's the hosting
/// program's concern).
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Verify each read's CRC-32 against the stored value, failing the read
    /// with a checksum error on mismatch. Costs an extra 4-byte read per
    /// `get`.
    pub verify_checksums: bool,
    /// Which index-loader implementation to use when rebuilding the index
    /// at open time.
    pub loader: LoaderKind,
    /// If set, `open` compacts immediately when the garbage ratio/size
    /// thresholds are exceeded.
    pub auto_compact: Option<AutoCompact>,
}

impl std::str::FromStr for Mode {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "read" => Ok(Mode::Read),
            "read_write" => Ok(Mode::ReadWrite),
            "create" => Ok(Mode::Create),
            "new" => Ok(Mode::New),
            other => Err(crate::error::Error::InvalidMode(other.to_string())),
        }
    }
}

/// A snapshot of a store's on-disk footprint, used to decide whether
/// compaction is worthwhile.
#[derive(Debug, Clone)]
pub struct Status {
    pub keys: u64,
    /// Sum of live key and value bytes, excluding record framing.
    pub live_size: u64,
    /// Total size of the data file on disk.
    pub total_disk_size: u64,
    /// Bytes occupied by live records, including framing.
    pub live_disk_size: u64,
    /// Bytes that compaction would reclaim.
    pub garbage_disk_size: u64,
}

//! Index-loader abstraction: given a data-file path, rebuild the in-memory
//! index by scanning the log from start to end, tolerating a truncated tail
//! left by a crashed write. Two interchangeable implementations are
//! provided, selected per store via [`LoaderKind`].

mod mmap;
mod streaming;

pub use mmap::MmapLoader;
pub use streaming::StreamingLoader;

use crate::error::Result;
use crate::storage::index::Index;
use std::path::Path;

/// Which [`IndexLoader`] implementation a store uses to rebuild its index
/// at open time.
///
/// The two loaders differ only in mechanism, not in policy: both stop
/// cleanly, without error, on any truncated tail left by a crashed write —
/// a partial record header, a record whose length fields run past
/// end-of-file, or a missing trailing checksum — per the universal
/// crash-tail invariant in the store's design notes. Both still raise a
/// load error for a bad header (wrong magic or incompatible version) and
/// for record-length fields that are structurally invalid (e.g. a
/// nonpositive key length) rather than merely truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderKind {
    /// Memory-mapped, windowed scan. Well suited to large files since it
    /// avoids copying record bytes before they're inserted into the index.
    #[default]
    Mmap,
    /// Buffered sequential scan. Simpler and avoids mmap's address-space
    /// and platform-specific quirks at the cost of touching every record's
    /// bytes through a userspace buffer.
    Streaming,
}

impl LoaderKind {
    /// Scans the data file at `path`, returning the rebuilt index and the
    /// byte offset scanning stopped at (the log should be truncated to this
    /// offset if it's short of the file's actual length).
    pub fn load(self, path: &Path) -> Result<(Index, u64)> {
        match self {
            LoaderKind::Mmap => MmapLoader.load(path),
            LoaderKind::Streaming => StreamingLoader.load(path),
        }
    }
}

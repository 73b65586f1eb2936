//! Atomic rename helper used by compaction to swap a freshly written data
//! file in for the active one. Two strategies are selected at build time;
//! see the Open Questions resolution in DESIGN.md for why both reduce to
//! `std::fs::rename` today.

use crate::error::Result;
use std::path::Path;

/// Atomically replaces `to` with `from`, as if `from` had always been named
/// `to`. A crash during the call is resolved by the OS's rename atomicity
/// guarantee: observers see either the old or the new file, never a torn
/// mix of both, and never "no file at all".
#[cfg(unix)]
pub fn replace_file(from: &Path, to: &Path) -> Result<()> {
    // POSIX rename(2) atomically replaces an existing destination.
    std::fs::rename(from, to)?;
    Ok(())
}

#[cfg(windows)]
pub fn replace_file(from: &Path, to: &Path) -> Result<()> {
    // Older Windows APIs required a Renamer that swapped the destination
    // out of the way via a `.tmprename` sidecar before moving `from` into
    // place (the strategy semidbm's `_WindowsRenamer` used, since plain
    // `MoveFile` refused to overwrite an existing destination). Rust's
    // `std::fs::rename` already calls `MoveFileExW` with
    // `MOVEFILE_REPLACE_EXISTING`, so it provides the same atomic
    // replace-over semantics natively and no sidecar dance is needed here.
    std::fs::rename(from, to)?;
    Ok(())
}

//! The in-memory index: key bytes to the live value's position in the log.

use std::collections::BTreeMap;

/// Maps a key to the absolute offset and size of its live value in the log
/// file. Tombstones never appear here. A `BTreeMap` gives compaction a
/// deterministic key order; the store makes no iteration-order guarantee
/// beyond that implementation detail.
pub type Index = BTreeMap<Vec<u8>, (u64, u32)>;

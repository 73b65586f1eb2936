//! Memory-mapped index loader. Maps a sliding window of the data file so
//! that even on platforms with limited address space a single scan never
//! needs to map the whole file at once, remapping forward once the cursor
//! crosses the window boundary. Every kind of truncated tail — a partial
//! header, a partial key, or a missing trailing checksum — is treated as
//! the end of the log rather than a load error, matching
//! [`super::StreamingLoader`]; the two loaders are interchangeable
//! strategies a store picks one of at open time (see [`super::LoaderKind`]).

use crate::error::{Error, Result};
use crate::storage::index::Index;
use crate::storage::log::{HEADER_LEN, MAGIC, TOMBSTONE, VERSION_MAJOR};

use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::Path;

/// Number of allocation-granularity pages held in one mapping window.
const WINDOW_PAGES: u64 = 300;

pub struct MmapLoader;

impl MmapLoader {
    pub fn load(&self, path: &Path) -> Result<(Index, u64)> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        if file_len < HEADER_LEN {
            return Err(Error::Load("truncated file header".into()));
        }

        let window_size = allocation_granularity() * WINDOW_PAGES;
        let mut window = Window::new(&file, 0, window_size.min(file_len))?;
        verify_header(window.bytes(0, HEADER_LEN as usize)?)?;

        let mut index = Index::new();
        let mut pos = HEADER_LEN;

        loop {
            if pos + 8 > file_len {
                break; // fewer than 8 bytes remain: clean crash-tail stop
            }
            window.ensure(&file, pos, pos + 8, window_size, file_len)?;
            let header = window.bytes(pos, 8)?;
            let key_len = i32::from_be_bytes(header[0..4].try_into().unwrap());
            let value_len_field = i32::from_be_bytes(header[4..8].try_into().unwrap());
            if key_len <= 0 || value_len_field < TOMBSTONE {
                return Err(Error::Load(format!(
                    "malformed record header at offset {pos}"
                )));
            }
            let value_len = if value_len_field == TOMBSTONE {
                0
            } else {
                value_len_field as u64
            };
            let record_len = 8 + key_len as u64 + value_len + 4;
            if pos + record_len > file_len {
                break; // record (or its trailing checksum) doesn't fully fit
            }

            window.ensure(&file, pos, pos + record_len, window_size, file_len)?;
            let key_start = pos + 8;
            let key = window.bytes(key_start, key_len as usize)?.to_vec();
            let value_offset = pos + 8 + key_len as u64;

            if value_len_field == TOMBSTONE {
                index.remove(&key);
            } else {
                index.insert(key, (value_offset, value_len_field as u32));
            }

            pos += record_len;
        }

        Ok((index, pos))
    }
}

fn verify_header(header: &[u8]) -> Result<()> {
    if header[..4] != MAGIC {
        return Err(Error::Load("not a semidb data file (bad magic)".into()));
    }
    let major = u16::from_be_bytes([header[4], header[5]]);
    if major != VERSION_MAJOR {
        return Err(Error::Load(format!(
            "incompatible file version (got v{major}, can handle v{VERSION_MAJOR})"
        )));
    }
    Ok(())
}

/// A single mmap'd slice of the data file, rebased at `base`.
struct Window {
    map: Mmap,
    base: u64,
}

impl Window {
    /// Maps exactly `len` bytes of `file` starting at `base`. `base` must be
    /// a multiple of the platform's allocation granularity.
    fn new(file: &File, base: u64, len: u64) -> Result<Self> {
        // SAFETY: the data file is only ever appended to by this process
        // for the lifetime of this read-only mapping; concurrent external
        // mutation of the store directory is undefined behavior per the
        // store's single-writer concurrency model.
        let map = unsafe {
            MmapOptions::new()
                .offset(base)
                .len(len as usize)
                .map(file)?
        };
        Ok(Self { map, base })
    }

    fn bytes(&self, pos: u64, len: usize) -> Result<&[u8]> {
        let start = (pos - self.base) as usize;
        self.map.get(start..start + len).ok_or_else(|| {
            Error::Load("index loader requested bytes outside the mapped window".into())
        })
    }

    /// Remaps, if necessary, so that the current window covers `[pos, end)`.
    /// When a single record is larger than one window, the new window grows
    /// to cover it; the map length always stops exactly at end-of-file to
    /// avoid platform-specific zero-length mmap bugs when remapping near
    /// the tail.
    fn ensure(
        &mut self,
        file: &File,
        pos: u64,
        end: u64,
        window_size: u64,
        file_len: u64,
    ) -> Result<()> {
        if pos >= self.base && end <= self.base + self.map.len() as u64 {
            return Ok(());
        }
        let granularity = allocation_granularity();
        let new_base = (pos / granularity) * granularity;
        let needed = end - new_base;
        let new_len = needed.max(window_size).min(file_len - new_base);
        *self = Window::new(file, new_base, new_len)?;
        Ok(())
    }
}

/// The platform's mmap allocation granularity (the alignment required of a
/// mapping's file offset): the page size on POSIX systems, 64 KiB on
/// Windows.
fn allocation_granularity() -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf with a valid, universally supported name never
        // fails in a way that matters here.
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size > 0 {
            page_size as u64
        } else {
            4096
        }
    }
    #[cfg(not(unix))]
    {
        65536
    }
}

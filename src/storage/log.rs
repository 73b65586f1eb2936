//! The append-only data log: file header, record codec, and the writer
//! that owns the single read/write file descriptor for a store.

use crate::error::{Error, Result};

use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

/// 4-byte magic identifying a semidb data file.
pub const MAGIC: [u8; 4] = *b"SEMI";
pub const VERSION_MAJOR: u16 = 1;
pub const VERSION_MINOR: u16 = 1;
/// Size of the fixed file header: magic + major + minor, all big-endian.
pub const HEADER_LEN: u64 = 8;
/// Value-length sentinel marking a tombstone (deleted key) record.
pub const TOMBSTONE: i32 = -1;

/// The append-only log file underlying a store. Owns the read/write file
/// descriptor, a cached end-of-file offset, and the record codec used by
/// both writes (`append`) and point reads (`read_value`).
///
/// Every record — put, update, or delete — is framed as:
/// key length (big-endian i32, always > 0), value length or `-1` for a
/// tombstone (big-endian i32), the raw key, the raw value (absent for
/// tombstones), and a big-endian CRC-32 over `key || value` (or just `key`
/// for tombstones).
pub struct Log {
    pub path: PathBuf,
    pub file: File,
    pub current_offset: u64,
}

impl Log {
    /// Opens (creating if necessary) the log file, taking out an exclusive
    /// lock that is held for the lifetime of the handle.
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        file.try_lock_exclusive().map_err(|_| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                format!(
                    "store directory is locked by another handle: {}",
                    path.display()
                ),
            ))
        })?;
        let current_offset = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            current_offset,
        })
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.file.metadata()?.len() == 0)
    }

    /// Writes the 8-byte file header. Only meaningful on a brand-new file.
    pub fn write_header(&mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&MAGIC)?;
        self.file.write_all(&VERSION_MAJOR.to_be_bytes())?;
        self.file.write_all(&VERSION_MINOR.to_be_bytes())?;
        self.current_offset = HEADER_LEN;
        Ok(())
    }

    /// Appends a key/value entry, with `value = None` writing a tombstone.
    /// Returns the absolute offset of the value's first byte and its size
    /// (0 for a tombstone).
    pub fn append(&mut self, key: &[u8], value: Option<&[u8]>) -> Result<(u64, u32)> {
        let key_len = key.len() as i32;
        let (value_len_field, value_bytes): (i32, &[u8]) = match value {
            Some(v) => (v.len() as i32, v),
            None => (TOMBSTONE, &[]),
        };

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(key);
        hasher.update(value_bytes);
        let checksum = hasher.finalize();

        self.file.seek(SeekFrom::End(0))?;
        let record_start = self.current_offset;
        let capacity = 8 + key.len() + value_bytes.len() + 4;
        let mut w = BufWriter::with_capacity(capacity, &mut self.file);
        w.write_all(&key_len.to_be_bytes())?;
        w.write_all(&value_len_field.to_be_bytes())?;
        w.write_all(key)?;
        w.write_all(value_bytes)?;
        w.write_all(&checksum.to_be_bytes())?;
        w.flush()?;

        let value_offset = record_start + 8 + key.len() as u64;
        let total_len = capacity as u64;
        self.current_offset = record_start + total_len;
        Ok((value_offset, value_bytes.len() as u32))
    }

    /// Reads a value without verifying its checksum.
    pub fn read_value(&mut self, offset: u64, size: u32) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; size as usize];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads a value and verifies it against the trailing CRC-32, which
    /// covers `key || value`.
    pub fn read_value_checked(&mut self, key: &[u8], offset: u64, size: u32) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; size as usize + 4];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf)?;
        let (value, checksum_bytes) = buf.split_at(size as usize);
        let stored = u32::from_be_bytes(checksum_bytes.try_into().unwrap());

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(key);
        hasher.update(value);
        if hasher.finalize() != stored {
            return Err(Error::Checksum);
        }
        Ok(value.to_vec())
    }

    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Truncates the log to `len` bytes, used to discard a crash tail found
    /// by the index loader.
    pub fn truncate(&mut self, len: u64) -> Result<()> {
        self.file.set_len(len)?;
        self.current_offset = len;
        Ok(())
    }

    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

/// Attempt to flush the file when the log is dropped without an explicit
/// `sync`/`close`.
impl Drop for Log {
    fn drop(&mut self) {
        if let Err(err) = self.file.sync_all() {
            log::error!("failed to flush {}: {err}", self.path.display());
        }
    }
}

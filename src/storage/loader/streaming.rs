//! Streaming index loader: a single forward pass over the data file with a
//! buffered reader. Agrees with the mmap loader on what counts as a
//! recoverable crash tail (see module docs on [`super::LoaderKind`]); the
//! two differ only in mechanism, not in where they draw that line.

use crate::error::{Error, Result};
use crate::storage::index::Index;
use crate::storage::log::{HEADER_LEN, MAGIC, TOMBSTONE, VERSION_MAJOR};

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

pub struct StreamingLoader;

impl StreamingLoader {
    /// Scans `path` and returns the rebuilt index together with the byte
    /// offset at which scanning stopped — equal to the file length unless a
    /// crash tail was found, in which case it's the offset the log should be
    /// truncated to.
    pub fn load(&self, path: &Path) -> Result<(Index, u64)> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut r = BufReader::new(file);
        r.seek(SeekFrom::Start(0))?;
        verify_header(&mut r)?;

        let mut index = Index::new();
        let mut pos = HEADER_LEN;

        loop {
            let mut header = [0u8; 8];
            let n = read_partial(&mut r, &mut header)?;
            if n < 8 {
                break; // clean EOF, or a crash tail that cut the header short
            }

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
                break; // crash tail: record (or its trailing checksum) doesn't fully fit
            }

            let mut key = vec![0u8; key_len as usize];
            r.read_exact(&mut key)?;
            let value_offset = pos + 8 + key_len as u64;

            if value_len_field == TOMBSTONE {
                index.remove(&key);
            } else {
                index.insert(key, (value_offset, value_len_field as u32));
            }

            r.seek_relative((value_len + 4) as i64)?; // skip value + checksum without discarding the buffer
            pos += record_len;
        }

        Ok((index, pos))
    }
}

fn verify_header(r: &mut BufReader<File>) -> Result<()> {
    let mut header = [0u8; 8];
    r.read_exact(&mut header)
        .map_err(|_| Error::Load("truncated file header".into()))?;
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

/// Reads up to `buf.len()` bytes, stopping short of EOF without erroring.
/// Used to tell a clean EOF (0 bytes read) apart from a truncated record
/// header (1..buf.len() bytes read).
fn read_partial(r: &mut BufReader<File>, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match r.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    Ok(total)
}

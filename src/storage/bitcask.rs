//! The store engine: ties the data log, the index loader, and the
//! in-memory index together behind `open`/`get`/`put`/`delete`/`iterate`,
//! enforces per-mode read-only semantics, and drives compaction.
//!
//! This is a log-structured key-value engine in the BitCask family: values
//! live in a single append-only log file, and a complete in-memory index of
//! key to file position is rebuilt by scanning the log on every open. All
//! live keys must fit in memory. Deletes append a tombstone to the log so a
//! crash can never resurrect a deleted key. Compaction reclaims space by
//! writing a new log containing only live records and atomically swapping
//! it in for the active one.

use super::index::Index;
use super::log::Log;
use super::{rename, AutoCompact, Mode, Options, Status};
use crate::error::{Error, Result};

use std::path::PathBuf;

pub struct Store {
    dir: PathBuf,
    log: Log,
    index: Index,
    mode: Mode,
    options: Options,
}

impl Store {
    /// Opens or creates a store directory according to `mode`. On any mode
    /// that opens an existing file, the header is validated and the index
    /// is rebuilt by scanning the log with `options.loader`.
    pub fn open(dir: impl Into<PathBuf>, mode: Mode, options: Options) -> Result<Self> {
        let dir = dir.into();
        let data_path = dir.join("data");

        match mode {
            Mode::Read | Mode::ReadWrite => {
                if !dir.is_dir() || !data_path.is_file() {
                    return Err(Error::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("no store at {}", dir.display()),
                    )));
                }
            }
            Mode::Create => std::fs::create_dir_all(&dir)?,
            Mode::New => {
                std::fs::create_dir_all(&dir)?;
                if data_path.exists() {
                    std::fs::remove_file(&data_path)?;
                }
            }
        }

        log::info!("opening store {}", dir.display());
        let mut log = Log::open(data_path)?;
        let index = Self::load_index(&mut log, &options)?;
        log::info!("indexed {} live keys in {}", index.len(), dir.display());

        let mut store = Self {
            dir,
            log,
            index,
            mode,
            options,
        };

        if mode != Mode::Read {
            if let Some(auto) = options.auto_compact {
                store.maybe_auto_compact(auto)?;
            }
        }

        Ok(store)
    }

    fn load_index(log: &mut Log, options: &Options) -> Result<Index> {
        if log.is_empty()? {
            log.write_header()?;
            return Ok(Index::new());
        }
        let (index, valid_len) = options.loader.load(&log.path)?;
        let file_len = log.len()?;
        if valid_len < file_len {
            log::warn!(
                "found incomplete record at offset {} in {}, truncating",
                valid_len,
                log.path.display()
            );
            log.truncate(valid_len)?;
        }
        Ok(index)
    }

    fn maybe_auto_compact(&mut self, auto: AutoCompact) -> Result<()> {
        let status = self.status()?;
        if Self::should_compact(
            status.garbage_disk_size,
            status.total_disk_size,
            auto.min_ratio,
            auto.min_bytes,
        ) {
            log::info!(
                "compacting {} to remove {:.0}% garbage ({} of {} bytes)",
                self.log.path.display(),
                status.garbage_disk_size as f64 / status.total_disk_size.max(1) as f64 * 100.0,
                status.garbage_disk_size,
                status.total_disk_size,
            );
            self.compact()?;
        }
        Ok(())
    }

    fn should_compact(garbage_size: u64, total_size: u64, min_ratio: f64, min_bytes: u64) -> bool {
        if total_size == 0 {
            return false;
        }
        let garbage_ratio = garbage_size as f64 / total_size as f64;
        garbage_size > 0 && garbage_size >= min_bytes && garbage_ratio >= min_ratio
    }

    fn readonly(&self) -> bool {
        self.mode == Mode::Read
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.readonly() {
            return Err(Error::ReadOnly);
        }
        Ok(())
    }

    /// Looks up `key` and reads its value. Fails with `Error::NotFound` if
    /// the key isn't live. With `verify_checksums` enabled, recomputes the
    /// CRC-32 over the stored key and value and fails with
    /// `Error::Checksum` on mismatch.
    pub fn get(&mut self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let key = key.as_ref();
        let (offset, size) = *self.index.get(key).ok_or(Error::NotFound)?;
        if self.options.verify_checksums {
            self.log.read_value_checked(key, offset, size)
        } else {
            self.log.read_value(offset, size)
        }
    }

    /// Index lookup only; does not touch the log file.
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.index.contains_key(key.as_ref())
    }

    /// Appends a put record and updates the index. Keys and values may be
    /// given as text (`&str`/`String`) or raw bytes; text is encoded as
    /// UTF-8 before storage. Retrieval always returns raw bytes.
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_writable()?;
        let key = key.as_ref();
        let (offset, size) = self.log.append(key, Some(value.as_ref()))?;
        self.index.insert(key.to_vec(), (offset, size));
        Ok(())
    }

    /// Appends a tombstone record and removes the index entry. Fails with
    /// `Error::NotFound` if the key isn't live.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_writable()?;
        let key = key.as_ref();
        if !self.index.contains_key(key) {
            return Err(Error::NotFound);
        }
        self.log.append(key, None)?;
        self.index.remove(key);
        Ok(())
    }

    /// Snapshots the live keys at the moment of the call, in arbitrary
    /// order, independent of later mutations.
    pub fn iterate(&self) -> impl Iterator<Item = Vec<u8>> {
        self.index.keys().cloned().collect::<Vec<_>>().into_iter()
    }

    /// Materializes `iterate()` into a `Vec`.
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.iterate().collect()
    }

    /// `[get(k) for k in iterate()]`.
    pub fn values(&mut self) -> Result<Vec<Vec<u8>>> {
        self.keys().into_iter().map(|k| self.get(k)).collect()
    }

    /// Fsyncs the data file. A no-op, not an error, if nothing new was
    /// written since the last sync.
    pub fn sync(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.log.sync()
    }

    /// A snapshot of the data file's on-disk footprint, used to decide
    /// whether compaction is worthwhile.
    pub fn status(&mut self) -> Result<Status> {
        let keys = self.index.len() as u64;
        let live_size = self.index.iter().fold(0u64, |acc, (k, (_, size))| {
            acc + k.len() as u64 + *size as u64
        });
        let total_disk_size = self.log.len()?;
        // 8 bytes of length header plus a 4-byte trailing checksum per record.
        let live_disk_size = live_size + 12 * keys;
        let garbage_disk_size = total_disk_size.saturating_sub(live_disk_size);
        Ok(Status {
            keys,
            live_size,
            total_disk_size,
            live_disk_size,
            garbage_disk_size,
        })
    }

    /// Rebuilds the data file containing only live records, then atomically
    /// replaces the active file. A crash before the rename leaves the
    /// current file untouched; a crash during the rename is resolved by the
    /// OS's rename atomicity guarantee.
    pub fn compact(&mut self) -> Result<()> {
        self.ensure_writable()?;

        let compact_dir = self.dir.join("compact");
        if compact_dir.exists() {
            // Leftover from a compaction that crashed before the rename;
            // safe to discard since the active data file was never touched.
            std::fs::remove_dir_all(&compact_dir)?;
        }

        {
            let mut temp = Store::open(
                compact_dir.clone(),
                Mode::Create,
                Options {
                    verify_checksums: false,
                    loader: self.options.loader,
                    auto_compact: None,
                },
            )?;
            for key in self.index.keys().cloned().collect::<Vec<_>>() {
                let value = self.get(&key)?;
                temp.put(&key, value)?;
            }
            temp.sync()?;
        } // temp dropped: releases its file lock and descriptor

        let data_path = self.dir.join("data");
        rename::replace_file(&compact_dir.join("data"), &data_path)?;
        std::fs::remove_dir(&compact_dir)?;

        let mut new_log = Log::open(data_path)?;
        let new_index = Self::load_index(&mut new_log, &self.options)?;
        self.log = new_log;
        self.index = new_index;
        Ok(())
    }

    /// Closes the store, optionally compacting first. Consumes the handle,
    /// so calling close twice is a compile error rather than a runtime one.
    pub fn close(mut self, compact: bool) -> Result<()> {
        if compact {
            self.compact()?;
        }
        if !self.readonly() {
            self.log.sync()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::LoaderKind;
    use super::*;

    fn temp_dir() -> tempfile::TempDir {
        tempfile::TempDir::with_prefix("semidb").expect("tempdir failed")
    }

    #[test]
    fn round_trip() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("foo", "bar")?;
        assert_eq!(store.get("foo")?, b"bar");
        Ok(())
    }

    #[test]
    fn persists_across_reopen() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("foo", "bar")?;
        store.close(false)?;

        let mut store = Store::open(dir.path(), Mode::ReadWrite, Options::default())?;
        assert_eq!(store.get("foo")?, b"bar");
        Ok(())
    }

    #[test]
    fn last_writer_wins() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("k", "v1")?;
        store.put("k", "v2")?;
        assert_eq!(store.get("k")?, b"v2");
        store.close(false)?;

        let mut store = Store::open(dir.path(), Mode::ReadWrite, Options::default())?;
        assert_eq!(store.get("k")?, b"v2");
        Ok(())
    }

    #[test]
    fn tombstone_persists() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("k", "v")?;
        store.delete("k")?;
        assert!(!store.contains("k"));
        assert!(matches!(store.get("k"), Err(Error::NotFound)));
        store.close(false)?;

        let mut store = Store::open(dir.path(), Mode::ReadWrite, Options::default())?;
        assert!(!store.contains("k"));
        assert!(matches!(store.get("k"), Err(Error::NotFound)));
        Ok(())
    }

    #[test]
    fn deleting_missing_key_fails() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        assert!(matches!(store.delete("missing"), Err(Error::NotFound)));
        Ok(())
    }

    #[test]
    fn iteration_reflects_live_set() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("one", "1")?;
        store.put("two", "2")?;
        store.put("three", "3")?;
        store.delete("two")?;

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec![b"one".to_vec(), b"three".to_vec()]);

        let mut values = store.values()?;
        values.sort();
        assert_eq!(values, vec![b"1".to_vec(), b"3".to_vec()]);
        Ok(())
    }

    #[test]
    fn scenario_s3_reopen_readonly() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("one", "1")?;
        store.put("two", "2")?;
        store.put("three", "3")?;
        store.delete("two")?;
        store.close(false)?;

        let mut store = Store::open(dir.path(), Mode::Read, Options::default())?;
        assert!(store.contains("one"));
        assert!(!store.contains("two"));
        assert_eq!(store.get("three")?, b"3");
        Ok(())
    }

    #[test]
    fn compaction_reclaims_space_for_fully_deleted_store() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("k", "original")?;
        store.put("k", "updated")?;
        store.delete("k")?;
        store.compact()?;
        store.close(false)?;

        let size = std::fs::metadata(dir.path().join("data"))?.len();
        assert_eq!(size, 8); // header only, no live keys left
        Ok(())
    }

    #[test]
    fn compaction_preserves_semantics_and_shrinks_file() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("a", "1")?;
        store.put("b", "2")?;
        store.put("a", "1-updated")?;
        store.delete("b")?;

        store.compact()?;

        assert_eq!(store.get("a")?, b"1-updated");
        assert!(!store.contains("b"));

        let size = std::fs::metadata(dir.path().join("data"))?.len();
        // header + one record for "a": 8 (lengths) + 1 (key) + 9 (value "1-updated") + 4 (crc)
        assert_eq!(size, 8 + (8 + 1 + 9 + 4));
        Ok(())
    }

    #[test]
    fn bad_magic_fails_to_load() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("foo", "bar")?;
        store.close(false)?;

        let data_path = dir.path().join("data");
        let mut bytes = std::fs::read(&data_path)?;
        bytes[0] = b'Z';
        std::fs::write(&data_path, bytes)?;

        let result = Store::open(dir.path(), Mode::ReadWrite, Options::default());
        assert!(matches!(result, Err(Error::Load(_))));
        Ok(())
    }

    #[test]
    fn bad_major_version_fails_to_load() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("foo", "bar")?;
        store.close(false)?;

        let data_path = dir.path().join("data");
        let mut bytes = std::fs::read(&data_path)?;
        bytes[5] = 2; // major version low byte
        std::fs::write(&data_path, bytes)?;

        let result = Store::open(dir.path(), Mode::ReadWrite, Options::default());
        assert!(matches!(result, Err(Error::Load(_))));
        Ok(())
    }

    /// A record header corrupted in the middle of the file (not merely a
    /// truncated tail) is structurally invalid, not a crash tail, and must
    /// raise `Error::Load` from both loader implementations.
    #[test]
    fn mid_file_corrupted_record_header_fails_to_load() -> Result<()> {
        for loader in [LoaderKind::Mmap, LoaderKind::Streaming] {
            let dir = temp_dir();
            let options = Options {
                loader,
                ..Options::default()
            };
            let mut store = Store::open(dir.path(), Mode::New, options)?;
            store.put("one", "1")?;
            store.put("two", "2")?;
            store.close(false)?;

            let data_path = dir.path().join("data");
            let mut bytes = std::fs::read(&data_path)?;
            // The first record's key-length field starts right after the
            // 8-byte file header; zeroing it is invalid (key length must be
            // > 0) and isn't at the end of the file, so it can't be a crash
            // tail.
            bytes[8..12].copy_from_slice(&0i32.to_be_bytes());
            std::fs::write(&data_path, bytes)?;

            let result = Store::open(dir.path(), Mode::ReadWrite, options);
            assert!(
                matches!(result, Err(Error::Load(_))),
                "loader {loader:?} didn't raise Error::Load"
            );
        }
        Ok(())
    }

    #[test]
    fn checksum_enabled_detects_corruption() -> Result<()> {
        let dir = temp_dir();
        let options = Options {
            verify_checksums: true,
            ..Options::default()
        };
        let mut store = Store::open(dir.path(), Mode::New, options)?;
        store.put("foo", "bar")?;
        store.sync()?;

        drop(store); // release the exclusive lock before reopening

        let data_path = dir.path().join("data");
        let mut bytes = std::fs::read(&data_path)?;
        let last = bytes.len() - 1;
        bytes[last - 4] ^= 0xff; // flip a byte inside the value
        std::fs::write(&data_path, bytes)?;

        let mut store = Store::open(dir.path(), Mode::ReadWrite, options)?;
        assert!(matches!(store.get("foo"), Err(Error::Checksum)));
        Ok(())
    }

    #[test]
    fn checksum_disabled_returns_corrupted_bytes() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("foo", "bar")?;
        store.sync()?;

        drop(store); // release the exclusive lock before reopening

        let data_path = dir.path().join("data");
        let mut bytes = std::fs::read(&data_path)?;
        let last = bytes.len() - 1;
        bytes[last - 4] ^= 0xff;
        std::fs::write(&data_path, bytes)?;

        let mut store = Store::open(dir.path(), Mode::ReadWrite, Options::default())?;
        assert_ne!(store.get("foo")?, b"bar");
        Ok(())
    }

    #[test]
    fn new_mode_discards_existing_keys() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("foo", "bar")?;
        store.close(false)?;

        let store = Store::open(dir.path(), Mode::New, Options::default())?;
        assert!(!store.contains("foo"));
        Ok(())
    }

    #[test]
    fn read_mode_rejects_missing_store() {
        let dir = temp_dir();
        assert!(Store::open(dir.path(), Mode::Read, Options::default()).is_err());
    }

    #[test]
    fn read_only_guard() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("foo", "bar")?;
        store.close(false)?;

        let mut store = Store::open(dir.path(), Mode::Read, Options::default())?;
        assert!(matches!(store.put("x", "y"), Err(Error::ReadOnly)));
        assert!(matches!(store.delete("foo"), Err(Error::ReadOnly)));
        assert!(matches!(store.sync(), Err(Error::ReadOnly)));
        assert!(matches!(store.compact(), Err(Error::ReadOnly)));
        Ok(())
    }

    /// Tests that exclusive locks are taken out on the data file, erroring
    /// if held, and released when the store is closed.
    #[test]
    fn exclusive_lock_rejects_second_handle() -> Result<()> {
        let dir = temp_dir();
        let store = Store::open(dir.path(), Mode::New, Options::default())?;
        assert!(Store::open(dir.path(), Mode::ReadWrite, Options::default()).is_err());
        drop(store);
        assert!(Store::open(dir.path(), Mode::ReadWrite, Options::default()).is_ok());
        Ok(())
    }

    /// Truncating the data file by any positive number of bytes up to the
    /// length of the last record must recover the pre-crash index with that
    /// record omitted, never a load error, for both loader implementations.
    #[test]
    fn crash_tail_tolerance() -> Result<()> {
        for loader in [LoaderKind::Mmap, LoaderKind::Streaming] {
            let dir = temp_dir();
            let options = Options {
                loader,
                ..Options::default()
            };
            let mut store = Store::open(dir.path(), Mode::New, options)?;
            store.put("foobar", "foobar")?;
            store.put("key", "value")?;
            let before_big = std::fs::metadata(dir.path().join("data"))?.len();
            store.put("big", "x".repeat(9216))?;
            store.close(false)?;

            let data_path = dir.path().join("data");
            let full = std::fs::read(&data_path)?;
            let last_record_len = full.len() as u64 - before_big;

            for cut in 1..=last_record_len {
                let truncated_len = full.len() as u64 - cut;
                let f = std::fs::OpenOptions::new().write(true).open(&data_path)?;
                f.set_len(truncated_len)?;
                drop(f);

                let mut store = Store::open(dir.path(), Mode::ReadWrite, options)?;
                assert_eq!(store.get("foobar")?, b"foobar");
                assert_eq!(store.get("key")?, b"value");
                assert!(
                    !store.contains("big"),
                    "loader {loader:?} kept truncated record at cut {cut}"
                );
                store.close(false)?;

                std::fs::write(&data_path, &full)?; // restore full file for the next iteration
            }
        }
        Ok(())
    }

    #[test]
    fn scenario_s6_crash_recovery() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("foobar", "foobar")?;
        store.put("key", "value")?;
        store.put("big", "x".repeat(9216))?;
        store.close(false)?;

        let data_path = dir.path().join("data");
        let len = std::fs::metadata(&data_path)?.len();
        let f = std::fs::OpenOptions::new().write(true).open(&data_path)?;
        f.set_len(len - 100)?;
        drop(f);

        let mut store = Store::open(dir.path(), Mode::ReadWrite, Options::default())?;
        assert_eq!(store.get("foobar")?, b"foobar");
        assert_eq!(store.get("key")?, b"value");
        assert!(!store.contains("big"));
        Ok(())
    }

    /// Tests key/value sizes up to 1 MB.
    #[test]
    fn point_ops_sizes() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        for size in (1..=20).map(|i: u32| 1usize << i) {
            let value = vec![b'x'; size];
            let key = value.clone();
            assert!(matches!(store.get(&key), Err(Error::NotFound)));
            store.put(&key, &value)?;
            assert_eq!(store.get(&key)?, value);
            store.delete(&key)?;
            assert!(matches!(store.get(&key), Err(Error::NotFound)));
        }
        Ok(())
    }

    /// Tests that should_compact() handles parameters correctly.
    #[test_case::test_case(100, 100, -1.0, 0 => true; "ratio negative all garbage")]
    #[test_case::test_case(100, 100, 0.0, 0 => true; "ratio 0 all garbage")]
    #[test_case::test_case(100, 100, 1.0, 0 => true; "ratio 1 all garbage")]
    #[test_case::test_case(100, 100, 2.0, 0 => false; "ratio 2 all garbage")]
    #[test_case::test_case(0, 100, 0.0, 0 => false; "ratio 0 no garbage")]
    #[test_case::test_case(1, 100, 0.0, 0 => true; "ratio 0 tiny garbage")]
    #[test_case::test_case(49, 100, 0.5, 0 => false; "below ratio")]
    #[test_case::test_case(50, 100, 0.5, 0 => true; "at ratio")]
    #[test_case::test_case(49, 100, 0.0, 50 => false; "below min bytes")]
    #[test_case::test_case(50, 100, 0.0, 50 => true; "at min bytes")]
    #[test_case::test_case(0, 0, 0.0, 0 => false; "empty file never compacts")]
    fn should_compact(garbage_size: u64, total_size: u64, min_ratio: f64, min_bytes: u64) -> bool {
        Store::should_compact(garbage_size, total_size, min_ratio, min_bytes)
    }

    #[test]
    fn auto_compact_on_open() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("k", "v1")?;
        for _ in 0..10 {
            store.put("k", "v2")?;
        }
        store.close(false)?;

        let size_before = std::fs::metadata(dir.path().join("data"))?.len();
        let options = Options {
            auto_compact: Some(AutoCompact {
                min_ratio: 0.1,
                min_bytes: 0,
            }),
            ..Options::default()
        };
        let mut store = Store::open(dir.path(), Mode::ReadWrite, options)?;
        let size_after = std::fs::metadata(dir.path().join("data"))?.len();

        assert!(size_after < size_before);
        assert_eq!(store.get("k")?, b"v2");
        Ok(())
    }

    #[test]
    fn arbitrary_byte_keys_and_values() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        let key: Vec<u8> = vec![0, 1, 2, 255, 254, 0];
        let value: Vec<u8> = vec![0xde, 0xad, 0xbe, 0xef, 0];
        store.put(&key, &value)?;
        assert_eq!(store.get(&key)?, value);
        Ok(())
    }

    #[test]
    fn empty_value_is_well_formed() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("k", "")?;
        assert_eq!(store.get("k")?, b"");
        Ok(())
    }

    #[test]
    fn reopen_after_explicit_syncs() -> Result<()> {
        let dir = temp_dir();
        let mut store = Store::open(dir.path(), Mode::New, Options::default())?;
        store.put("a", "1")?;
        store.sync()?;
        store.put("b", "2")?;
        store.sync()?;
        store.close(false)?;

        let mut store = Store::open(dir.path(), Mode::ReadWrite, Options::default())?;
        assert_eq!(store.get("a")?, b"1");
        assert_eq!(store.get("b")?, b"2");
        Ok(())
    }
}

//! Fault injection for crash-consistency testing.
//!
//! [`FaultyBackend`] wraps any storage backend and fails selected
//! operations on demand. The [`FaultSwitch`] stays with the test after
//! the backend has been handed to a database.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (backend, switch) = FaultyBackend::new(FileBackend::open(path)?);
//! let mut db = BanDatabase::open_with_backend("bans", Box::new(backend), Config::default())?;
//! switch.fail_write_at(true);
//! assert!(db.deactivate(0).is_err());
//! ```

use bandb_storage::{StorageBackend, StorageError, StorageResult};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// One kind of write failure, for tests that pick faults at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Nothing fails.
    None,
    /// `append` fails before writing.
    Append,
    /// `write_at` fails before writing.
    WriteAt,
    /// `flush` and `sync` fail after the bytes reached the file.
    Sync,
    /// `append` writes this many bytes and then fails.
    TornAppend(usize),
}

/// Shared switches controlling a [`FaultyBackend`].
#[derive(Debug)]
pub struct FaultSwitch {
    fail_append: AtomicBool,
    fail_write_at: AtomicBool,
    fail_sync: AtomicBool,
    fail_truncate: AtomicBool,
    torn_append_bytes: AtomicUsize,
    writes_seen: AtomicUsize,
}

impl Default for FaultSwitch {
    fn default() -> Self {
        Self {
            fail_append: AtomicBool::new(false),
            fail_write_at: AtomicBool::new(false),
            fail_sync: AtomicBool::new(false),
            fail_truncate: AtomicBool::new(false),
            torn_append_bytes: AtomicUsize::new(usize::MAX),
            writes_seen: AtomicUsize::new(0),
        }
    }
}

impl FaultSwitch {
    /// Makes `append` fail before writing anything.
    pub fn fail_append(&self, fail: bool) {
        self.fail_append.store(fail, Ordering::SeqCst);
    }

    /// Makes `write_at` fail before writing anything.
    pub fn fail_write_at(&self, fail: bool) {
        self.fail_write_at.store(fail, Ordering::SeqCst);
    }

    /// Makes `flush` and `sync` fail.
    pub fn fail_sync(&self, fail: bool) {
        self.fail_sync.store(fail, Ordering::SeqCst);
    }

    /// Makes `truncate` fail, so a torn append cannot be cleaned up.
    pub fn fail_truncate(&self, fail: bool) {
        self.fail_truncate.store(fail, Ordering::SeqCst);
    }

    /// Makes the next appends write only their first `bytes` bytes and
    /// then fail, like a crash mid-write.
    pub fn tear_appends_after(&self, bytes: usize) {
        self.torn_append_bytes.store(bytes, Ordering::SeqCst);
    }

    /// Clears every fault.
    pub fn reset(&self) {
        self.fail_append(false);
        self.fail_write_at(false);
        self.fail_sync(false);
        self.fail_truncate(false);
        self.torn_append_bytes.store(usize::MAX, Ordering::SeqCst);
    }

    /// Clears every fault, then arms `fault`.
    pub fn arm(&self, fault: Fault) {
        self.reset();
        match fault {
            Fault::None => {}
            Fault::Append => self.fail_append(true),
            Fault::WriteAt => self.fail_write_at(true),
            Fault::Sync => self.fail_sync(true),
            Fault::TornAppend(bytes) => self.tear_appends_after(bytes),
        }
    }

    /// Number of `append` and `write_at` calls that reached the inner backend.
    pub fn writes_seen(&self) -> usize {
        self.writes_seen.load(Ordering::SeqCst)
    }
}

fn injected(what: &str) -> StorageError {
    StorageError::Io(io::Error::new(
        io::ErrorKind::Other,
        format!("injected {what} failure"),
    ))
}

/// A storage backend wrapper that fails on demand.
pub struct FaultyBackend<B> {
    inner: B,
    switch: Arc<FaultSwitch>,
}

impl<B: StorageBackend> FaultyBackend<B> {
    /// Wraps `inner`, returning the backend and its switch.
    pub fn new(inner: B) -> (Self, Arc<FaultSwitch>) {
        let switch = Arc::new(FaultSwitch::default());
        (
            Self {
                inner,
                switch: Arc::clone(&switch),
            },
            switch,
        )
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: StorageBackend> StorageBackend for FaultyBackend<B> {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        self.inner.read_at(offset, len)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        if self.switch.fail_append.load(Ordering::SeqCst) {
            return Err(injected("append"));
        }

        let torn = self.switch.torn_append_bytes.load(Ordering::SeqCst);
        if torn < data.len() {
            self.switch.writes_seen.fetch_add(1, Ordering::SeqCst);
            self.inner.append(&data[..torn])?;
            self.inner.flush()?;
            return Err(injected("torn append"));
        }

        self.switch.writes_seen.fetch_add(1, Ordering::SeqCst);
        self.inner.append(data)
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()> {
        if self.switch.fail_write_at.load(Ordering::SeqCst) {
            return Err(injected("write_at"));
        }
        self.switch.writes_seen.fetch_add(1, Ordering::SeqCst);
        self.inner.write_at(offset, data)
    }

    fn flush(&mut self) -> StorageResult<()> {
        if self.switch.fail_sync.load(Ordering::SeqCst) {
            return Err(injected("flush"));
        }
        self.inner.flush()
    }

    fn size(&self) -> StorageResult<u64> {
        self.inner.size()
    }

    fn sync(&mut self) -> StorageResult<()> {
        if self.switch.fail_sync.load(Ordering::SeqCst) {
            return Err(injected("sync"));
        }
        self.inner.sync()
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        if self.switch.fail_truncate.load(Ordering::SeqCst) {
            return Err(injected("truncate"));
        }
        self.inner.truncate(new_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{test_player, TempBanFile};
    use bandb_core::{BanDatabase, Config, CoreError, DatabaseState, NoopEnforcer};
    use bandb_storage::{FileBackend, InMemoryBackend};

    /// A provisioned ban file holding `count` bans, reopened through a
    /// fault-injecting backend.
    fn faulty_db(file: &TempBanFile, count: u64) -> (BanDatabase, Arc<FaultSwitch>) {
        {
            let mut db = file.load();
            for i in 0..count {
                db.add(&mut NoopEnforcer, &test_player(i + 1), "setup", 0)
                    .unwrap();
            }
        }
        let (backend, switch) = FaultyBackend::new(FileBackend::open(file.path()).unwrap());
        let db = BanDatabase::open_with_backend(
            file.path().display().to_string(),
            Box::new(backend),
            Config::default(),
        )
        .unwrap();
        (db, switch)
    }

    #[test]
    fn switch_controls_inner_backend() {
        let (mut backend, switch) = FaultyBackend::new(InMemoryBackend::new());
        backend.append(b"abc").unwrap();

        switch.fail_write_at(true);
        assert!(backend.write_at(0, b"x").is_err());
        switch.reset();
        backend.write_at(0, b"x").unwrap();

        assert_eq!(backend.inner().data(), b"xbc");
        assert_eq!(switch.writes_seen(), 2);
    }

    #[test]
    fn torn_append_writes_prefix() {
        let (mut backend, switch) = FaultyBackend::new(InMemoryBackend::new());
        switch.tear_appends_after(2);

        assert!(backend.append(b"abcdef").is_err());
        assert_eq!(backend.inner().data(), b"ab");
    }

    #[test]
    fn failed_deactivate_rolls_back_and_matches_disk() {
        let file = TempBanFile::new();
        let (mut db, switch) = faulty_db(&file, 2);

        switch.fail_write_at(true);
        let err = db.deactivate(1).unwrap_err();

        assert!(matches!(err, CoreError::Storage(_)));
        assert!(db.entries()[1].active);
        assert_eq!(db.state(), DatabaseState::Failed);

        let reloaded = file.load();
        let on_disk: Vec<_> = reloaded.entries().iter().map(|e| e.active).collect();
        let in_memory: Vec<_> = db.entries().iter().map(|e| e.active).collect();
        assert_eq!(on_disk, in_memory);
    }

    #[test]
    fn failed_handle_refuses_further_writes() {
        let file = TempBanFile::new();
        let (mut db, switch) = faulty_db(&file, 1);

        switch.fail_write_at(true);
        db.deactivate(0).unwrap_err();
        switch.reset();

        assert!(matches!(
            db.deactivate(0),
            Err(CoreError::DatabaseFailed { .. })
        ));
        assert!(matches!(
            db.add(&mut NoopEnforcer, &test_player(9), "late", 0),
            Err(CoreError::DatabaseFailed { .. })
        ));

        let mut reloaded = file.load();
        assert_eq!(reloaded.state(), DatabaseState::Ready);
        assert!(reloaded.deactivate(0).unwrap());
    }

    #[test]
    fn failed_append_does_not_index_entry() {
        let file = TempBanFile::new();
        let (mut db, switch) = faulty_db(&file, 1);
        let before = file.bytes();

        switch.fail_append(true);
        assert!(db.add(&mut NoopEnforcer, &test_player(2), "nope", 0).is_err());

        assert_eq!(db.len(), 1);
        assert_eq!(file.bytes(), before);
        assert_eq!(file.load().len(), 1);
    }

    #[test]
    fn failed_sync_on_add_discards_record() {
        let file = TempBanFile::new();
        let (mut db, switch) = faulty_db(&file, 1);
        let before = file.bytes();

        switch.fail_sync(true);
        assert!(db.add(&mut NoopEnforcer, &test_player(2), "nope", 0).is_err());
        assert_eq!(db.len(), 1);
        assert_eq!(db.state(), DatabaseState::Ready);
        assert_eq!(file.bytes(), before);
        assert_eq!(file.load().entries(), db.entries());
    }

    #[test]
    fn failed_sync_on_deactivate_restores_flag() {
        let file = TempBanFile::new();
        let (mut db, switch) = faulty_db(&file, 2);

        switch.fail_sync(true);
        assert!(db.deactivate(0).is_err());
        assert!(db.entries()[0].active);
        assert_eq!(db.state(), DatabaseState::Ready);
        assert_eq!(file.load().entries(), db.entries());

        switch.reset();
        assert!(db.deactivate(0).unwrap());
        assert!(!file.load().entries()[0].active);
    }

    #[test]
    fn torn_append_is_cut_back_off_the_file() {
        let file = TempBanFile::new();
        let (mut db, switch) = faulty_db(&file, 1);
        let before = file.bytes();

        switch.tear_appends_after(5);
        assert!(db.add(&mut NoopEnforcer, &test_player(2), "torn", 0).is_err());
        assert_eq!(db.len(), 1);
        assert_eq!(db.state(), DatabaseState::Ready);
        assert_eq!(file.bytes(), before);

        let mut reloaded = BanDatabase::load(file.path()).unwrap();
        assert_eq!(reloaded.entries(), db.entries());
        assert!(reloaded.deactivate(0).unwrap());

        switch.reset();
        db.add(&mut NoopEnforcer, &test_player(3), "after", 0).unwrap();
        let reloaded = file.load();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.entries()[1].steamid, 3);
    }

    #[test]
    fn torn_append_that_cannot_be_cut_fails_handle() {
        let file = TempBanFile::new();
        let (mut db, switch) = faulty_db(&file, 1);
        let torn_at = file.bytes().len() as u64;

        switch.tear_appends_after(5);
        switch.fail_truncate(true);
        assert!(db.add(&mut NoopEnforcer, &test_player(2), "torn", 0).is_err());
        assert_eq!(db.state(), DatabaseState::Failed);

        let err = BanDatabase::load(file.path()).unwrap_err();
        assert!(matches!(err, CoreError::CorruptRecord { offset, .. } if offset == torn_at));
    }
}

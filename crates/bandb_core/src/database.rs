//! Ban database facade.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::identity::{BanEnforcer, PlayerIdentity};
use bandb_codec::{encode_entry, Entry, EntryDecoder, FilePosition, VarData};
use bandb_storage::{FileBackend, StorageBackend, StorageResult};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// The only ban file format version this build reads and writes.
pub const BAN_DB_VERSION: u8 = 1;

/// Size of the leading version header.
const VERSION_HEADER_LEN: u64 = 1;

/// Lifecycle of a loaded handle.
///
/// A handle only exists once `load` has succeeded, so it starts out
/// `Ready`. A failed append or toggle is undone on disk when possible
/// and the handle stays `Ready`. If the undo fails too, the handle moves
/// to `Failed` and every mutating call is refused until the file is
/// loaded again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseState {
    /// Loaded and accepting writes.
    Ready,
    /// A write failed and could not be undone; reload before continuing.
    Failed,
}

/// Current time as seconds since the Unix epoch.
#[must_use]
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

/// A single-file ban record store.
///
/// The file is a version byte followed by records in creation order.
/// Records are only ever appended. Lifting a ban rewrites the one-byte
/// active flag at the record's remembered offset; nothing else in the
/// file changes after it is written.
///
/// The handle owns its backing file and is meant for a single owner.
/// Embedders that share it across threads wrap it in their own mutex.
///
/// # Example
///
/// ```rust,no_run
/// use bandb_core::{BanDatabase, NoopEnforcer, PlayerInfo};
/// use std::path::Path;
///
/// let mut db = BanDatabase::load(Path::new("bans.db"))?;
/// let player = PlayerInfo {
///     steamid: 123,
///     name: "Foo".into(),
///     ..PlayerInfo::default()
/// };
/// db.add(&mut NoopEnforcer, &player, "cheating", 0)?;
/// assert!(db.deactivate(0)?);
/// # Ok::<(), bandb_core::CoreError>(())
/// ```
pub struct BanDatabase {
    config: Config,
    file_name: String,
    version: u8,
    backend: Box<dyn StorageBackend>,
    entries: Vec<Entry>,
    state: DatabaseState,
}

impl std::fmt::Debug for BanDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BanDatabase")
            .field("file_name", &self.file_name)
            .field("version", &self.version)
            .field("entries", &self.entries.len())
            .field("state", &self.state)
            .finish()
    }
}

impl BanDatabase {
    /// Loads the ban file at `path`, provisioning it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or created (`OpenFailed`)
    /// - The version byte is missing or unsupported
    /// - Any record is truncated or malformed (`CorruptRecord`)
    pub fn load(path: &Path) -> CoreResult<Self> {
        Self::load_with_config(path, Config::default())
    }

    /// Loads the ban file at `path` with custom configuration.
    ///
    /// # Errors
    ///
    /// As [`BanDatabase::load`], plus `NotFound` when the file is missing
    /// and `create_if_missing` is false.
    pub fn load_with_config(path: &Path, config: Config) -> CoreResult<Self> {
        let name = path.display().to_string();
        let exists = path.try_exists().map_err(|e| CoreError::OpenFailed {
            name: name.clone(),
            source: e.into(),
        })?;

        if !exists && !config.create_if_missing {
            return Err(CoreError::NotFound { name });
        }

        let opened = if config.create_dirs {
            FileBackend::open_with_create_dirs(path)
        } else {
            FileBackend::open(path)
        };
        let backend = opened.map_err(|source| CoreError::OpenFailed {
            name: name.clone(),
            source,
        })?;

        Self::load_or_provision(path, name, Box::new(backend), config, !exists)
    }

    /// Runs `init`. A `fresh` file that fails provisioning is removed
    /// again, so the next load still sees it as missing.
    fn load_or_provision(
        path: &Path,
        name: String,
        backend: Box<dyn StorageBackend>,
        config: Config,
        fresh: bool,
    ) -> CoreResult<Self> {
        let loaded = Self::init(name, backend, config, fresh);
        if let Err(e) = &loaded {
            if fresh {
                match std::fs::remove_file(path) {
                    Ok(()) => {
                        warn!(file = %path.display(), error = %e, "provisioning failed, new file removed");
                    }
                    Err(rm) => {
                        warn!(
                            file = %path.display(),
                            error = %e,
                            cleanup = %rm,
                            "provisioning failed, new file left behind"
                        );
                    }
                }
            }
        }
        loaded
    }

    /// Loads a ban database from an arbitrary backend.
    ///
    /// An empty backend counts as a missing file and is provisioned with
    /// the version byte.
    ///
    /// # Errors
    ///
    /// As [`BanDatabase::load_with_config`].
    pub fn open_with_backend(
        name: impl Into<String>,
        backend: Box<dyn StorageBackend>,
        config: Config,
    ) -> CoreResult<Self> {
        let name = name.into();
        let fresh = backend.size()? == 0;
        if fresh && !config.create_if_missing {
            return Err(CoreError::NotFound { name });
        }
        Self::init(name, backend, config, fresh)
    }

    fn init(
        file_name: String,
        mut backend: Box<dyn StorageBackend>,
        config: Config,
        fresh: bool,
    ) -> CoreResult<Self> {
        if fresh {
            backend.append(&[BAN_DB_VERSION])?;
            persist(backend.as_mut(), config.sync_on_write)?;
            info!(file = %file_name, version = BAN_DB_VERSION, "provisioned new ban database");
            return Ok(Self {
                config,
                file_name,
                version: BAN_DB_VERSION,
                backend,
                entries: Vec::new(),
                state: DatabaseState::Ready,
            });
        }

        let size = backend.size()?;
        if size < VERSION_HEADER_LEN {
            return Err(CoreError::invalid_format(format!(
                "{file_name} has no version byte"
            )));
        }

        let version = backend.read_at(0, 1)?[0];
        if version != BAN_DB_VERSION {
            return Err(CoreError::UnsupportedVersion {
                found: version,
                supported: BAN_DB_VERSION,
            });
        }

        let body_len = usize::try_from(size - VERSION_HEADER_LEN)
            .map_err(|_| CoreError::invalid_format(format!("{file_name} is too large to load")))?;
        let body = backend.read_at(VERSION_HEADER_LEN, body_len)?;
        let entries = decode_records(&body)?;

        info!(
            file = %file_name,
            entries = entries.len(),
            active = entries.iter().filter(|e| e.active).count(),
            "loaded ban database"
        );

        Ok(Self {
            config,
            file_name,
            version,
            backend,
            entries,
            state: DatabaseState::Ready,
        })
    }

    /// Records a new, active ban for `player` and notifies `server`.
    ///
    /// `length` is the ban duration in seconds; 0 is permanent.
    ///
    /// # Errors
    ///
    /// Returns `NegativeLength` if `length` is below zero. Returns an
    /// error if the record cannot be encoded or durably appended. The
    /// entry is not added to the index in either case.
    pub fn add(
        &mut self,
        server: &mut dyn BanEnforcer,
        player: &dyn PlayerIdentity,
        reason: &str,
        length: i64,
    ) -> CoreResult<&Entry> {
        self.add_with_data(server, player, reason, length, VarData::new())
    }

    /// Like [`BanDatabase::add`], with an extension block (banning
    /// admin, case notes and the like).
    ///
    /// # Errors
    ///
    /// As [`BanDatabase::add`].
    pub fn add_with_data(
        &mut self,
        server: &mut dyn BanEnforcer,
        player: &dyn PlayerIdentity,
        reason: &str,
        length: i64,
        var_data: VarData,
    ) -> CoreResult<&Entry> {
        self.add_at(server, player, reason, length, var_data, unix_now())
    }

    /// Like [`BanDatabase::add_with_data`], with an explicit creation time.
    ///
    /// # Errors
    ///
    /// As [`BanDatabase::add`].
    pub fn add_at(
        &mut self,
        server: &mut dyn BanEnforcer,
        player: &dyn PlayerIdentity,
        reason: &str,
        length: i64,
        var_data: VarData,
        timestamp: i64,
    ) -> CoreResult<&Entry> {
        if length < 0 {
            return Err(CoreError::NegativeLength { length });
        }

        let mut entry = Entry {
            position: FilePosition::default(),
            active: true,
            timestamp,
            length,
            steamid: player.steamid(),
            ip: player.ip(),
            rdns: player.rdns().to_owned(),
            name: player.name().to_owned(),
            reason: reason.to_owned(),
            var_data,
        };
        self.write(&mut entry)?;

        let index = self.entries.len();
        self.entries.push(entry);
        let entry = &self.entries[index];

        info!(
            file = %self.file_name,
            index,
            steamid = entry.steamid,
            name = %entry.name,
            length = entry.length,
            "ban added"
        );
        server.ban_added(entry);

        Ok(entry)
    }

    /// Appends `entry` to the backing file and stamps its position.
    ///
    /// The in-memory index is not touched; [`BanDatabase::add`] is the
    /// way to record a ban.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the append fails. A failed
    /// append is cut back off the file, so a reload sees the file as it
    /// was. If that cut fails too, the handle moves to
    /// [`DatabaseState::Failed`].
    pub fn write(&mut self, entry: &mut Entry) -> CoreResult<FilePosition> {
        self.ensure_ready()?;

        let position = FilePosition::new(self.backend.size()?);
        entry.position = position;
        let bytes = encode_entry(entry)?;

        let written = self
            .backend
            .append(&bytes)
            .and_then(|offset| persist(self.backend.as_mut(), self.config.sync_on_write).map(|()| offset));

        match written {
            Ok(offset) => {
                debug_assert_eq!(offset, position.as_u64());
                debug!(file = %self.file_name, %position, len = bytes.len(), "record appended");
                Ok(position)
            }
            Err(e) => {
                match self.backend.truncate(position.as_u64()) {
                    Ok(()) => {
                        warn!(file = %self.file_name, %position, error = %e, "append failed, partial record discarded");
                    }
                    Err(undo) => {
                        self.state = DatabaseState::Failed;
                        warn!(
                            file = %self.file_name,
                            %position,
                            error = %e,
                            cleanup = %undo,
                            "append failed, partial record left in file"
                        );
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Serializes `entry` to any writer, with no effect on any database.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn write_to<W: Write + ?Sized>(entry: &Entry, writer: &mut W) -> CoreResult<usize> {
        let bytes = encode_entry(entry)?;
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }

    /// Writes the version header that starts every ban file.
    ///
    /// Together with [`BanDatabase::write_to`] this produces a complete
    /// ban file elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_header<W: Write + ?Sized>(writer: &mut W) -> CoreResult<()> {
        writer.write_all(&[BAN_DB_VERSION])?;
        Ok(())
    }

    /// Lifts the ban at `index`.
    ///
    /// Returns `Ok(true)` if an active ban was deactivated, `Ok(false)`
    /// if `index` is out of range or the ban was already inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag byte cannot be rewritten durably.
    /// The in-memory flag stays active and the byte on disk is set back
    /// to active, so [`BanDatabase::entries`] keeps matching the file. If
    /// the byte cannot be set back, the handle becomes `Failed`.
    pub fn deactivate(&mut self, index: usize) -> CoreResult<bool> {
        self.ensure_ready()?;

        let Some(entry) = self.entries.get_mut(index) else {
            return Ok(false);
        };
        if !entry.active {
            return Ok(false);
        }

        entry.active = false;
        let offset = entry.position.active_flag();
        let result = self
            .backend
            .write_at(offset, &[0])
            .and_then(|()| persist(self.backend.as_mut(), self.config.sync_on_write));

        if let Err(e) = result {
            entry.active = true;
            match self.backend.write_at(offset, &[1]) {
                Ok(()) => {
                    warn!(file = %self.file_name, index, offset, error = %e, "deactivate failed, flag rolled back");
                }
                Err(undo) => {
                    self.state = DatabaseState::Failed;
                    warn!(
                        file = %self.file_name,
                        index,
                        offset,
                        error = %e,
                        cleanup = %undo,
                        "deactivate failed, flag on disk unknown"
                    );
                }
            }
            return Err(e.into());
        }

        debug!(file = %self.file_name, index, offset, "ban deactivated");
        Ok(true)
    }

    /// First enforced ban matching `player` at time `now`.
    ///
    /// A ban matches on a non-zero SteamID or a non-zero IP. Inactive and
    /// expired bans are skipped.
    #[must_use]
    pub fn find_enforced(&self, player: &dyn PlayerIdentity, now: i64) -> Option<(usize, &Entry)> {
        let steamid = player.steamid();
        let ip = player.ip();
        self.entries.iter().enumerate().find(|(_, entry)| {
            entry.is_enforced(now)
                && ((steamid != 0 && entry.steamid == steamid) || (ip != 0 && entry.ip == ip))
        })
    }

    /// Format version of the loaded file.
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Name of the backing file.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// All entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entry at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DatabaseState {
        self.state
    }

    /// Configuration the handle was loaded with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn ensure_ready(&self) -> CoreResult<()> {
        match self.state {
            DatabaseState::Ready => Ok(()),
            DatabaseState::Failed => Err(CoreError::DatabaseFailed {
                name: self.file_name.clone(),
            }),
        }
    }
}

fn persist(backend: &mut dyn StorageBackend, sync: bool) -> StorageResult<()> {
    backend.flush()?;
    if sync {
        backend.sync()?;
    }
    Ok(())
}

fn decode_records(body: &[u8]) -> CoreResult<Vec<Entry>> {
    let mut decoder = EntryDecoder::new(body, VERSION_HEADER_LEN);
    let mut entries = Vec::new();

    while !decoder.is_empty() {
        let offset = decoder.position();
        let entry = decoder.decode().map_err(|source| {
            warn!(%offset, error = %source, "corrupt ban record");
            CoreError::CorruptRecord {
                offset: offset.as_u64(),
                source,
            }
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

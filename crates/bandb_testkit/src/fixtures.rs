//! Test fixtures and ban file helpers.

use bandb_core::{BanDatabase, Config, NoopEnforcer, PlayerInfo};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A ban file path inside a temporary directory that is removed on drop.
pub struct TempBanFile {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempBanFile {
    /// Creates a fixture whose ban file does not exist yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            path: temp_dir.path().join("bans.db"),
            _temp_dir: temp_dir,
        }
    }

    /// Path of the ban file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads (or provisions) the ban file with default configuration.
    pub fn load(&self) -> BanDatabase {
        BanDatabase::load(&self.path).expect("Failed to load ban database")
    }

    /// Loads the ban file with custom configuration.
    pub fn load_with(&self, config: Config) -> BanDatabase {
        BanDatabase::load_with_config(&self.path, config).expect("Failed to load ban database")
    }

    /// Raw bytes currently on disk.
    pub fn bytes(&self) -> Vec<u8> {
        std::fs::read(&self.path).expect("Failed to read ban file")
    }

    /// Replaces the file contents, for corruption tests.
    pub fn overwrite(&self, bytes: &[u8]) {
        std::fs::write(&self.path, bytes).expect("Failed to write ban file");
    }
}

impl Default for TempBanFile {
    fn default() -> Self {
        Self::new()
    }
}

/// A player with the given SteamID and a matching name.
pub fn test_player(steamid: u64) -> PlayerInfo {
    PlayerInfo {
        steamid,
        ip: 0x0A00_0000 | (steamid as u32 & 0x00FF_FFFF),
        rdns: format!("player{steamid}.example.net"),
        name: format!("Player{steamid}"),
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// A ban file holding `count` permanent bans, every third one lifted.
    pub fn populated(count: u64) -> TempBanFile {
        let file = TempBanFile::new();
        let mut db = file.load();

        for i in 0..count {
            db.add(&mut NoopEnforcer, &test_player(i + 1), "scenario", 0)
                .expect("Failed to add ban");
        }
        for index in (0..db.len()).step_by(3) {
            db.deactivate(index).expect("Failed to deactivate ban");
        }

        file
    }
}

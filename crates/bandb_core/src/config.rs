//! Ban database configuration.

/// Configuration for loading a ban database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to provision a new file if none exists.
    pub create_if_missing: bool,

    /// Whether to create missing parent directories of the ban file.
    pub create_dirs: bool,

    /// Whether to `fsync` after every append and toggle.
    ///
    /// When false, writes are only flushed to the OS.
    pub sync_on_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            create_dirs: false,
            sync_on_write: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to provision the file if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to create parent directories.
    #[must_use]
    pub const fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }

    /// Sets whether to sync on every write.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }
}

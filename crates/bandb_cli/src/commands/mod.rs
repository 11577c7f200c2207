//! CLI command implementations.

pub mod add;
pub mod deactivate;
pub mod export;
pub mod list;
pub mod verify;

use bandb_core::{BanDatabase, Config};
use std::path::Path;

/// Loads an existing ban file without provisioning a new one.
pub(crate) fn open_existing(path: &Path) -> Result<BanDatabase, Box<dyn std::error::Error>> {
    Ok(BanDatabase::load_with_config(
        path,
        Config::new().create_if_missing(false),
    )?)
}

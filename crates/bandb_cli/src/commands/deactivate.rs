//! Deactivate command implementation.

use std::path::Path;
use tracing::info;

/// Runs the deactivate command.
pub fn run(path: &Path, index: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = super::open_existing(path)?;

    if db.deactivate(index)? {
        info!("Deactivated entry {} in {:?}", index, path);
        println!("Ban #{} lifted", index);
    } else if index >= db.len() {
        return Err(format!("no ban #{} ({} entries)", index, db.len()).into());
    } else {
        println!("Ban #{} was already inactive", index);
    }

    Ok(())
}

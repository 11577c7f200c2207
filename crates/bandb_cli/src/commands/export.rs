//! Export command implementation.

use bandb_core::{unix_now, BanDatabase};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Runs the export command.
///
/// Returns the number of records written.
pub fn run(
    path: &Path,
    dest: &Path,
    only_enforced: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let db = super::open_existing(path)?;
    let now = unix_now();

    let file = OpenOptions::new().write(true).create_new(true).open(dest)?;
    let mut writer = BufWriter::new(file);

    BanDatabase::write_header(&mut writer)?;
    let mut count = 0;
    for entry in db
        .entries()
        .iter()
        .filter(|entry| !only_enforced || entry.is_enforced(now))
    {
        BanDatabase::write_to(entry, &mut writer)?;
        count += 1;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    info!("Exported {} of {} entries to {:?}", count, db.len(), dest);
    println!("Exported {} bans to {}", count, dest.display());
    Ok(count)
}

//! Add command implementation.

use bandb_core::{BanDatabase, NoopEnforcer, PlayerInfo, VarData};
use std::path::Path;
use tracing::info;

/// Parses a `key=value` argument.
pub fn parse_key_val(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{arg}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{arg}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Runs the add command.
pub fn run(
    path: &Path,
    player: &PlayerInfo,
    reason: &str,
    length: i64,
    vars: Vec<(String, String)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = BanDatabase::load(path)?;
    let var_data: VarData = vars.into_iter().collect();
    let entry = db.add_with_data(&mut NoopEnforcer, player, reason, length, var_data)?;
    info!("Recorded ban for {} at offset {}", entry.name, entry.position);

    println!("Added ban #{} for {}", db.len() - 1, player.name);
    Ok(())
}

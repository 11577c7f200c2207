//! List command implementation.

use bandb_core::{unix_now, Entry};
use serde::Serialize;
use std::path::Path;

/// Entry representation for output.
#[derive(Debug, Serialize)]
pub struct EntryInfo {
    /// Index in the ban file.
    pub index: usize,
    /// Byte offset of the record.
    pub offset: u64,
    /// Whether the ban flag is set.
    pub active: bool,
    /// Whether the ban is active and unexpired right now.
    pub enforced: bool,
    /// Creation time, seconds since the Unix epoch.
    pub timestamp: i64,
    /// Duration in seconds, 0 if permanent.
    pub length: i64,
    /// Expiry time, if the ban is not permanent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// SteamID.
    pub steamid: u64,
    /// Dotted-quad IPv4 address.
    pub ip: String,
    /// Reverse DNS.
    pub rdns: String,
    /// Player name.
    pub name: String,
    /// Ban reason.
    pub reason: String,
    /// Extension data.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub var_data: Vec<VarPair>,
}

/// One extension key/value pair.
#[derive(Debug, Serialize)]
pub struct VarPair {
    /// Key.
    pub key: String,
    /// Value.
    pub value: String,
}

impl EntryInfo {
    /// Builds the output form of `entry` as seen at time `now`.
    pub fn new(index: usize, entry: &Entry, now: i64) -> Self {
        Self {
            index,
            offset: entry.position.as_u64(),
            active: entry.active,
            enforced: entry.is_enforced(now),
            timestamp: entry.timestamp,
            length: entry.length,
            expires_at: entry.expires_at(),
            steamid: entry.steamid,
            ip: entry.ip_addr().to_string(),
            rdns: entry.rdns.clone(),
            name: entry.name.clone(),
            reason: entry.reason.clone(),
            var_data: entry
                .var_data
                .iter()
                .map(|(key, value)| VarPair {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}

/// Runs the list command.
pub fn run(path: &Path, only_enforced: bool, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = super::open_existing(path)?;
    let now = unix_now();

    let entries: Vec<EntryInfo> = db
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, entry)| !only_enforced || entry.is_enforced(now))
        .map(|(index, entry)| EntryInfo::new(index, entry, now))
        .collect();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        _ => {
            print_text_output(&entries);
        }
    }

    Ok(())
}

fn print_text_output(entries: &[EntryInfo]) {
    println!("Ban Entries ({} shown)", entries.len());
    println!("=================");
    println!();

    for entry in entries {
        let status = if entry.enforced {
            "ACTIVE"
        } else if entry.active {
            "EXPIRED"
        } else {
            "LIFTED"
        };
        print!(
            "[{:4}] {:7} @{:<8} {} steamid={} ip={}",
            entry.index, status, entry.offset, entry.name, entry.steamid, entry.ip
        );
        if entry.length == 0 {
            print!(" permanent");
        } else {
            print!(" for {}", format_duration(entry.length));
        }
        println!(" reason={:?}", entry.reason);

        for pair in &entry.var_data {
            println!("         {}={}", pair.key, pair.value);
        }
    }
}

/// Renders a ban duration in the largest whole units.
pub fn format_duration(secs: i64) -> String {
    let days = secs / 86_400;
    let hours = (secs / 3_600) % 24;
    let mins = (secs / 60) % 60;
    let secs = secs % 60;
    match (days, hours, mins) {
        (0, 0, 0) => format!("{secs}s"),
        (0, 0, _) => format!("{mins}m{secs:02}s"),
        (0, _, _) => format!("{hours}h{mins:02}m"),
        _ => format!("{days}d{hours:02}h"),
    }
}

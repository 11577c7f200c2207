//! Shared fixtures for the bandb benchmarks.

#![warn(missing_docs)]

use bandb_core::{Entry, FilePosition, PlayerInfo, VarData};

/// Deterministic filler bytes of the given size.
pub fn filler_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// A player whose fields are derived from `n`.
pub fn bench_player(n: u64) -> PlayerInfo {
    PlayerInfo {
        steamid: 76_561_197_960_265_728 + n,
        ip: 0x0A00_0000 | (n as u32 & 0x00FF_FFFF),
        rdns: format!("host-{n}.example.net"),
        name: format!("player{n}"),
    }
}

/// A ban entry with `vars` extension pairs and a reason of `reason_len` bytes.
pub fn bench_entry(n: u64, vars: usize, reason_len: usize) -> Entry {
    let player = bench_player(n);
    let var_data: VarData = (0..vars)
        .map(|i| (format!("key{i}"), format!("value{i}")))
        .collect();
    Entry {
        position: FilePosition::new(1),
        active: true,
        timestamp: 1_700_000_000,
        length: 3_600,
        steamid: player.steamid,
        ip: player.ip,
        rdns: player.rdns,
        name: player.name,
        reason: "x".repeat(reason_len),
        var_data,
    }
}

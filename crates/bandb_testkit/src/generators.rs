//! Property-based test generators using proptest.
//!
//! Provides strategies for ban entries, players and operation sequences.

use crate::fault::Fault;
use bandb_codec::{Entry, FilePosition, VarData};
use bandb_core::PlayerInfo;
use proptest::prelude::*;

/// Strategy for short printable strings, including non-ASCII.
pub fn short_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ._\\-é中]{0,24}").expect("Invalid regex")
}

/// Strategy for var blocks with unique keys.
pub fn var_data_strategy() -> impl Strategy<Value = VarData> {
    prop::collection::btree_map(
        prop::string::string_regex("[a-z]{1,8}").expect("Invalid regex"),
        short_text_strategy(),
        0..4,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

/// Strategy for arbitrary well-formed entries at position 0.
pub fn entry_strategy() -> impl Strategy<Value = Entry> {
    (
        any::<bool>(),
        any::<i64>(),
        prop_oneof![Just(0i64), 1i64..=31_536_000],
        any::<u64>(),
        any::<u32>(),
        short_text_strategy(),
        short_text_strategy(),
        short_text_strategy(),
        var_data_strategy(),
    )
        .prop_map(
            |(active, timestamp, length, steamid, ip, rdns, name, reason, var_data)| Entry {
                position: FilePosition::default(),
                active,
                timestamp,
                length,
                steamid,
                ip,
                rdns,
                name,
                reason,
                var_data,
            },
        )
}

/// Strategy for players to ban.
pub fn player_strategy() -> impl Strategy<Value = PlayerInfo> {
    (
        any::<u64>(),
        any::<u32>(),
        short_text_strategy(),
        short_text_strategy(),
    )
        .prop_map(|(steamid, ip, rdns, name)| PlayerInfo {
            steamid,
            ip,
            rdns,
            name,
        })
}

/// One step against a ban database.
#[derive(Debug, Clone)]
pub enum BanOp {
    /// Ban a player for `length` seconds.
    Add {
        /// Who to ban.
        player: PlayerInfo,
        /// Why.
        reason: String,
        /// Duration in seconds, 0 for permanent.
        length: i64,
    },
    /// Lift the ban at this index (may be out of range).
    Deactivate(usize),
}

/// Strategy for a single operation.
pub fn ban_op_strategy() -> impl Strategy<Value = BanOp> {
    prop_oneof![
        (player_strategy(), short_text_strategy(), 0i64..86_400)
            .prop_map(|(player, reason, length)| BanOp::Add {
                player,
                reason,
                length
            }),
        (0usize..12).prop_map(BanOp::Deactivate),
    ]
}

/// Strategy for the fault armed before an operation.
pub fn fault_strategy() -> impl Strategy<Value = Fault> {
    prop_oneof![
        3 => Just(Fault::None),
        1 => Just(Fault::Append),
        1 => Just(Fault::WriteAt),
        1 => Just(Fault::Sync),
        1 => (0usize..64).prop_map(Fault::TornAppend),
    ]
}

/// Property test configuration.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a quick test configuration (fewer cases).
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest's Config.
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

//! Collaborators the ban database talks to.
//!
//! The database does not know about connected players or game servers.
//! Callers hand it a [`PlayerIdentity`] to record and a [`BanEnforcer`]
//! to notify once the ban is durable.

use bandb_codec::Entry;

/// Identity of a player as of the moment they are banned.
pub trait PlayerIdentity {
    /// Platform identity, 0 if unknown.
    fn steamid(&self) -> u64;
    /// IPv4 address as a big-endian integer, 0 if unknown.
    fn ip(&self) -> u32;
    /// Reverse DNS hostname, possibly empty.
    fn rdns(&self) -> &str;
    /// Display name.
    fn name(&self) -> &str;
}

/// A plain snapshot of a player's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Platform identity, 0 if unknown.
    pub steamid: u64,
    /// IPv4 address, 0 if unknown.
    pub ip: u32,
    /// Reverse DNS hostname.
    pub rdns: String,
    /// Display name.
    pub name: String,
}

impl PlayerIdentity for PlayerInfo {
    fn steamid(&self) -> u64 {
        self.steamid
    }

    fn ip(&self) -> u32 {
        self.ip
    }

    fn rdns(&self) -> &str {
        &self.rdns
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The server side of a ban: told about each new ban so it can kick
/// the player's current session.
pub trait BanEnforcer {
    /// Called after `entry` has been durably written.
    fn ban_added(&mut self, entry: &Entry);
}

/// An enforcer with nobody to disconnect, for offline tooling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnforcer;

impl BanEnforcer for NoopEnforcer {
    fn ban_added(&mut self, _entry: &Entry) {}
}

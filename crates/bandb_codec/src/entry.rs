//! In-memory ban record types.

use std::fmt;

/// Byte offset of a record's first byte in the backing file.
///
/// Captured once, when the record is appended or first read, and only
/// ever used to overwrite the active flag in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilePosition(pub u64);

impl FilePosition {
    /// Creates a new file position.
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Returns the raw byte offset.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Offset of the active flag byte for the record starting here.
    #[must_use]
    pub const fn active_flag(self) -> u64 {
        self.0 + crate::ACTIVE_FLAG_OFFSET
    }
}

impl fmt::Display for FilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Open-ended extension block of a ban record.
///
/// An insertion-ordered map from string to string. Keys are unique;
/// setting an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarData {
    pairs: Vec<(String, String)>,
}

impl VarData {
    /// Creates an empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` under `key`, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.pairs.push((key, value));
                None
            }
        }
    }

    /// Number of key/value pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VarData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (key, value) in iter {
            data.set(key, value);
        }
        data
    }
}

/// A single ban record.
///
/// Everything except `active` is fixed once the record is written.
/// `position` is storage metadata and is not part of the encoded bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Where this record starts in the backing file.
    pub position: FilePosition,
    /// Whether the ban is currently enforced.
    pub active: bool,
    /// Creation time, seconds since the Unix epoch.
    pub timestamp: i64,
    /// Ban duration in seconds; 0 means permanent.
    pub length: i64,
    /// SteamID of the banned player (0 if unknown).
    pub steamid: u64,
    /// IPv4 address of the banned player (0 if unknown).
    pub ip: u32,
    /// Reverse DNS of the banned player.
    pub rdns: String,
    /// Display name of the banned player.
    pub name: String,
    /// Why the player was banned.
    pub reason: String,
    /// Extension data such as the banning admin.
    pub var_data: VarData,
}

impl Entry {
    /// Returns true if the ban never expires.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        self.length == 0
    }

    /// Time at which the ban lapses, or `None` if it is permanent.
    #[must_use]
    pub const fn expires_at(&self) -> Option<i64> {
        if self.is_permanent() {
            None
        } else {
            Some(self.timestamp.saturating_add(self.length))
        }
    }

    /// Returns true if the ban's duration has run out at `now`.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at().is_some_and(|end| now >= end)
    }

    /// Returns true if the ban is active and has not expired at `now`.
    #[must_use]
    pub fn is_enforced(&self, now: i64) -> bool {
        self.active && !self.is_expired(now)
    }

    /// Dotted-quad rendering of `ip`.
    #[must_use]
    pub fn ip_addr(&self) -> std::net::Ipv4Addr {
        std::net::Ipv4Addr::from(self.ip)
    }
}

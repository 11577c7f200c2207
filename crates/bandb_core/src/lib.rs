//! # bandb core
//!
//! Positional ban record database.
//!
//! This crate provides:
//! - [`BanDatabase`]: load, append and deactivate ban records in one file
//! - [`Config`]: provisioning and durability settings
//! - [`PlayerIdentity`] / [`BanEnforcer`]: the seams to the game server
//!
//! ## File Layout
//!
//! ```text
//! | version (1) | record | record | ... |
//! ```
//!
//! Records are append-only. Each loaded or appended [`Entry`] remembers
//! its byte offset, and lifting a ban rewrites exactly one byte there.
//!
//! ## Failure Policy
//!
//! - a missing file is provisioned with just the version byte
//! - a truncated or malformed record fails the whole load
//! - a failed append is cut back off the file and a failed toggle is
//!   set back on disk, so the index and the file keep matching
//! - if that undo fails too, the handle is marked [`DatabaseState::Failed`]

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod identity;

pub use bandb_codec::{Entry, FilePosition, VarData};
pub use config::Config;
pub use database::{unix_now, BanDatabase, DatabaseState, BAN_DB_VERSION};
pub use error::{CoreError, CoreResult};
pub use identity::{BanEnforcer, NoopEnforcer, PlayerIdentity, PlayerInfo};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

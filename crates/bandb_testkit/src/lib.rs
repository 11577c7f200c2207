//! # bandb testkit
//!
//! Test utilities for the bandb ban record database.
//!
//! This crate provides:
//! - Temp-dir ban file fixtures
//! - Property-based generators for entries and players
//! - A fault-injecting storage backend for crash-consistency tests
//! - Byte-level format vectors for other implementations of the ban file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bandb_testkit::prelude::*;
//!
//! #[test]
//! fn bans_survive_reload() {
//!     let file = TempBanFile::new();
//!     let mut db = file.load();
//!     // ... add and deactivate
//!     let reloaded = file.load();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fault;
pub mod fixtures;
pub mod generators;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fault::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::vectors::*;
}

pub use fault::*;
pub use fixtures::*;
pub use generators::*;
pub use vectors::*;

//! # bandb codec
//!
//! On-disk record codec for the bandb ban record database.
//!
//! ## Record Layout
//!
//! All integers are little-endian. Strings are UTF-8 with a `u32` byte
//! length prefix.
//!
//! ```text
//! | active (1) | timestamp (8) | length (8) | steamid (8) | ip (4) |
//! | rdns (4+N) | name (4+N) | reason (4+N) |
//! | var count (4) | { key (4+N) value (4+N) } * count |
//! ```
//!
//! The first 29 bytes are fixed. The active flag sits at offset 0 so it
//! can be rewritten in place without touching the rest of the record.
//! Var keys are unique within a record; a repeated key fails to decode.
//!
//! ## Usage
//!
//! ```
//! use bandb_codec::{decode_entry, encode_entry, Entry, FilePosition};
//!
//! let entry = Entry {
//!     active: true,
//!     steamid: 123,
//!     name: "Foo".into(),
//!     ..Entry::default()
//! };
//! let bytes = encode_entry(&entry).unwrap();
//! let (decoded, used) = decode_entry(&bytes, FilePosition::new(0)).unwrap();
//! assert_eq!(decoded, entry);
//! assert_eq!(used, bytes.len());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod entry;
mod error;

pub use decoder::{decode_entry, EntryDecoder};
pub use encoder::{encode_entry, encoded_len, EntryEncoder};
pub use entry::{Entry, FilePosition, VarData};
pub use error::{CodecError, CodecResult};

/// Size of the fixed portion of a record.
pub const HEADER_SIZE: usize = 1 + 8 + 8 + 8 + 4;

/// Offset of the active flag from the start of a record.
pub const ACTIVE_FLAG_OFFSET: u64 = 0;

/// Maximum allowed byte length of any single string field.
/// Guards allocation against corrupt length prefixes.
pub const MAX_STRING_LEN: u64 = 16 * 1024 * 1024;

/// Maximum number of pairs in a record's var block.
pub const MAX_VAR_ENTRIES: u64 = 64 * 1024;

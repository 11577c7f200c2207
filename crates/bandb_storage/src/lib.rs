//! # bandb storage
//!
//! Byte-store backends for the bandb ban record database.
//!
//! Backends are **opaque byte stores**. They know nothing about the ban
//! file layout; `bandb_core` owns every interpretation of the bytes.
//!
//! ## Operations
//!
//! - `append` writes at end of file and reports where the bytes landed
//! - `write_at` overwrites bytes that already exist (never grows the file)
//! - `read_at`, `flush`, `sync`, `size`
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use bandb_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! let offset = backend.append(b"\x01hello").unwrap();
//! backend.write_at(offset, b"\x00").unwrap();
//! assert_eq!(backend.read_at(offset, 6).unwrap(), b"\x00hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;

//! Durable key-value persistence subsystem.
//!
//! # Data Flow
//! ```text
//! caller (tokens, preferences)
//!     → encrypted.rs (AES-256-GCM seal/open, base64 framing)
//!     → backend.rs (memory or write-through JSON file)
//! ```
//!
//! # Design Decisions
//! - Narrow interface: get/set/remove on strings, nothing else
//! - Encryption is internal to `EncryptedStore`; backends store opaque text
//! - Undecryptable entries are evicted, not propagated as errors

pub mod backend;
pub mod encrypted;

pub use backend::{FileBackend, MemoryBackend, StorageBackend, StorageError};
pub use encrypted::EncryptedStore;

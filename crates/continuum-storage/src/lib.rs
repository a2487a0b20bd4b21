//! Continuum blob storage
//!
//! The local cache is a plain key-value store of strings. This crate defines
//! the [`BlobStore`] seam and the backends the client can run against.

pub mod client;
pub mod file;
pub mod memory;
pub mod redis_store;

pub use client::{open, BlobStore, StorageError, StorageLocation, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

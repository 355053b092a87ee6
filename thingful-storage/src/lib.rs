//! Storage for the Thingful endpoint suites
//!
//! This crate provides the store abstraction the suites seed through, a
//! Postgres backend and an in-memory backend behind it, and the `testing`
//! module with the fixture records and the seeding routines.

pub mod connection;
pub mod error;
pub mod memory;
pub mod testing;
pub mod transaction;

// Postgres implementation (feature-gated)
#[cfg(feature = "postgres")]
pub mod postgres;

// Re-export core types for convenience
pub use connection::{SeedStore, SeedTransaction, Table};
pub use error::{StorageError, StorageResult};
pub use memory::{InMemoryStore, MemoryState, Sequence};
pub use transaction::Transaction;

#[cfg(feature = "postgres")]
pub use postgres::PgStore;

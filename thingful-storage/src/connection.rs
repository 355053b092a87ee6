//! Data-access interface used by the seeder
//!
//! The seeder never builds SQL itself. It talks to a [`SeedStore`] and the
//! [`SeedTransaction`]s it hands out, which keeps sequence resets and batch
//! inserts as opaque store operations.

use async_trait::async_trait;
use thingful_api_types::{Review, Thing, User};

use crate::StorageResult;

/// The three Thingful tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Users,
    Things,
    Reviews,
}

impl Table {
    /// All tables, in foreign-key order (referenced before referencing)
    pub const ALL: [Table; 3] = [Table::Users, Table::Things, Table::Reviews];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Users => "thingful_users",
            Table::Things => "thingful_things",
            Table::Reviews => "thingful_reviews",
        }
    }

    /// Name of the sequence backing the `id` column
    pub fn sequence(&self) -> &'static str {
        match self {
            Table::Users => "thingful_users_id_seq",
            Table::Things => "thingful_things_id_seq",
            Table::Reviews => "thingful_reviews_id_seq",
        }
    }

    /// Tables holding a foreign key into this one
    pub fn referenced_by(&self) -> &'static [Table] {
        match self {
            Table::Users => &[Table::Things, Table::Reviews],
            Table::Things => &[Table::Reviews],
            Table::Reviews => &[],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A store the fixtures can be seeded into
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Begin a transaction
    async fn begin(&self) -> StorageResult<Box<dyn SeedTransaction>>;

    /// Look up a user row by id
    async fn find_user(&self, id: i32) -> StorageResult<Option<User>>;

    /// Look up a review row by id
    async fn find_review(&self, id: i32) -> StorageResult<Option<Review>>;

    /// Number of rows in a table
    async fn count(&self, table: Table) -> StorageResult<i64>;
}

/// Writes performed inside one transaction
///
/// Implementations roll back when dropped without [`commit`](Self::commit).
#[async_trait]
pub trait SeedTransaction: Send {
    /// Empty the given tables in one statement
    async fn truncate(&mut self, tables: &[Table]) -> StorageResult<()>;

    /// Lower the sequence minimum to 0 and restart it at `start`
    async fn reset_sequence(&mut self, table: Table, start: i64) -> StorageResult<()>;

    /// Set the sequence's current value; the next generated id is `value + 1`
    async fn set_sequence(&mut self, table: Table, value: i64) -> StorageResult<()>;

    /// Draw the next id from the table's sequence
    async fn next_id(&mut self, table: Table) -> StorageResult<i64>;

    /// Insert user rows as given, explicit ids included
    async fn insert_users(&mut self, users: &[User]) -> StorageResult<u64>;

    /// Insert thing rows as given, explicit ids included
    async fn insert_things(&mut self, things: &[Thing]) -> StorageResult<u64>;

    /// Insert review rows as given, explicit ids included
    async fn insert_reviews(&mut self, reviews: &[Review]) -> StorageResult<u64>;

    /// Commit the transaction
    async fn commit(self: Box<Self>) -> StorageResult<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> StorageResult<()>;
}

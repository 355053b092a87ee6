//! In-memory store for testing
//!
//! Behaves like the Postgres schema the suites run against as far as the
//! seeder can observe: primary keys, the unique `user_name`, foreign keys,
//! truncate restrictions and sequence bounds are all enforced. A transaction
//! holds the store lock until it is committed or dropped, and works on a
//! staged copy of the state so that a rollback simply discards it.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thingful_api_types::{Review, Thing, User};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::connection::{SeedStore, SeedTransaction, Table};
use crate::{StorageError, StorageResult};

/// State of one id sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    min_value: i64,
    last_value: i64,
    is_called: bool,
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            min_value: 1,
            last_value: 1,
            is_called: false,
        }
    }
}

impl Sequence {
    /// The id the next `next_id` call returns
    pub fn peek_next(&self) -> i64 {
        if self.is_called {
            self.last_value + 1
        } else {
            self.last_value
        }
    }

    fn set(&mut self, name: &str, value: i64) -> StorageResult<()> {
        if value < self.min_value {
            return Err(StorageError::SequenceOutOfBounds(format!(
                "setval: value {} is out of bounds for sequence \"{}\" ({}..{})",
                value,
                name,
                self.min_value,
                i64::MAX
            )));
        }
        self.last_value = value;
        self.is_called = true;
        Ok(())
    }

    fn next(&mut self) -> i64 {
        if self.is_called {
            self.last_value += 1;
        } else {
            self.is_called = true;
        }
        self.last_value
    }
}

/// Rows and sequences held by an [`InMemoryStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    users: BTreeMap<i32, User>,
    things: BTreeMap<i32, Thing>,
    reviews: BTreeMap<i32, Review>,
    sequences: BTreeMap<Table, Sequence>,
}

impl MemoryState {
    pub fn things(&self) -> impl Iterator<Item = &Thing> {
        self.things.values()
    }

    pub fn sequence(&self, table: Table) -> Sequence {
        self.sequences.get(&table).cloned().unwrap_or_default()
    }

    pub fn row_count(&self, table: Table) -> usize {
        match table {
            Table::Users => self.users.len(),
            Table::Things => self.things.len(),
            Table::Reviews => self.reviews.len(),
        }
    }

    fn sequence_mut(&mut self, table: Table) -> &mut Sequence {
        self.sequences.entry(table).or_default()
    }

    fn truncate(&mut self, tables: &[Table]) -> StorageResult<()> {
        for table in tables {
            if let Some(referencing) = table.referenced_by().iter().find(|r| !tables.contains(*r)) {
                return Err(StorageError::QueryFailed(format!(
                    "cannot truncate a table referenced in a foreign key constraint: \
                     table \"{}\" references \"{}\"",
                    referencing, table
                )));
            }
        }

        for table in tables {
            match table {
                Table::Users => self.users.clear(),
                Table::Things => self.things.clear(),
                Table::Reviews => self.reviews.clear(),
            }
        }
        Ok(())
    }

    fn insert_user(&mut self, user: &User) -> StorageResult<()> {
        if self.users.contains_key(&user.id) {
            return Err(duplicate_key("thingful_users_pkey", "id", user.id));
        }
        if self.users.values().any(|u| u.user_name == user.user_name) {
            return Err(duplicate_key("thingful_users_user_name_key", "user_name", &user.user_name));
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    fn insert_thing(&mut self, thing: &Thing) -> StorageResult<()> {
        if self.things.contains_key(&thing.id) {
            return Err(duplicate_key("thingful_things_pkey", "id", thing.id));
        }
        if !self.users.contains_key(&thing.author_id) {
            return Err(missing_reference(
                Table::Things,
                "author_id",
                thing.author_id,
                Table::Users,
            ));
        }
        self.things.insert(thing.id, thing.clone());
        Ok(())
    }

    fn insert_review(&mut self, review: &Review) -> StorageResult<()> {
        if self.reviews.contains_key(&review.id) {
            return Err(duplicate_key("thingful_reviews_pkey", "id", review.id));
        }
        if !self.things.contains_key(&review.thing_id) {
            return Err(missing_reference(
                Table::Reviews,
                "thing_id",
                review.thing_id,
                Table::Things,
            ));
        }
        if !self.users.contains_key(&review.user_id) {
            return Err(missing_reference(Table::Reviews, "user_id", review.user_id, Table::Users));
        }
        self.reviews.insert(review.id, review.clone());
        Ok(())
    }
}

fn duplicate_key(constraint: &str, column: &str, value: impl std::fmt::Display) -> StorageError {
    StorageError::DuplicateKey(format!(
        "duplicate key value violates unique constraint \"{}\": Key ({})=({}) already exists",
        constraint, column, value
    ))
}

fn missing_reference(table: Table, column: &str, value: i32, target: Table) -> StorageError {
    StorageError::ForeignKeyViolation(format!(
        "insert or update on table \"{}\" violates foreign key constraint \"{}_{}_fkey\": \
         Key ({})=({}) is not present in table \"{}\"",
        table, table, column, column, value, target
    ))
}

/// Shared in-memory store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed state
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl SeedStore for InMemoryStore {
    async fn begin(&self) -> StorageResult<Box<dyn SeedTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, staged }))
    }

    async fn find_user(&self, id: i32) -> StorageResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_review(&self, id: i32) -> StorageResult<Option<Review>> {
        Ok(self.state.lock().await.reviews.get(&id).cloned())
    }

    async fn count(&self, table: Table) -> StorageResult<i64> {
        Ok(self.state.lock().await.row_count(table) as i64)
    }
}

/// Transaction over a staged copy of the store state
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl SeedTransaction for MemoryTransaction {
    async fn truncate(&mut self, tables: &[Table]) -> StorageResult<()> {
        self.staged.truncate(tables)
    }

    // START WITH only matters to a later RESTART, which the seeder never issues
    async fn reset_sequence(&mut self, table: Table, _start: i64) -> StorageResult<()> {
        self.staged.sequence_mut(table).min_value = 0;
        Ok(())
    }

    async fn set_sequence(&mut self, table: Table, value: i64) -> StorageResult<()> {
        self.staged.sequence_mut(table).set(table.sequence(), value)
    }

    async fn next_id(&mut self, table: Table) -> StorageResult<i64> {
        Ok(self.staged.sequence_mut(table).next())
    }

    async fn insert_users(&mut self, users: &[User]) -> StorageResult<u64> {
        for user in users {
            self.staged.insert_user(user)?;
        }
        Ok(users.len() as u64)
    }

    async fn insert_things(&mut self, things: &[Thing]) -> StorageResult<u64> {
        for thing in things {
            self.staged.insert_thing(thing)?;
        }
        Ok(things.len() as u64)
    }

    async fn insert_reviews(&mut self, reviews: &[Review]) -> StorageResult<u64> {
        for review in reviews {
            self.staged.insert_review(review)?;
        }
        Ok(reviews.len() as u64)
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        let MemoryTransaction { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StorageResult<()> {
        Ok(())
    }
}

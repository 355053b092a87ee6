//! Cleaning and seeding the Thingful tables
//!
//! Each public function runs in exactly one transaction. Any failure drops
//! the transaction uncommitted, so a partial seed is never visible.

use thingful_api_types::{Review, Thing, User};
use tracing::{debug, info};

use crate::connection::{SeedStore, Table};
use crate::transaction::Transaction;
use crate::StorageResult;

/// bcrypt work factor for seeded passwords; the lowest the crate accepts
pub const PASSWORD_HASH_COST: u32 = 4;

/// Truncate all tables and restart every id sequence at 1
pub async fn clean_tables(store: &dyn SeedStore) -> StorageResult<()> {
    let mut tx = Transaction::begin(store, "clean_tables").await?;

    tx.truncate(&Table::ALL).await?;
    for table in Table::ALL {
        tx.reset_sequence(table, 1).await?;
        tx.set_sequence(table, 0).await?;
    }

    tx.commit().await?;
    info!("Cleaned {} tables", Table::ALL.len());
    Ok(())
}

/// Insert users with hashed passwords
///
/// The given values keep their plaintext passwords.
pub async fn seed_users(store: &dyn SeedStore, users: &[User]) -> StorageResult<()> {
    let mut tx = Transaction::begin(store, "seed_users").await?;
    insert_users(&mut tx, users).await?;
    tx.commit().await?;
    info!("Seeded {} users", users.len());
    Ok(())
}

/// Insert users, things and reviews in foreign-key order
pub async fn seed_things_tables(
    store: &dyn SeedStore,
    users: &[User],
    things: &[Thing],
    reviews: &[Review],
) -> StorageResult<()> {
    let mut tx = Transaction::begin(store, "seed_things_tables").await?;

    insert_users(&mut tx, users).await?;

    if !things.is_empty() {
        tx.insert_things(things).await?;
        advance_sequence(&mut tx, Table::Things, things.iter().map(|t| t.id)).await?;
    }

    if !reviews.is_empty() {
        tx.insert_reviews(reviews).await?;
        advance_sequence(&mut tx, Table::Reviews, reviews.iter().map(|r| r.id)).await?;
    }

    tx.commit().await?;
    info!(
        "Seeded {} users, {} things, {} reviews",
        users.len(),
        things.len(),
        reviews.len()
    );
    Ok(())
}

/// Insert one user and a raw, unsanitized thing
///
/// The thing keeps its explicit id and the things sequence is left alone.
pub async fn seed_malicious_thing(
    store: &dyn SeedStore,
    user: &User,
    thing: &Thing,
) -> StorageResult<()> {
    let mut tx = Transaction::begin(store, "seed_malicious_thing").await?;

    insert_users(&mut tx, std::slice::from_ref(user)).await?;
    tx.insert_things(std::slice::from_ref(thing)).await?;

    tx.commit().await?;
    info!("Seeded malicious thing {} for user {}", thing.id, user.user_name);
    Ok(())
}

/// Copies of `users` with bcrypt-hashed passwords
pub fn hash_passwords(users: &[User]) -> StorageResult<Vec<User>> {
    users
        .iter()
        .map(|user| -> StorageResult<User> {
            let hashed = bcrypt::hash(&user.password, PASSWORD_HASH_COST)?;
            Ok(user.with_password(hashed))
        })
        .collect()
}

async fn insert_users(tx: &mut Transaction, users: &[User]) -> StorageResult<()> {
    if users.is_empty() {
        return Ok(());
    }

    let prepped = hash_passwords(users)?;
    let inserted = tx.insert_users(&prepped).await?;
    debug!("Inserted {} user rows", inserted);

    advance_sequence(tx, Table::Users, users.iter().map(|u| u.id)).await
}

async fn advance_sequence(
    tx: &mut Transaction,
    table: Table,
    ids: impl Iterator<Item = i32>,
) -> StorageResult<()> {
    if let Some(max) = ids.max() {
        tx.set_sequence(table, i64::from(max)).await?;
        debug!("Advanced {} to {}", table.sequence(), max);
    }
    Ok(())
}

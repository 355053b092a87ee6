//! Postgres store backed by an sqlx pool

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Executor, Postgres, QueryBuilder, Row};
use thingful_api_types::{Review, Thing, User};
use thingful_config::{DatabaseConfig, Validatable};
use tracing::{debug, info};

use crate::connection::{SeedStore, SeedTransaction, Table};
use crate::StorageResult;

/// Postgres connection pool wrapper
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect using the database configuration
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        config.validate()?;
        info!("Connecting to test database");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    // fixture timestamps are UTC whether the columns carry a zone or not
                    conn.execute("SET TIME ZONE 'UTC'").await?;
                    Ok(())
                })
            })
            .connect(&config.url)
            .await?;

        debug!(
            "Database pool established with {} max connections",
            config.max_connections
        );

        Ok(Self { pool })
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        user_name: row.try_get("user_name")?,
        full_name: row.try_get("full_name")?,
        nickname: row.try_get::<Option<String>, _>("nickname")?.unwrap_or_default(),
        password: row.try_get("password")?,
        date_created: row.try_get("date_created")?,
        date_modified: row.try_get("date_modified")?,
    })
}

fn review_from_row(row: &PgRow) -> Result<Review, sqlx::Error> {
    Ok(Review {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        thing_id: row.try_get("thing_id")?,
        user_id: row.try_get("user_id")?,
        date_created: row.try_get("date_created")?,
    })
}

#[async_trait]
impl SeedStore for PgStore {
    async fn begin(&self) -> StorageResult<Box<dyn SeedTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgSeedTransaction { tx }))
    }

    async fn find_user(&self, id: i32) -> StorageResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, user_name, full_name, nickname, password, \
             date_created::timestamptz AS date_created, \
             date_modified::timestamptz AS date_modified \
             FROM thingful_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn find_review(&self, id: i32) -> StorageResult<Option<Review>> {
        let row = sqlx::query(
            "SELECT id, text, thing_id, user_id, date_created::timestamptz AS date_created \
             FROM thingful_reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(review_from_row).transpose()?)
    }

    async fn count(&self, table: Table) -> StorageResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table.name()))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Open Postgres transaction; sqlx rolls it back if dropped uncommitted
pub struct PgSeedTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl SeedTransaction for PgSeedTransaction {
    async fn truncate(&mut self, tables: &[Table]) -> StorageResult<()> {
        let names: Vec<&str> = tables.iter().map(Table::name).collect();
        sqlx::query(&format!("TRUNCATE {}", names.join(", ")))
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn reset_sequence(&mut self, table: Table, start: i64) -> StorageResult<()> {
        sqlx::query(&format!(
            "ALTER SEQUENCE {} MINVALUE 0 START WITH {}",
            table.sequence(),
            start
        ))
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn set_sequence(&mut self, table: Table, value: i64) -> StorageResult<()> {
        sqlx::query("SELECT setval($1::regclass, $2)")
            .bind(table.sequence())
            .bind(value)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn next_id(&mut self, table: Table) -> StorageResult<i64> {
        let id = sqlx::query_scalar::<_, i64>("SELECT nextval($1::regclass)")
            .bind(table.sequence())
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(id)
    }

    async fn insert_users(&mut self, users: &[User]) -> StorageResult<u64> {
        if users.is_empty() {
            return Ok(0);
        }

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO thingful_users \
             (id, user_name, full_name, nickname, password, date_created, date_modified) ",
        );
        query.push_values(users, |mut row, user| {
            row.push_bind(user.id)
                .push_bind(user.user_name.clone())
                .push_bind(user.full_name.clone())
                .push_bind(user.nickname.clone())
                .push_bind(user.password.clone())
                .push_bind(user.date_created)
                .push_bind(user.date_modified);
        });

        let result = query.build().execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    async fn insert_things(&mut self, things: &[Thing]) -> StorageResult<u64> {
        if things.is_empty() {
            return Ok(0);
        }

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO thingful_things (id, title, style, author_id, date_created, content) ",
        );
        query.push_values(things, |mut row, thing| {
            row.push_bind(thing.id)
                .push_bind(thing.title.clone())
                .push_bind(thing.style.clone())
                .push_bind(thing.author_id)
                .push_bind(thing.date_created)
                .push_bind(thing.content.clone());
        });

        let result = query.build().execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    async fn insert_reviews(&mut self, reviews: &[Review]) -> StorageResult<u64> {
        if reviews.is_empty() {
            return Ok(0);
        }

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO thingful_reviews (id, text, thing_id, user_id, date_created) ",
        );
        query.push_values(reviews, |mut row, review| {
            row.push_bind(review.id)
                .push_bind(review.text.clone())
                .push_bind(review.thing_id)
                .push_bind(review.user_id)
                .push_bind(review.date_created);
        });

        let result = query.build().execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StorageResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

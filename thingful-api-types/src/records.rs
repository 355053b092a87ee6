//! Persisted records for the three Thingful tables
//!
//! These mirror the rows stored in `thingful_users`, `thingful_things` and
//! `thingful_reviews`. Ids are explicit so fixtures can be seeded with stable
//! primary keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub user_name: String,
    pub full_name: String,
    pub nickname: String,
    /// Plaintext in fixtures, a bcrypt hash once seeded
    pub password: String,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub date_modified: Option<DateTime<Utc>>,
}

/// A thing authored by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thing {
    pub id: i32,
    pub title: String,
    /// Category label, e.g. "How-to"
    pub style: String,
    pub author_id: i32,
    pub date_created: DateTime<Utc>,
    /// Free text; may contain markup
    pub content: String,
}

/// A review left by a user on a thing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i32,
    pub text: String,
    pub thing_id: i32,
    pub user_id: i32,
    pub date_created: DateTime<Utc>,
}

impl User {
    /// Copy of this user with a different password value
    pub fn with_password(&self, password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            ..self.clone()
        }
    }
}

impl Thing {
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author_id == user.id
    }
}

impl Review {
    pub fn belongs_to(&self, thing_id: i32) -> bool {
        self.thing_id == thing_id
    }
}

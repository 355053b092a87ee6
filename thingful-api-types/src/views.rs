//! JSON views served by the Thingful API
//!
//! Timestamps are rendered the way the API serializes them: ISO-8601 in UTC
//! with millisecond precision and a `Z` suffix.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::records::{Review, Thing, User};

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn iso_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Public subset of a user, nested in thing and review views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i32,
    pub user_name: String,
    pub full_name: String,
    pub nickname: String,
    pub date_created: String,
    pub date_modified: Option<String>,
}

/// A thing joined with its author and review count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThingView {
    pub id: i32,
    pub style: String,
    pub title: String,
    pub content: String,
    pub date_created: String,
    pub number_of_reviews: usize,
    pub author: UserView,
}

/// A review joined with the user who wrote it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewView {
    pub id: i32,
    pub text: String,
    pub date_created: String,
    pub user: UserView,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.clone(),
            full_name: user.full_name.clone(),
            nickname: user.nickname.clone(),
            date_created: iso_timestamp(&user.date_created),
            date_modified: user.date_modified.as_ref().map(iso_timestamp),
        }
    }
}

impl ThingView {
    pub fn new(thing: &Thing, author: &User, number_of_reviews: usize) -> Self {
        Self {
            id: thing.id,
            style: thing.style.clone(),
            title: thing.title.clone(),
            content: thing.content.clone(),
            date_created: iso_timestamp(&thing.date_created),
            number_of_reviews,
            author: UserView::from(author),
        }
    }
}

impl ReviewView {
    pub fn new(review: &Review, user: &User) -> Self {
        Self {
            id: review.id,
            text: review.text.clone(),
            date_created: iso_timestamp(&review.date_created),
            user: UserView::from(user),
        }
    }
}

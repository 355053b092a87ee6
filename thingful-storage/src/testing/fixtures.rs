//! Deterministic fixture records
//!
//! Every call builds fresh values; nothing is shared between test cases.

use chrono::{DateTime, Utc};
use thingful_api_types::{Review, Thing, User};

/// Creation time shared by every fixture row: 2029-01-22T16:28:32.615Z
pub const FIXTURE_TIMESTAMP_MILLIS: i64 = 1_863_793_712_615;

/// Plaintext password given to every fixture user
pub const FIXTURE_PASSWORD: &str = "password";

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipisicing elit. Natus consequuntur deserunt commodi, nobis qui inventore corrupti iusto aliquid debitis unde non.Adipisci, pariatur.Molestiae, libero esse hic adipisci autem neque ?";

const THING_TITLES: [(&str, &str); 4] = [
    ("First test post!", "How-to"),
    ("Second test post!", "Interview"),
    ("Third test post!", "News"),
    ("Fourth test post!", "Listicle"),
];

const REVIEW_TEXTS: [&str; 7] = [
    "First test comment!",
    "Second test comment!",
    "Third test comment!",
    "Fourth test comment!",
    "Fifth test comment!",
    "Sixth test comment!",
    "Seventh test comment!",
];

/// The fixed fixture creation time
pub fn fixture_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(FIXTURE_TIMESTAMP_MILLIS).unwrap_or_default()
}

/// Four users with ids 1-4
pub fn make_users() -> Vec<User> {
    (1..=4)
        .map(|n| User {
            id: n,
            user_name: format!("test-user-{}", n),
            full_name: format!("Test user {}", n),
            nickname: format!("TU{}", n),
            password: FIXTURE_PASSWORD.to_string(),
            date_created: fixture_timestamp(),
            date_modified: None,
        })
        .collect()
}

/// Four things, the n-th authored by the n-th user
pub fn make_things(users: &[User]) -> Vec<Thing> {
    THING_TITLES
        .iter()
        .zip(users)
        .enumerate()
        .map(|(index, ((title, style), author))| Thing {
            id: index as i32 + 1,
            title: title.to_string(),
            style: style.to_string(),
            author_id: author.id,
            date_created: fixture_timestamp(),
            content: LOREM.to_string(),
        })
        .collect()
}

/// Seven reviews spread over the first and last things
///
/// Four go to the first thing (one per user), three to the last. Things in
/// between have none.
pub fn make_reviews(users: &[User], things: &[Thing]) -> Vec<Review> {
    let last = things.len().saturating_sub(1);
    // (thing index, user index)
    let placements = [(0, 0), (0, 1), (0, 2), (0, 3), (last, 0), (last, 2), (3, 0)];

    placements
        .iter()
        .zip(REVIEW_TEXTS)
        .enumerate()
        .filter_map(|(index, (&(thing, user), text))| {
            Some(Review {
                id: index as i32 + 1,
                text: text.to_string(),
                thing_id: things.get(thing)?.id,
                user_id: users.get(user)?.id,
                date_created: fixture_timestamp(),
            })
        })
        .collect()
}

/// Users, things and reviews built together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub things: Vec<Thing>,
    pub reviews: Vec<Review>,
}

pub fn make_fixtures() -> Fixtures {
    let users = make_users();
    let things = make_things(&users);
    let reviews = make_reviews(&users, &things);
    Fixtures { users, things, reviews }
}

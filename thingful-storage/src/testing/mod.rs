//! Fixtures and seeding for the endpoint suites
//!
//! - `fixtures` builds the deterministic users, things and reviews
//! - `expected` derives the JSON views the API should serve for them
//! - `malicious` builds the markup-laden thing used by the sanitization cases
//! - `seeder` cleans and seeds any [`SeedStore`](crate::SeedStore)

pub mod expected;
pub mod fixtures;
pub mod malicious;
pub mod seeder;

pub use expected::{expected_thing, expected_thing_reviews, FixtureError};
pub use fixtures::{
    fixture_timestamp, make_fixtures, make_reviews, make_things, make_users, Fixtures,
    FIXTURE_PASSWORD,
};
pub use malicious::{
    make_malicious_thing, make_malicious_thing_at, MaliciousThing, MALICIOUS_THING_ID,
};
pub use seeder::{
    clean_tables, hash_passwords, seed_malicious_thing, seed_things_tables, seed_users,
};

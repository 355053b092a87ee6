//! Shared types for the Thingful API test suites
//!
//! This crate provides the row records seeded into the database, the JSON
//! views the API serves for them, and the bodies exchanged when creating a
//! review.

pub mod records;
pub mod requests;
pub mod views;

// Re-export main types for convenience
pub use records::{Review, Thing, User};
pub use requests::{CreatedReview, ErrorBody, NewReview, ReviewAuthor};
pub use views::{iso_timestamp, ReviewView, ThingView, UserView};

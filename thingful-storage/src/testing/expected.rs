//! Views the API is expected to serve for fixture records

use thingful_api_types::{Review, ReviewView, Thing, ThingView, User};
use thiserror::Error;

/// A fixture row points at a user missing from the given list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    #[error("thing {thing_id} has no author with id {author_id}")]
    MissingAuthor { thing_id: i32, author_id: i32 },

    #[error("review {review_id} has no user with id {user_id}")]
    MissingCommenter { review_id: i32, user_id: i32 },
}

/// The view served for `thing`, counting the reviews that belong to it
pub fn expected_thing(
    users: &[User],
    thing: &Thing,
    reviews: &[Review],
) -> Result<ThingView, FixtureError> {
    let author = users
        .iter()
        .find(|user| thing.is_authored_by(user))
        .ok_or(FixtureError::MissingAuthor {
            thing_id: thing.id,
            author_id: thing.author_id,
        })?;

    let number_of_reviews = reviews.iter().filter(|review| review.belongs_to(thing.id)).count();

    Ok(ThingView::new(thing, author, number_of_reviews))
}

/// The views served for a thing's reviews, in fixture order
pub fn expected_thing_reviews(
    users: &[User],
    thing_id: i32,
    reviews: &[Review],
) -> Result<Vec<ReviewView>, FixtureError> {
    reviews
        .iter()
        .filter(|review| review.belongs_to(thing_id))
        .map(|review| {
            let user = users.iter().find(|user| user.id == review.user_id).ok_or(
                FixtureError::MissingCommenter {
                    review_id: review.id,
                    user_id: review.user_id,
                },
            )?;
            Ok(ReviewView::new(review, user))
        })
        .collect()
}

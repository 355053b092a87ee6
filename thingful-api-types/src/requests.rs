//! Request and response bodies for `POST /api/reviews`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body accepted by `POST /api/reviews`
///
/// The API still names the thing reference `article_id` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub text: String,
    pub article_id: i32,
}

impl NewReview {
    /// Fields the API rejects the request without, in validation order
    pub const REQUIRED_FIELDS: [&'static str; 2] = ["text", "article_id"];

    pub fn new(text: impl Into<String>, article_id: i32) -> Self {
        Self {
            text: text.into(),
            article_id,
        }
    }

    /// JSON body of this review with one field left out
    pub fn body_without(&self, field: &str) -> Value {
        let mut body = self.to_body();
        if let Value::Object(map) = &mut body {
            map.remove(field);
        }
        body
    }

    pub fn to_body(&self) -> Value {
        serde_json::json!({
            "text": self.text,
            "article_id": self.article_id,
        })
    }
}

/// The reviewer reference returned with a created review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub id: i32,
}

/// Body returned with `201 Created`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedReview {
    pub id: i32,
    pub text: String,
    pub article_id: i32,
    pub user: ReviewAuthor,
    pub date_created: DateTime<Utc>,
}

impl CreatedReview {
    /// Path the `Location` header should point at
    pub fn location(&self) -> String {
        format!("/api/reviews/{}", self.id)
    }
}

/// `{ "error": "..." }` body used for 400 and 404 responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn thing_not_found() -> Self {
        Self::new("thing doesn't exist")
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(format!("Missing '{}' in request body", field))
    }
}

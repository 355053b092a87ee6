//! # Thingful Web Utilities
//!
//! Authentication helpers shared by the endpoint suites: HS256 bearer tokens
//! carrying a user's id and name, their verification, and `Authorization`
//! header parsing.
//!
//! ## Example
//!
//! ```rust
//! use thingful_web::{make_auth_header, TokenMinter};
//! # use chrono::Utc;
//! # use thingful_api_types::User;
//! # let user = User {
//! #     id: 1,
//! #     user_name: "test-user-1".to_string(),
//! #     full_name: "Test user 1".to_string(),
//! #     nickname: "TU1".to_string(),
//! #     password: "password".to_string(),
//! #     date_created: Utc::now(),
//! #     date_modified: None,
//! # };
//!
//! let header = make_auth_header(&user, "secret").unwrap();
//! let claims = TokenMinter::new("secret").verify_header(&header).unwrap();
//! assert_eq!(claims.user_id, 1);
//! ```

pub mod auth;
pub mod errors;

// Re-export commonly used items
pub use auth::{bearer_token, make_auth_header, TokenClaims, TokenMinter};
pub use errors::{WebError, WebResult};

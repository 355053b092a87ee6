//! JWT bearer tokens
//!
//! Tokens are signed with HS256 over a shared secret. The payload carries the
//! user's id as `user_id`, their `user_name` as the subject and the issue
//! time. They carry no expiry, so verification does not require one.

use chrono::Utc;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thingful_api_types::User;
use tracing::{debug, warn};

use crate::errors::{WebError, WebResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Claims encoded in a Thingful token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Id of the authenticated user
    pub user_id: i32,
    /// Subject (user name)
    pub sub: String,
    /// Issued at
    pub iat: i64,
}

impl TokenClaims {
    /// Claims for `user`, issued now
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            sub: user.user_name.clone(),
            iat: Utc::now().timestamp(),
        }
    }

    /// Whether these claims identify `user`
    pub fn identifies(&self, user: &User) -> bool {
        self.user_id == user.id && self.sub == user.user_name
    }
}

/// Signs and verifies tokens with one secret
#[derive(Clone)]
pub struct TokenMinter {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenMinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMinter").finish_non_exhaustive()
    }
}

impl TokenMinter {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token for `user`
    pub fn mint(&self, user: &User) -> WebResult<String> {
        let claims = TokenClaims::for_user(user);
        let header = Header::new(Algorithm::HS256);

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| WebError::internal(format!("Failed to generate JWT token: {}", e)))?;
        debug!("Minted token for user {}", user.user_name);
        Ok(token)
    }

    /// `Authorization` header value for `user`
    pub fn auth_header(&self, user: &User) -> WebResult<String> {
        Ok(format!("{}{}", BEARER_PREFIX, self.mint(user)?))
    }

    /// Verify the signature and decode the claims
    ///
    /// A token without a subject is rejected. Whether the claims belong to a
    /// given user is left to [`TokenClaims::identifies`].
    pub fn verify(&self, token: &str) -> WebResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            warn!("JWT verification failed: {}", e);
            WebError::unauthorized("Invalid token")
        })?;

        if token_data.claims.sub.is_empty() {
            return Err(WebError::unauthorized("Token has no subject"));
        }

        Ok(token_data.claims)
    }

    /// Verify a full `Bearer <token>` header value
    pub fn verify_header(&self, header: &str) -> WebResult<TokenClaims> {
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or_else(|| WebError::unauthorized("Missing bearer token"))?;
        self.verify(token)
    }
}

/// Sign a token for `user` with `secret` and format it as a bearer header value
pub fn make_auth_header(user: &User, secret: &str) -> WebResult<String> {
    TokenMinter::new(secret).auth_header(user)
}

/// Extract the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

//! Settings for reaching the API under test

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_url, Validatable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root the `/api/...` paths are resolved against
    pub base_url: String,

    /// Per-request timeout
    #[serde(with = "crate::domains::utils::serde_duration", default = "default_request_timeout")]
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Validatable for ApiConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.base_url, &["http", "https"], "base_url", self.domain_name())?;
        validate_positive(self.request_timeout.as_secs(), "request_timeout", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "api"
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

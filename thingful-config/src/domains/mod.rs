//! Domain-specific configuration modules

pub mod api;
pub mod auth;
pub mod database;
pub mod logging;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Everything the endpoint suites need to reach the database and the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThingfulConfig {
    /// Database the fixtures are seeded into (absent: suites are skipped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<database::DatabaseConfig>,

    /// API under test (absent: suites are skipped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<api::ApiConfig>,

    /// Token signing
    pub auth: auth::AuthConfig,

    /// Logging
    pub logging: logging::LoggingConfig,
}

impl ThingfulConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        if let Some(ref database) = self.database {
            database.validate()?;
        }

        if let Some(ref api) = self.api {
            api.validate()?;
        }

        self.auth.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// The database and the API, when both are configured
    pub fn targets(&self) -> Option<(&database::DatabaseConfig, &api::ApiConfig)> {
        Some((self.database.as_ref()?, self.api.as_ref()?))
    }
}

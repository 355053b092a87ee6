//! Configuration loading and environment variable handling

use crate::domains::api::ApiConfig;
use crate::domains::database::DatabaseConfig;
use crate::domains::ThingfulConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::time::Duration;

/// Configuration loader with environment variable support
///
/// Variables are read as `<PREFIX>_<NAME>`. The database URL, API base URL
/// and JWT secret also fall back to the unprefixed `TEST_DB_URL`,
/// `API_BASE_URL` and `JWT_SECRET` used by existing test setups.
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "THINGFUL".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML (or `.json`) file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<ThingfulConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: ThingfulConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<ThingfulConfig> {
        let mut config = ThingfulConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<ThingfulConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut ThingfulConfig) -> ConfigResult<()> {
        self.apply_database_overrides(&mut config.database)?;
        self.apply_api_overrides(&mut config.api)?;

        if let Some(secret) = self.get_env_var_or_unprefixed("JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }

        if let Ok(level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }

    fn apply_database_overrides(&self, database: &mut Option<DatabaseConfig>) -> ConfigResult<()> {
        if let Some(url) = self.get_env_var_or_unprefixed("TEST_DB_URL") {
            match database {
                Some(existing) => existing.url = url,
                None => *database = Some(DatabaseConfig::new(url)),
            }
        }

        let Some(database) = database.as_mut() else {
            return Ok(());
        };

        if let Ok(max) = self.get_env_var("DB_MAX_CONNECTIONS") {
            database.max_connections = max
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?;
        }

        if let Ok(timeout) = self.get_env_var("DB_CONNECT_TIMEOUT") {
            database.connection_timeout = self.parse_seconds("DB_CONNECT_TIMEOUT", &timeout)?;
        }

        Ok(())
    }

    fn apply_api_overrides(&self, api: &mut Option<ApiConfig>) -> ConfigResult<()> {
        if let Some(base_url) = self.get_env_var_or_unprefixed("API_BASE_URL") {
            match api {
                Some(existing) => existing.base_url = base_url,
                None => *api = Some(ApiConfig::new(base_url)),
            }
        }

        if let (Some(api), Ok(timeout)) = (api.as_mut(), self.get_env_var("HTTP_TIMEOUT")) {
            api.request_timeout = self.parse_seconds("HTTP_TIMEOUT", &timeout)?;
        }

        Ok(())
    }

    fn parse_seconds(&self, name: &str, value: &str) -> ConfigResult<Duration> {
        let seconds: u64 = value
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e)))?;
        Ok(Duration::from_secs(seconds))
    }

    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }

    fn get_env_var_or_unprefixed(&self, name: &str) -> Option<String> {
        self.get_env_var(name)
            .or_else(|_| std::env::var(name))
            .ok()
            .filter(|value| !value.is_empty())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

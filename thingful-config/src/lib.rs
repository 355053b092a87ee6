//! Configuration for the Thingful endpoint suites
//!
//! This crate splits configuration by domain (database, API, auth, logging),
//! with validation, defaults, and environment variable support.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    api::ApiConfig, auth::AuthConfig, database::DatabaseConfig, logging::LoggingConfig,
    ThingfulConfig,
};

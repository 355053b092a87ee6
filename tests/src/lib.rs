//! Harness for the Thingful endpoint suites
//!
//! The suites run against a live API and the Postgres database behind it.
//! Both are located through the environment (see `thingful_config::ConfigLoader`);
//! when either is missing the suites skip themselves.

pub mod api_client;
pub mod retry_policy;
pub mod test_context;
pub mod test_logging;

pub use api_client::{ApiClient, ApiResponse};
pub use retry_policy::RetryPolicy;
pub use test_context::{run_case, TestContext};
pub use test_logging::init_test_logging;

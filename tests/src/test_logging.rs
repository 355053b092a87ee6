//! Logging setup shared by every suite

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a quiet subscriber once per process
///
/// `RUST_LOG` wins when set; otherwise our crates log at `level` and the
/// database and HTTP stacks are silenced.
pub fn init_test_logging(level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{},sqlx=off,hyper=off,h2=off,reqwest=off,rustls=off", level))
        });

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .without_time()
            .try_init();
    });
}

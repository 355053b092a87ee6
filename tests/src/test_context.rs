//! Per-suite context: database, HTTP client and token minter

use anyhow::{Context, Result};
use std::future::Future;
use thingful_api_types::User;
use thingful_config::ConfigLoader;
use thingful_storage::testing::clean_tables;
use thingful_storage::{PgStore, SeedStore};
use thingful_web::TokenMinter;
use tracing::{info, warn};

use crate::api_client::ApiClient;
use crate::retry_policy::RetryPolicy;
use crate::test_logging::init_test_logging;

/// Optional path to a YAML file read before the environment
pub const CONFIG_PATH_VAR: &str = "THINGFUL_CONFIG";

pub struct TestContext {
    pub store: PgStore,
    pub client: ApiClient,
    pub minter: TokenMinter,
}

impl TestContext {
    /// Build the context from the environment
    ///
    /// Returns `None` when the database URL or the API base URL is not
    /// configured, so suites can skip instead of failing.
    pub async fn from_env() -> Result<Option<Self>> {
        let config_path = std::env::var_os(CONFIG_PATH_VAR);
        let config = ConfigLoader::new()
            .load(config_path.as_ref())
            .context("Failed to load test configuration")?;

        init_test_logging(&config.logging.level);

        let Some((database, api)) = config.targets() else {
            eprintln!(
                "Skipping endpoint suite: set THINGFUL_TEST_DB_URL and THINGFUL_API_BASE_URL to run it"
            );
            return Ok(None);
        };

        let store = PgStore::connect(database)
            .await
            .context("Failed to connect to the test database")?;
        let client = ApiClient::new(api)?;
        let minter = TokenMinter::new(&config.auth.jwt_secret);

        info!("Endpoint suite targeting {}", api.base_url);
        Ok(Some(Self {
            store,
            client,
            minter,
        }))
    }

    /// Close the database pool
    pub async fn close(self) {
        self.store.close().await;
    }

    pub fn store(&self) -> &dyn SeedStore {
        &self.store
    }

    /// `Authorization` header value for `user`
    pub fn auth_header(&self, user: &User) -> Result<String> {
        Ok(self.minter.auth_header(user)?)
    }

    /// Run one case against this context's database; see [`run_case`]
    pub async fn run<F, Fut>(&self, name: &str, policy: &RetryPolicy, case: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        run_case(self.store(), name, policy, case).await
    }
}

/// Run one case between table cleanups, retrying as `policy` allows
///
/// Tables are cleaned before every attempt and after it, whatever the
/// outcome. A failed cleanup is fatal, never retried, and always reported.
pub async fn run_case<F, Fut>(
    store: &dyn SeedStore,
    name: &str,
    policy: &RetryPolicy,
    mut case: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        clean_tables(store)
            .await
            .with_context(|| format!("Cleanup before {} failed", name))?;

        let outcome = case().await;
        let cleanup = clean_tables(store).await;

        let err = match (outcome, cleanup) {
            (Ok(()), Ok(())) => return Ok(()),
            (Ok(()), Err(cleanup_err)) => {
                return Err(anyhow::Error::new(cleanup_err)
                    .context(format!("Cleanup after {} failed", name)));
            }
            (Err(err), Err(cleanup_err)) => {
                return Err(err.context(format!(
                    "{} failed on attempt {} and the cleanup after it also failed: {}",
                    name, attempt, cleanup_err
                )));
            }
            (Err(err), Ok(())) => err,
        };

        if !policy.allows_retry(attempt) {
            return Err(err.context(format!("{} failed after {} attempt(s)", name, attempt)));
        }
        warn!("{} failed on attempt {}: {:#}; retrying", name, attempt, err);
        tokio::time::sleep(policy.delay_for_attempt(attempt)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, bail};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use thingful_api_types::Review;
    use thingful_storage::testing::{make_users, seed_users};
    use thingful_storage::{InMemoryStore, SeedTransaction, StorageError, StorageResult, Table};

    /// In-memory store whose transactions stop opening after `allowed` begins
    struct FailingStore {
        inner: InMemoryStore,
        allowed: u32,
        begun: AtomicU32,
    }

    impl FailingStore {
        fn new(allowed: u32) -> Self {
            Self {
                inner: InMemoryStore::new(),
                allowed,
                begun: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl SeedStore for FailingStore {
        async fn begin(&self) -> StorageResult<Box<dyn SeedTransaction>> {
            if self.begun.fetch_add(1, Ordering::SeqCst) >= self.allowed {
                return Err(StorageError::ConnectionFailed("connection reset".to_string()));
            }
            self.inner.begin().await
        }

        async fn find_user(&self, id: i32) -> StorageResult<Option<User>> {
            self.inner.find_user(id).await
        }

        async fn find_review(&self, id: i32) -> StorageResult<Option<Review>> {
            self.inner.find_review(id).await
        }

        async fn count(&self, table: Table) -> StorageResult<i64> {
            self.inner.count(table).await
        }
    }

    fn quick_retries(retries: u32) -> RetryPolicy {
        RetryPolicy::with_retries(retries).with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_tables_cleaned_after_passing_case() {
        let store = InMemoryStore::new();
        let users = make_users();
        let (seeded, users) = (&store, &users);

        run_case(&store, "seeds users", &RetryPolicy::once(), || async move {
            seed_users(seeded, users).await?;
            assert_eq!(seeded.count(Table::Users).await?, 4);
            Ok::<(), anyhow::Error>(())
        })
        .await
        .unwrap();

        assert_eq!(store.count(Table::Users).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_retries_until_the_case_passes() {
        let store = InMemoryStore::new();
        let calls = AtomicU32::new(0);
        let counter = &calls;

        run_case(&store, "flaky", &quick_retries(3), || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                bail!("clock tick");
            }
            Ok::<(), anyhow::Error>(())
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_case_error_reported_after_last_attempt() {
        let store = InMemoryStore::new();

        let err = run_case(&store, "always fails", &quick_retries(1), || async {
            Err::<(), _>(anyhow!("wrong status"))
        })
        .await
        .unwrap_err();

        let report = format!("{:#}", err);
        assert!(report.contains("always fails failed after 2 attempt(s)"), "{}", report);
        assert!(report.contains("wrong status"), "{}", report);
    }

    #[tokio::test]
    async fn test_cleanup_failure_after_failing_case_is_reported() {
        // the cleanup before the case opens the only transaction allowed
        let store = FailingStore::new(1);
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let err = run_case(&store, "breaks the pool", &quick_retries(3), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(anyhow!("wrong status"))
        })
        .await
        .unwrap_err();

        let report = format!("{:#}", err);
        assert!(report.contains("wrong status"), "{}", report);
        assert!(report.contains("cleanup after it also failed"), "{}", report);
        assert!(report.contains("connection reset"), "{}", report);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "a failed cleanup must not be retried");
    }

    #[tokio::test]
    async fn test_cleanup_failure_after_passing_case_is_fatal() {
        let store = FailingStore::new(1);

        let err = run_case(&store, "passes", &quick_retries(3), || async {
            Ok::<(), anyhow::Error>(())
        })
        .await
        .unwrap_err();

        let report = format!("{:#}", err);
        assert!(report.contains("Cleanup after passes failed"), "{}", report);
        assert!(report.contains("connection reset"), "{}", report);
    }

    #[tokio::test]
    async fn test_cleanup_failure_before_case_skips_it() {
        let store = FailingStore::new(0);
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let err = run_case(&store, "never runs", &RetryPolicy::once(), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<(), anyhow::Error>(())
        })
        .await
        .unwrap_err();

        assert!(format!("{:#}", err).contains("Cleanup before never runs failed"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

use crate::adapters::{build_providers, http::build_client};
use crate::core::deadline::DeadlineGovernor;
use crate::core::race::RaceAggregator;
use crate::core::{ConfigProvider, LookupKey, LookupOutcome, Provider};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Entry point for a single postal-code lookup. Holds no per-request state;
/// every call gets its own deadline and completion channel.
#[derive(Clone)]
pub struct LookupService {
    providers: Vec<Arc<dyn Provider>>,
    governor: DeadlineGovernor,
    aggregator: RaceAggregator,
}

impl LookupService {
    pub fn new(providers: Vec<Arc<dyn Provider>>, timeout: Duration) -> Self {
        Self {
            providers,
            governor: DeadlineGovernor::new(timeout),
            aggregator: RaceAggregator::new(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = build_client()?;
        let providers = build_providers(config, client);
        Ok(Self::new(
            providers,
            Duration::from_millis(config.timeout_ms()),
        ))
    }

    pub fn timeout(&self) -> Duration {
        self.governor.timeout()
    }

    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    pub async fn lookup(&self, key: &LookupKey) -> Result<LookupOutcome> {
        self.lookup_within(key, &CancellationToken::new()).await
    }

    /// Looks up `key` inside the caller's cancellation `scope`. Cancelling the
    /// scope, or dropping this future, ends the deadline for every provider.
    pub async fn lookup_within(
        &self,
        key: &LookupKey,
        scope: &CancellationToken,
    ) -> Result<LookupOutcome> {
        tracing::debug!("Looking up {} across {} providers", key, self.providers.len());

        let (deadline, guard) = self.governor.acquire(scope);
        let outcome = self.aggregator.race(&self.providers, key, &deadline).await;
        guard.release();

        if scope.is_cancelled() {
            tracing::info!("Lookup for {} cancelled by caller", key);
        }
        outcome
    }

    pub fn in_flight(&self) -> usize {
        self.aggregator.in_flight()
    }

    /// Waits for straggler provider tasks before the process exits.
    pub async fn shutdown(&self) {
        tracing::info!(
            "Waiting for {} provider tasks to finish",
            self.aggregator.in_flight()
        );
        self.aggregator.drain().await;
    }
}

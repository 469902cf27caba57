use crate::core::deadline::{Deadline, DeadlineGovernor};
use crate::domain::model::{LookupKey, LookupOutcome, ProviderName, ProviderPayload};
use crate::domain::ports::Provider;
use crate::utils::error::{LookupError, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

enum Report {
    Payload(ProviderPayload),
    Defect(ProviderName, LookupError),
}

/// Runs every provider concurrently and keeps the first payload to arrive.
///
/// Provider tasks are spawned on a shared [`TaskTracker`] rather than tied to
/// the race, so losers keep running after the winner is returned. They see
/// the deadline end once the caller releases it and finish on their own.
#[derive(Debug, Clone, Default)]
pub struct RaceAggregator {
    tracker: TaskTracker,
}

impl RaceAggregator {
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
        }
    }

    /// Provider tasks still running, stragglers from settled races included.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stops accepting work and waits for every provider task to finish.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Races `providers` under a fresh deadline of `timeout`.
    pub async fn race_for(
        &self,
        providers: &[Arc<dyn Provider>],
        key: &LookupKey,
        timeout: Duration,
    ) -> Result<LookupOutcome> {
        let (deadline, guard) = DeadlineGovernor::with_deadline(&CancellationToken::new(), timeout);
        let outcome = self.race(providers, key, &deadline).await;
        guard.release();
        outcome
    }

    pub async fn race(
        &self,
        providers: &[Arc<dyn Provider>],
        key: &LookupKey,
        deadline: &Deadline,
    ) -> Result<LookupOutcome> {
        let started = Instant::now();
        // One slot per provider: each task sends at most once, so a straggler
        // never waits on a receiver that has stopped reading.
        let (tx, mut rx) = mpsc::channel::<Report>(providers.len().max(1));

        for provider in providers {
            let provider = Arc::clone(provider);
            let key = key.clone();
            let deadline = deadline.clone();
            let tx = tx.clone();

            self.tracker.spawn(async move {
                let name = provider.name();
                let report = match provider.fetch(&key, &deadline).await {
                    Ok(Some(payload)) => Report::Payload(payload),
                    Ok(None) => {
                        tracing::debug!("{} produced no result for {}", name, key);
                        return;
                    }
                    Err(e) => Report::Defect(name, e),
                };

                if tx.send(report).await.is_err() {
                    tracing::debug!("{} finished after the race for {} settled", name, key);
                }
            });
        }
        drop(tx);

        let mut defect: Option<LookupError> = None;
        let mut exhausted = false;

        loop {
            tokio::select! {
                report = rx.recv(), if !exhausted => match report {
                    Some(Report::Payload(payload)) => {
                        tracing::info!(
                            "{} answered {} first after {:?}",
                            payload.source(),
                            key,
                            started.elapsed()
                        );
                        if let Ok(pretty) = serde_json::to_string_pretty(&payload) {
                            tracing::debug!("Winning payload for {}:\n{}", key, pretty);
                        }
                        return Ok(LookupOutcome::Resolved(payload));
                    }
                    Some(Report::Defect(name, e)) => {
                        tracing::error!("{} could not be queried for {}: {}", name, key, e);
                        defect.get_or_insert(e);
                    }
                    None => {
                        if let Some(e) = defect.take() {
                            return Err(e);
                        }
                        // No provider can answer any more; hold until the deadline.
                        exhausted = true;
                    }
                },
                _ = deadline.expired() => {
                    if let Some(e) = defect.take() {
                        return Err(e);
                    }
                    tracing::warn!("No provider answered {} within {:?}", key, started.elapsed());
                    return Ok(LookupOutcome::TimedOut);
                }
            }
        }
    }
}

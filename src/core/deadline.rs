//! Request-scoped deadlines.
//!
//! A [`Deadline`] is a child of the caller's cancellation scope with an
//! absolute expiry attached. It ends when the expiry passes, when the caller
//! cancels, or when the owning [`DeadlineGuard`] is dropped, whichever comes
//! first. Every provider call selects on [`Deadline::expired`], so ending the
//! deadline reaches all in-flight requests.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct Deadline {
    token: CancellationToken,
    expires_at: Instant,
}

impl Deadline {
    /// Resolves once the deadline has passed or the scope was cancelled.
    pub async fn expired(&self) {
        tokio::select! {
            _ = tokio::time::sleep_until(self.expires_at) => {}
            _ = self.token.cancelled() => {}
        }
    }

    pub fn is_expired(&self) -> bool {
        self.token.is_cancelled() || Instant::now() >= self.expires_at
    }

    /// True only when the scope was cancelled, as opposed to timing out.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Ends the deadline on drop, cancelling whatever still waits on it.
#[derive(Debug)]
pub struct DeadlineGuard {
    token: CancellationToken,
}

impl DeadlineGuard {
    pub fn release(self) {}
}

impl Drop for DeadlineGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeadlineGovernor {
    timeout: Duration,
}

impl DeadlineGovernor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn acquire(&self, parent: &CancellationToken) -> (Deadline, DeadlineGuard) {
        Self::with_deadline(parent, self.timeout)
    }

    pub fn with_deadline(
        parent: &CancellationToken,
        duration: Duration,
    ) -> (Deadline, DeadlineGuard) {
        let token = parent.child_token();
        let deadline = Deadline {
            token: token.clone(),
            expires_at: Instant::now() + duration,
        };
        (deadline, DeadlineGuard { token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_expires_after_duration() {
        let parent = CancellationToken::new();
        let (deadline, _guard) = DeadlineGovernor::with_deadline(&parent, Duration::from_millis(50));

        assert!(!deadline.is_expired());
        let started = std::time::Instant::now();
        deadline.expired().await;

        assert!(started.elapsed() >= Duration::from_millis(45));
        assert!(deadline.is_expired());
        assert!(!deadline.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_parent_cancellation_reaches_deadline() {
        let parent = CancellationToken::new();
        let (deadline, _guard) = DeadlineGovernor::with_deadline(&parent, Duration::from_secs(30));

        parent.cancel();

        let ended = tokio::time::timeout(Duration::from_millis(100), deadline.expired()).await;
        assert!(ended.is_ok());
        assert!(deadline.is_cancelled());
    }

    #[tokio::test]
    async fn test_releasing_guard_ends_deadline_but_not_parent() {
        let parent = CancellationToken::new();
        let governor = DeadlineGovernor::new(Duration::from_secs(30));
        let (deadline, guard) = governor.acquire(&parent);

        guard.release();

        assert!(deadline.is_expired());
        assert!(!parent.is_cancelled());
        assert!(deadline.remaining() > Duration::from_secs(29));
    }
}

//! Per-round cancellation, generalizing the teacher's service-wide
//! shutdown `CancellationToken` (`oprf-service-example`'s
//! `spawn_shutdown_task`) to one scope per `RoundId`.

use std::time::Duration;

use fedhier_types::RoundId;
use tokio_util::sync::CancellationToken;

/// Bounds a round's lifetime: every outbound request issued while
/// processing `round` is cancellable via `token`, and the round
/// self-cancels after `deadline` elapses.
pub struct RoundContext {
    round: RoundId,
    token: CancellationToken,
    deadline: Duration,
}

impl RoundContext {
    pub fn new(round: RoundId, deadline: Duration) -> Self {
        let token = CancellationToken::new();
        let deadline_token = token.clone();
        let deadline_copy = deadline;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(deadline_copy) => deadline_token.cancel(),
                _ = deadline_token.cancelled() => {}
            }
        });
        Self {
            round,
            token,
            deadline,
        }
    }

    pub fn round(&self) -> RoundId {
        self.round
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Aborts the round: pending requests are cancelled via the token;
    /// callers are responsible for clearing their own buffers.
    pub fn abort(&self) {
        self.token.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn abort_cancels_the_token() {
        let ctx = RoundContext::new(RoundId::new(1), Duration::from_secs(10));
        assert!(!ctx.is_aborted());
        ctx.abort();
        assert!(ctx.is_aborted());
    }

    #[tokio::test]
    async fn deadline_self_cancels() {
        let ctx = RoundContext::new(RoundId::new(1), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(ctx.is_aborted());
    }
}

//! The error taxonomy from `spec.md` §7, shared by every role so a
//! handler's failure maps uniformly onto an HTTP status and a
//! retry/no-retry decision at the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    /// Bad signature, unverifiable PoW, unknown issuer. Dropped at the
    /// receiver; logged; never retried by the sender.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// Malformed share, out-of-range indices, size bound violation.
    /// Same treatment as `AuthFailure`.
    #[error("integrity check failed: {0}")]
    IntegrityFailure(String),

    /// `RoundId` mismatch. No-op: the request is dropped without
    /// mutating any state.
    #[error("stale round: request carried {request_round}, current is {current_round}")]
    StaleRound {
        request_round: u64,
        current_round: u64,
    },

    /// Network timeout, connection refused. Caller retries with
    /// exponential backoff up to a bounded attempt count.
    #[error("transient transport failure: {0}")]
    TransientTransport(String),

    /// Insufficient approvals/partials before the round deadline. The
    /// round aborts and state rewinds to the last good global model.
    #[error("quorum unmet: needed {needed}, got {got}")]
    QuorumUnmet { needed: u32, got: u32 },

    /// Fewer than `k` valid shares for a facility. That facility is
    /// skipped for the round.
    #[error("reconstruction failed: {0}")]
    ReconstructionFailure(String),

    /// Internal invariant violated. The process aborts with a
    /// diagnostic; there is no recovery path.
    #[error("fatal invariant violation: {0}")]
    Fatal(String),
}

impl RoundError {
    /// Whether a sender should retry the request that produced this
    /// error. Only `TransientTransport` is retryable; every other kind
    /// reflects a decision that re-sending the same bytes cannot undo.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RoundError::TransientTransport(_))
    }
}

impl IntoResponse for RoundError {
    fn into_response(self) -> Response {
        let status = match &self {
            RoundError::AuthFailure(_) => StatusCode::UNAUTHORIZED,
            RoundError::IntegrityFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RoundError::StaleRound { .. } => StatusCode::CONFLICT,
            RoundError::TransientTransport(_) => StatusCode::SERVICE_UNAVAILABLE,
            RoundError::QuorumUnmet { .. } => StatusCode::GATEWAY_TIMEOUT,
            RoundError::ReconstructionFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RoundError::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(error = %self, %status, "request failed");
        (status, self.to_string()).into_response()
    }
}

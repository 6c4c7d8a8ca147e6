//! Shared service plumbing for the five role binaries: the error
//! taxonomy, a retrying HTTP client, round-scoped cancellation, CLI
//! config fragments, tracing bootstrap, graceful shutdown, and the
//! `LocalTrainer` collaborator trait.

pub mod config;
pub mod error;
pub mod observability;
pub mod retry;
pub mod round;
pub mod shutdown;
pub mod trainer;

pub use config::{Environment, SharedConfig};
pub use error::RoundError;
pub use round::RoundContext;
pub use trainer::{DeterministicTrainer, LocalTrainer, LocalTrainerService, TrainingOutcome};

//! The `LocalTrainer` collaborator a facility invokes for local
//! training, per `spec.md` §1 ("the facility invokes an opaque
//! `LocalTrainer` returning a weight vector and local metrics").
//!
//! Modeled on `oprf-service`'s `SecretManager` dyn-trait pattern: a
//! `Send + Sync` trait object so the same instance can be shared across
//! concurrent request handlers.

use std::sync::Arc;

use async_trait::async_trait;
use fedhier_types::model::WeightVector;

/// Dynamic trait object for a facility's local training collaborator.
pub type LocalTrainerService = Arc<dyn LocalTrainer + Send + Sync>;

/// Local metrics reported alongside the trained weights. Opaque to the
/// pipeline; logged for operators, never inspected by any role.
#[derive(Debug, Clone, Default)]
pub struct TrainingOutcome {
    pub weights: Option<WeightVector>,
    pub loss: f64,
    pub samples_seen: u64,
}

impl TrainingOutcome {
    pub fn weights(&self) -> &WeightVector {
        self.weights
            .as_ref()
            .expect("trainer implementations always populate weights")
    }
}

/// Trait implementations of local training must provide. Real neural
/// network training, MNIST I/O, and metric computation are external
/// collaborators this pipeline never implements (`spec.md` §1).
#[async_trait]
pub trait LocalTrainer {
    /// Trains starting from `initial_weights` for `epochs` epochs with
    /// the given `batch_size`, returning the resulting weights and
    /// local metrics.
    async fn fit(
        &self,
        initial_weights: &WeightVector,
        epochs: u32,
        batch_size: u32,
    ) -> eyre::Result<TrainingOutcome>;
}

/// A deterministic `LocalTrainer` test double: nudges every weight by a
/// fixed, seedable offset so test assertions can predict the resulting
/// global model exactly, without depending on any real training loop.
pub struct DeterministicTrainer {
    pub offset: f32,
}

#[async_trait]
impl LocalTrainer for DeterministicTrainer {
    async fn fit(
        &self,
        initial_weights: &WeightVector,
        _epochs: u32,
        _batch_size: u32,
    ) -> eyre::Result<TrainingOutcome> {
        let mut weights = initial_weights.clone();
        for layer in weights.layers.iter_mut() {
            for value in layer.values.iter_mut() {
                *value += self.offset;
            }
        }
        Ok(TrainingOutcome {
            weights: Some(weights),
            loss: 0.0,
            samples_seen: 1,
        })
    }
}

//! Weight vectors and the aggregation entities built from them.

use serde::{Deserialize, Serialize};

use crate::attr::AttributeSet;
use crate::ids::{FacilityId, FogNodeId, RoundId};

/// An ordered sequence of real-valued tensors; layer shapes are fixed
/// for the run. All aggregation arithmetic is layer-wise and
/// elementwise, so each layer is kept flat (`Vec<f32>`) alongside its
/// shape for reshaping by collaborators that care about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub shape: Vec<usize>,
    pub values: Vec<f32>,
}

impl WeightVector {
    /// Zero-initialized weight vector matching the given layer shapes.
    /// Used to seed a run deterministically before any round has
    /// produced a global model.
    pub fn zeroed(shapes: &[Vec<usize>]) -> Self {
        let layers = shapes
            .iter()
            .map(|shape| Layer {
                shape: shape.clone(),
                values: vec![0.0; shape.iter().product()],
            })
            .collect();
        Self { layers }
    }

    pub fn layer_shapes_match(&self, other: &WeightVector) -> bool {
        self.layers.len() == other.layers.len()
            && self
                .layers
                .iter()
                .zip(other.layers.iter())
                .all(|(a, b)| a.shape == b.shape)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityStatus {
    Registered,
    Revoked,
}

/// Created by the TA on successful registration; immutable thereafter
/// except `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub facility_id: FacilityId,
    /// Hex-encoded ed25519 public key.
    pub public_key: String,
    pub attributes: AttributeSet,
    pub status: FacilityStatus,
    /// Hex-encoded attribute key issued at registration.
    pub issued_key: String,
}

/// One fog node's reconstructed-and-averaged contribution for a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FogPartial {
    pub fog_node_id: FogNodeId,
    pub partial_weights: WeightVector,
    /// Count of facilities actually folded into `partial_weights` this
    /// round (may be less than assigned, if some were skipped for
    /// `ReconstructionFailure`).
    pub facility_count: u32,
    pub round: RoundId,
    /// Hex-encoded ed25519 signature over the canonical encoding of
    /// (round, partial_weights, facility_count).
    pub signature: String,
}

/// The round's single aggregation result, before and after TA wrapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalModel {
    pub round: RoundId,
    pub weights: WeightVector,
    /// Hex-encoded leader signature over (round, weights).
    pub leader_signature: String,
    /// Set once the TA has wrapped the model under the access policy;
    /// `None` on the wire between leader and TA.
    pub wrapping: Option<String>,
}

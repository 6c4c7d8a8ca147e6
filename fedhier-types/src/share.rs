//! `Share` and its tagged payload variant.
//!
//! `SharePayload` replaces the prototype's dict of loosely-typed keys
//! (`data_fragment`, `is_real_sss`, base64-or-bytes) with an explicit
//! enum; validators reject any variant they don't recognize instead of
//! guessing at its shape.

use serde::{Deserialize, Serialize};

use crate::ids::{FacilityId, RoundId};

/// 1-based index of a share within its (k,n) split. Valid range is
/// `1..=n`.
pub type ShareId = u32;

/// Deterministic identifier for a share: `H(facility_id || share_id ||
/// round || payload)`. Computed identically by every validator so votes
/// key on the same value regardless of which validator first saw the
/// share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareUid([u8; 32]);

impl ShareUid {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for ShareUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..4]))
    }
}

/// The material carried inside a `Share`. Kept as a tagged enum so an
/// unrecognized variant is a deserialization error, not a silently
/// mishandled dict key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ShareMaterial {
    /// A genuine Shamir share: one point (x = `share_id`, y = a byte
    /// string) on a degree `k-1` polynomial per source byte.
    ShamirReal {
        share_id: ShareId,
        bytes: Vec<u8>,
        k: u32,
        n: u32,
    },
    /// A plaintext passthrough, used only in tests that don't exercise
    /// reconstruction. Real rounds always use `ShamirReal`.
    Plain { bytes: Vec<u8> },
}

impl ShareMaterial {
    pub fn payload_len(&self) -> usize {
        match self {
            ShareMaterial::ShamirReal { bytes, .. } => bytes.len(),
            ShareMaterial::Plain { bytes } => bytes.len(),
        }
    }
}

/// One facility's share of its round's weight vector, addressed to a
/// single validator and, on admission, forwarded to a single fog node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    pub share_id: ShareId,
    pub material: ShareMaterial,
    /// Reconstruction threshold k.
    pub threshold: u32,
    /// Total shares n. Invariant: n equals the fog-node count.
    pub total: u32,
    pub facility_id: FacilityId,
    pub round: RoundId,
    /// Hex-encoded ed25519 signature over the canonical encoding of
    /// everything above.
    pub signature: String,
    /// Hex-encoded ed25519 public key of the issuing facility.
    pub issuer_pubkey: String,
    pub share_uid: ShareUid,
}

impl Share {
    pub fn share_id_in_range(&self) -> bool {
        self.share_id >= 1 && self.share_id <= self.total
    }
}

/// A share re-signed by the committee once admitted, en route to a fog
/// node. Distinct type from `Share` because the fog node trusts the
/// committee signature, not the original facility signature, for
/// admission provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitteeSignedShare {
    pub share: Share,
    /// Hex-encoded committee signature over the share payload.
    pub committee_signature: String,
    pub committee_signer: String,
}

//! Length-prefixed binary framing for the endpoints that carry raw
//! `WeightVector`/`FogPartial`/`GlobalModel` bytes instead of JSON
//! (`spec.md` §6, "Wire formats").
//!
//! A frame is a 4-byte big-endian length prefix followed by that many
//! bytes of `bincode`-encoded payload. Bodies posted as `raw bytes` in
//! the endpoint table (`/start_round`, `/receive_fog_aggregation`) use
//! this encoding directly as the HTTP body; JSON endpoints never go
//! through here.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to encode frame: {0}")]
    Encode(String),
    #[error("failed to decode frame: {0}")]
    Decode(String),
    #[error("frame truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

const LEN_PREFIX_BYTES: usize = 4;

/// Encodes `value` as a length-prefixed `bincode` frame.
pub fn encode_frame<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    let body = bincode::serialize(value).map_err(|e| WireError::Encode(e.to_string()))?;
    let len = u32::try_from(body.len()).map_err(|e| WireError::Encode(e.to_string()))?;
    let mut framed = Vec::with_capacity(LEN_PREFIX_BYTES + body.len());
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(&body);
    Ok(framed)
}

/// Decodes a single length-prefixed `bincode` frame, requiring the
/// entire input to be consumed exactly.
pub fn decode_frame<T: DeserializeOwned>(framed: &[u8]) -> Result<T, WireError> {
    if framed.len() < LEN_PREFIX_BYTES {
        return Err(WireError::Truncated {
            expected: LEN_PREFIX_BYTES,
            actual: framed.len(),
        });
    }
    let (len_bytes, body) = framed.split_at(LEN_PREFIX_BYTES);
    let len = u32::from_be_bytes(len_bytes.try_into().expect("exactly 4 bytes")) as usize;
    if body.len() != len {
        return Err(WireError::Truncated {
            expected: len,
            actual: body.len(),
        });
    }
    bincode::deserialize(body).map_err(|e| WireError::Decode(e.to_string()))
}

/// Computes the deterministic `share_uid` from its constituent fields:
/// `H(facility_id || share_id || round || payload)`.
pub fn share_uid_hash(facility_id: &str, share_id: u32, round: u64, payload: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(facility_id.as_bytes());
    hasher.update(&share_id.to_be_bytes());
    hasher.update(&round.to_be_bytes());
    hasher.update(payload);
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_round_trips() {
        let value = vec![1u8, 2, 3, 4, 5];
        let framed = encode_frame(&value).unwrap();
        let decoded: Vec<u8> = decode_frame(&framed).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn frame_rejects_truncation() {
        let framed = encode_frame(&vec![1u8, 2, 3]).unwrap();
        let err = decode_frame::<Vec<u8>>(&framed[..framed.len() - 1]).unwrap_err();
        assert!(matches!(err, WireError::Truncated { .. }));
    }

    #[test]
    fn share_uid_is_deterministic() {
        let a = share_uid_hash("f-0", 1, 3, b"payload");
        let b = share_uid_hash("f-0", 1, 3, b"payload");
        assert_eq!(a, b);
        let c = share_uid_hash("f-0", 2, 3, b"payload");
        assert_ne!(a, c);
    }
}

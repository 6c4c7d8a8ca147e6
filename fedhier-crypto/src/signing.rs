//! ed25519 signing, hex-encoded on the wire per `spec.md` §6
//! ("Signatures are hex-encoded over the canonical serialization of the
//! signed object").
//!
//! This replaces the reference implementation's permissive signature
//! check (`verify_facility_signature`, which accepted anything that
//! merely *looked* like hex or base64) with a real verification step —
//! a deliberate hardening over the prototype, not a like-for-like port.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::Zeroize;

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid hex encoding: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("malformed key or signature bytes")]
    Malformed,
    #[error("signature does not verify")]
    BadSignature,
}

/// A role instance's long-lived ed25519 identity, generated once at
/// startup and held read-only thereafter.
pub struct Identity {
    signing_key: SigningKey,
}

impl Identity {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// Signs `message` and returns the hex-encoded signature.
    pub fn sign(&self, message: &[u8]) -> String {
        hex::encode(self.signing_key.sign(message).to_bytes())
    }
}

impl Drop for Identity {
    fn drop(&mut self) {
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

/// Verifies `signature_hex` over `message` under `pubkey_hex`.
pub fn verify(message: &[u8], signature_hex: &str, pubkey_hex: &str) -> Result<(), SigningError> {
    let pubkey_bytes = hex::decode(pubkey_hex)?;
    let pubkey_bytes: [u8; 32] = pubkey_bytes.try_into().map_err(|_| SigningError::Malformed)?;
    let verifying_key = VerifyingKey::from_bytes(&pubkey_bytes).map_err(|_| SigningError::Malformed)?;

    let sig_bytes = hex::decode(signature_hex)?;
    let sig_bytes: [u8; 64] = sig_bytes.try_into().map_err(|_| SigningError::Malformed)?;
    let signature = Signature::from_bytes(&sig_bytes);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SigningError::BadSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let identity = Identity::generate();
        let message = b"the weights";
        let signature = identity.sign(message);
        verify(message, &signature, &identity.public_key_hex()).unwrap();
    }

    #[test]
    fn tampered_message_fails_verification() {
        let identity = Identity::generate();
        let signature = identity.sign(b"the weights");
        let err = verify(b"the weights, altered", &signature, &identity.public_key_hex());
        assert!(err.is_err());
    }

    #[test]
    fn wrong_key_fails_verification() {
        let a = Identity::generate();
        let b = Identity::generate();
        let signature = a.sign(b"payload");
        assert!(verify(b"payload", &signature, &b.public_key_hex()).is_err());
    }
}

//! Proof-of-work for Sybil-resistant facility registration.
//!
//! `H(nonce || facility_id || pubkey) < 2^(256-d)` is equivalent to
//! requiring the hash's top `d` bits to be zero, which is what
//! [`leading_zero_bits`] checks directly instead of doing 256-bit
//! integer comparison.

use blake3::Hasher;

fn challenge_hash(nonce: u64, facility_id: &str, pubkey_hex: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&nonce.to_be_bytes());
    hasher.update(facility_id.as_bytes());
    hasher.update(pubkey_hex.as_bytes());
    *hasher.finalize().as_bytes()
}

fn leading_zero_bits(hash: &[u8; 32]) -> u32 {
    let mut count = 0;
    for byte in hash {
        if *byte == 0 {
            count += 8;
        } else {
            count += byte.leading_zeros();
            break;
        }
    }
    count
}

/// Searches nonces `0..max_iterations` for one satisfying `difficulty`.
/// Returns `None` if the search space is exhausted without success.
pub fn solve(
    facility_id: &str,
    pubkey_hex: &str,
    difficulty: u32,
    max_iterations: u64,
) -> Option<u64> {
    (0..max_iterations).find(|&nonce| {
        leading_zero_bits(&challenge_hash(nonce, facility_id, pubkey_hex)) >= difficulty
    })
}

/// Verifies that `nonce` satisfies the proof-of-work challenge for
/// `(facility_id, pubkey_hex)` at `difficulty`.
pub fn verify(facility_id: &str, pubkey_hex: &str, nonce: u64, difficulty: u32) -> bool {
    leading_zero_bits(&challenge_hash(nonce, facility_id, pubkey_hex)) >= difficulty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_nonce_verifies() {
        let nonce = solve("f-0", "deadbeef", 8, 1_000_000).expect("solvable at low difficulty");
        assert!(verify("f-0", "deadbeef", nonce, 8));
    }

    #[test]
    fn wrong_nonce_fails_at_high_difficulty() {
        assert!(!verify("f-0", "deadbeef", 0, 32));
    }

    #[test]
    fn different_pubkey_invalidates_solution() {
        let nonce = solve("f-0", "deadbeef", 8, 1_000_000).unwrap();
        assert!(!verify("f-0", "abad1dea", nonce, 8));
    }
}

//! (k,n) secret sharing over GF(257), one polynomial per input byte.
//!
//! Mirrors the reference `ShamirSecretSharing` class byte-for-byte:
//! the field modulus is 257 (the smallest prime exceeding 256, so every
//! byte value is a valid element), shares are evaluated at the 1-based
//! points `x = 1..=n` to keep `x = 0` free for the secret, coefficients
//! above the constant term are drawn uniformly at random, and
//! reconstruction is Lagrange interpolation at `x = 0`.
//!
//! A share's y-value can reach 256 (the modulus minus one), one more
//! than fits in a byte, so shares are carried as `u16` rather than
//! `u8` and only the reconstructed secret is byte-valued.

use rand::RngCore;
use thiserror::Error;

const PRIME: i64 = 257;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShamirError {
    #[error("threshold must be at least 1 and at most total shares")]
    InvalidParameters,
    #[error("need at least {threshold} shares, got {actual}")]
    InsufficientShares { threshold: u32, actual: usize },
    #[error("shares have mismatched lengths")]
    LengthMismatch,
    #[error("duplicate share index {0}")]
    DuplicateIndex(u32),
}

/// One recipient's per-byte shares for an entire secret, y-values only;
/// the recipient's x-coordinate is its 1-based `share_id`.
pub type ShareBytes = Vec<u16>;

fn mod_inverse(a: i64) -> i64 {
    // Extended Euclidean algorithm; PRIME is prime so every nonzero
    // residue has an inverse.
    let (mut old_r, mut r) = (a.rem_euclid(PRIME), PRIME);
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
    }
    old_s.rem_euclid(PRIME)
}

fn polynomial_eval(coefficients: &[i64], x: i64) -> i64 {
    coefficients
        .iter()
        .rev()
        .fold(0i64, |acc, &coeff| (acc * x + coeff).rem_euclid(PRIME))
}

fn lagrange_interpolate_at_zero(points: &[(i64, i64)]) -> i64 {
    let mut result = 0i64;
    for (i, &(xi, yi)) in points.iter().enumerate() {
        let mut numerator = 1i64;
        let mut denominator = 1i64;
        for (j, &(xj, _)) in points.iter().enumerate() {
            if i != j {
                numerator = (numerator * (0 - xj)).rem_euclid(PRIME);
                denominator = (denominator * (xi - xj)).rem_euclid(PRIME);
            }
        }
        let basis = (numerator * mod_inverse(denominator)).rem_euclid(PRIME);
        result = (result + yi * basis).rem_euclid(PRIME);
    }
    result
}

/// Splits `secret` into `n` shares requiring any `k` to reconstruct.
/// Returns one `ShareBytes` per recipient, indexed `0..n` but
/// conceptually at `x = index + 1`.
pub fn split(
    secret: &[u8],
    threshold: u32,
    total: u32,
    rng: &mut impl RngCore,
) -> Result<Vec<ShareBytes>, ShamirError> {
    if threshold == 0 || threshold > total {
        return Err(ShamirError::InvalidParameters);
    }
    let mut shares: Vec<ShareBytes> = vec![Vec::with_capacity(secret.len()); total as usize];
    for &byte in secret {
        let mut coefficients = Vec::with_capacity(threshold as usize);
        coefficients.push(byte as i64);
        for _ in 1..threshold {
            coefficients.push((rng.next_u32() % PRIME as u32) as i64);
        }
        for (i, share) in shares.iter_mut().enumerate() {
            let x = (i + 1) as i64;
            let y = polynomial_eval(&coefficients, x);
            share.push(y as u16);
        }
    }
    Ok(shares)
}

/// Reconstructs the secret from `shares`, each tagged with its 1-based
/// share index. At least `threshold` shares must be present; only the
/// first `threshold` (after the caller's ordering) are used, matching
/// the reference implementation's "use the first `threshold` shares"
/// rule.
pub fn reconstruct(
    shares: &[(u32, ShareBytes)],
    threshold: u32,
) -> Result<Vec<u8>, ShamirError> {
    if shares.len() < threshold as usize {
        return Err(ShamirError::InsufficientShares {
            threshold,
            actual: shares.len(),
        });
    }
    let mut seen = std::collections::HashSet::new();
    for (x, _) in shares {
        if !seen.insert(*x) {
            return Err(ShamirError::DuplicateIndex(*x));
        }
    }
    let used = &shares[..threshold as usize];
    let secret_len = used[0].1.len();
    if used.iter().any(|(_, bytes)| bytes.len() != secret_len) {
        return Err(ShamirError::LengthMismatch);
    }

    let mut secret = Vec::with_capacity(secret_len);
    for byte_idx in 0..secret_len {
        let points: Vec<(i64, i64)> = used
            .iter()
            .map(|(x, bytes)| (*x as i64, bytes[byte_idx] as i64))
            .collect();
        let recovered = lagrange_interpolate_at_zero(&points);
        secret.push(recovered as u8);
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn round_trips_with_exactly_threshold_shares() {
        let secret = b"the quick brown fox jumps".to_vec();
        let shares = split(&secret, 2, 3, &mut rng()).unwrap();
        let subset: Vec<(u32, ShareBytes)> = vec![(1, shares[0].clone()), (3, shares[2].clone())];
        let recovered = reconstruct(&subset, 2).unwrap();
        assert_eq!(recovered, secret);
    }

    #[test]
    fn any_k_of_n_reconstructs_the_same_secret() {
        let secret = b"federated".to_vec();
        let shares = split(&secret, 2, 3, &mut rng()).unwrap();
        let combos = [(0, 1), (0, 2), (1, 2)];
        for (a, b) in combos {
            let subset = vec![
                ((a + 1) as u32, shares[a].clone()),
                ((b + 1) as u32, shares[b].clone()),
            ];
            assert_eq!(reconstruct(&subset, 2).unwrap(), secret);
        }
    }

    #[test]
    fn fewer_than_threshold_shares_fails() {
        let secret = b"x".to_vec();
        let shares = split(&secret, 2, 3, &mut rng()).unwrap();
        let subset = vec![(1, shares[0].clone())];
        assert!(matches!(
            reconstruct(&subset, 2),
            Err(ShamirError::InsufficientShares { .. })
        ));
    }

    #[test]
    fn sixteen_kib_payload_round_trips() {
        let mut secret = vec![0u8; 16 * 1024];
        let mut r = rng();
        r.fill_bytes(&mut secret);
        let shares = split(&secret, 2, 3, &mut r).unwrap();
        let subset = vec![(2, shares[1].clone()), (3, shares[2].clone())];
        assert_eq!(reconstruct(&subset, 2).unwrap(), secret);
    }

    #[test]
    fn empty_secret_round_trips() {
        let secret: Vec<u8> = vec![];
        let shares = split(&secret, 2, 3, &mut rng()).unwrap();
        let subset = vec![(1, shares[0].clone()), (2, shares[1].clone())];
        assert_eq!(reconstruct(&subset, 2).unwrap(), secret);
    }
}

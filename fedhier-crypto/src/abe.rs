//! Attribute-policy evaluation and the symmetric "wrap" that stands in
//! for real ciphertext-policy attribute-based encryption.
//!
//! Real pairing-based CP-ABE is explicitly out of scope (`spec.md`
//! Non-goals); this mirrors `ProductionCPABE`'s own admission that it
//! is "simplified" — a policy-keyed XOR mask instead of pairing
//! cryptography — but replaces its string-split policy parser with the
//! structured [`fedhier_types::Policy`] AST and its XOR-with-SHA256
//! masking with a blake3-keyed stream, since the policy is already
//! typed here rather than a raw string.

use fedhier_types::{AttributeSet, Policy};

/// Evaluates `policy` against `attributes`, per `spec.md` §4.5: a
/// facility satisfies the policy iff evaluation returns true over its
/// registered attribute set.
pub fn evaluate(policy: &Policy, attributes: &AttributeSet) -> bool {
    match policy {
        Policy::Literal { attribute, value } => attributes.get(attribute) == Some(value.as_str()),
        Policy::And(clauses) => clauses.iter().all(|p| evaluate(p, attributes)),
        Policy::Or(clauses) => clauses.iter().any(|p| evaluate(p, attributes)),
    }
}

/// Derives a keystream from the policy's canonical bytes and xors it
/// over `data`, symmetric in both directions. Not a substitute for real
/// attribute-based encryption — any party that can serialize the
/// policy can wrap or unwrap, which is acceptable only because the
/// policy itself is not secret (it travels alongside the ciphertext).
pub fn wrap(data: &[u8], policy_bytes: &[u8]) -> Vec<u8> {
    xor_with_keystream(data, policy_bytes)
}

pub fn unwrap(data: &[u8], policy_bytes: &[u8]) -> Vec<u8> {
    xor_with_keystream(data, policy_bytes)
}

fn xor_with_keystream(data: &[u8], policy_bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut counter: u64 = 0;
    let mut keystream: Vec<u8> = Vec::new();
    let mut cursor = 0usize;
    for &byte in data {
        if cursor == keystream.len() {
            keystream = blake3::Hasher::new()
                .update(policy_bytes)
                .update(&counter.to_be_bytes())
                .finalize()
                .as_bytes()
                .to_vec();
            counter += 1;
            cursor = 0;
        }
        out.push(byte ^ keystream[cursor]);
        cursor += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeSet {
        AttributeSet(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn literal_matches_exact_value() {
        let policy = Policy::literal("region", "eu");
        assert!(evaluate(&policy, &attrs(&[("region", "eu")])));
        assert!(!evaluate(&policy, &attrs(&[("region", "us")])));
    }

    #[test]
    fn and_requires_all_clauses() {
        let policy = Policy::And(vec![
            Policy::literal("region", "eu"),
            Policy::literal("tier", "gold"),
        ]);
        assert!(evaluate(&policy, &attrs(&[("region", "eu"), ("tier", "gold")])));
        assert!(!evaluate(&policy, &attrs(&[("region", "eu"), ("tier", "silver")])));
    }

    #[test]
    fn or_requires_any_clause() {
        let policy = Policy::Or(vec![
            Policy::literal("tier", "gold"),
            Policy::literal("tier", "platinum"),
        ]);
        assert!(evaluate(&policy, &attrs(&[("tier", "platinum")])));
        assert!(!evaluate(&policy, &attrs(&[("tier", "silver")])));
    }

    #[test]
    fn wrap_unwrap_round_trips() {
        let data = b"global model bytes, more than one keystream block in length to exercise the counter".to_vec();
        let policy_bytes = b"region=eu AND tier=gold";
        let wrapped = wrap(&data, policy_bytes);
        assert_ne!(wrapped, data);
        let unwrapped = unwrap(&wrapped, policy_bytes);
        assert_eq!(unwrapped, data);
    }
}

//! Attribute sets and the policy predicate the TA evaluates them
//! against.
//!
//! Policy expressions are conjunctions/disjunctions of `attribute=value`
//! literals; evaluation lives in `fedhier-crypto::abe` (it needs no
//! cryptographic material, just the AST below, so it's kept separate
//! from the wire type).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A facility's registered attributes, e.g. `{"region": "eu", "tier":
/// "gold"}`. Kept as a sorted map so two facilities with the same
/// attributes serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet(pub BTreeMap<String, String>);

impl AttributeSet {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Conjunctions/disjunctions of `attribute=value` literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    Literal { attribute: String, value: String },
    And(Vec<Policy>),
    Or(Vec<Policy>),
}

impl Policy {
    pub fn literal(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Policy::Literal {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

//! Newtype identifiers, modeled after `oprf-types`' `ShareEpoch`/`OprfKeyId`:
//! transparent serde, cheap `Copy`, and a `Display` impl for log lines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A training round counter. Monotonically increasing per role; messages
/// carrying a stale value are dropped without mutating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(u64);

impl RoundId {
    pub const fn new(round: u64) -> Self {
        Self(round)
    }

    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// The round that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn is_stale(self, current: RoundId) -> bool {
        self.0 < current.0
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round-{}", self.0)
    }
}

macro_rules! string_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

string_id!(FacilityId, "facility-");
string_id!(ValidatorId, "validator-");
string_id!(FogNodeId, "fog-");

/// A fog node's zero-based numeric index, used for the `(share_id - 1)
/// mod G` routing rule at admission. Distinct from `FogNodeId`, which is
/// an opaque identity string carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FogNodeIndex(pub u32);

/// A validator's zero-based numeric index, used for the `share_index mod
/// V` routing rule at share fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorIndex(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_stale_check() {
        let current = RoundId::new(5);
        assert!(RoundId::new(4).is_stale(current));
        assert!(!RoundId::new(5).is_stale(current));
        assert!(!RoundId::new(6).is_stale(current));
    }

    #[test]
    fn facility_id_display() {
        let id = FacilityId::new("f-0");
        assert_eq!(id.to_string(), "facility-f-0");
    }
}

//! CLI/environment configuration shared across role binaries, modeled
//! on `OprfNodeConfig`: a `#[derive(Parser)]` struct meant to be
//! `#[clap(flatten)]`ed into each role's own config.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// The environment a role instance is running in. Mirrors the
/// teacher's `Environment`, including the dev-only assertion helper —
/// unused today but kept for any future dev-only shortcut (e.g. an
/// in-memory `LocalTrainer` that fabricates metrics).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Environment {
    Prod,
    Dev,
}

impl Environment {
    pub fn assert_is_dev(&self) {
        assert!(matches!(self, Environment::Dev), "is not dev environment")
    }
}

/// Pipeline-wide parameters every role needs to agree on: topology
/// sizes, thresholds, and the DP/PoW tunables from `spec.md` §2/§4.
#[derive(Parser, Debug, Clone)]
pub struct SharedConfig {
    /// The environment of this role instance (either `prod` or `dev`).
    #[clap(long, env = "FEDHIER_ENVIRONMENT", default_value = "prod")]
    pub environment: Environment,

    /// The bind address of this instance's axum server.
    #[clap(long, env = "FEDHIER_BIND_ADDR", default_value = "0.0.0.0:0")]
    pub bind_addr: SocketAddr,

    /// Number of facilities, F.
    #[clap(long, env = "FEDHIER_NUM_FACILITIES", default_value = "4")]
    pub num_facilities: u32,

    /// Number of validators, V.
    #[clap(long, env = "FEDHIER_NUM_VALIDATORS", default_value = "3")]
    pub num_validators: u32,

    /// Number of fog nodes, G.
    #[clap(long, env = "FEDHIER_NUM_FOG_NODES", default_value = "3")]
    pub num_fog_nodes: u32,

    /// Admission quorum Q (minimum approving votes).
    #[clap(long, env = "FEDHIER_QUORUM", default_value = "2")]
    pub quorum: u32,

    /// Shamir reconstruction threshold k.
    #[clap(long, env = "FEDHIER_SECRET_THRESHOLD", default_value = "2")]
    pub secret_threshold: u32,

    /// Shamir total shares n. Invariant: a multiple of `num_fog_nodes`,
    /// so each fog node is routed exactly `n / num_fog_nodes` shares per
    /// facility — that quotient must be `>= secret_threshold`, or no
    /// fog node ever holds enough shares of a facility to reconstruct.
    #[clap(long, env = "FEDHIER_SECRET_TOTAL", default_value = "6")]
    pub secret_total: u32,

    /// Proof-of-work difficulty in leading zero bits.
    #[clap(long, env = "FEDHIER_POW_DIFFICULTY", default_value = "4")]
    pub pow_difficulty: u32,

    /// Differential privacy epsilon.
    #[clap(long, env = "FEDHIER_DP_EPSILON", default_value = "1.0")]
    pub dp_epsilon: f64,

    /// Differential privacy delta.
    #[clap(long, env = "FEDHIER_DP_DELTA", default_value = "0.00001")]
    pub dp_delta: f64,

    /// L2 gradient clip norm.
    #[clap(long, env = "FEDHIER_DP_CLIP_NORM", default_value = "1.0")]
    pub dp_clip_norm: f32,

    /// Maximum payload size for a single share, in bytes.
    #[clap(long, env = "FEDHIER_MAX_SHARE_PAYLOAD", default_value = "1048576")]
    pub max_share_payload_bytes: usize,

    /// Per-request timeout for control-plane calls (votes, registration).
    #[clap(
        long,
        env = "FEDHIER_CONTROL_TIMEOUT",
        default_value = "30s",
        value_parser = humantime::parse_duration
    )]
    pub control_timeout: Duration,

    /// Per-request timeout for aggregate transfers (shares, partials,
    /// global models).
    #[clap(
        long,
        env = "FEDHIER_TRANSFER_TIMEOUT",
        default_value = "60s",
        value_parser = humantime::parse_duration
    )]
    pub transfer_timeout: Duration,

    /// Round-level deadline; exceeding it aborts the round with
    /// `RoundTimeout`.
    #[clap(
        long,
        env = "FEDHIER_ROUND_DEADLINE",
        default_value = "5min",
        value_parser = humantime::parse_duration
    )]
    pub round_deadline: Duration,

    /// Maximum retry attempts for a transient transport failure.
    #[clap(long, env = "FEDHIER_MAX_RETRIES", default_value = "5")]
    pub max_retries: u32,
}

impl SharedConfig {
    /// How many of a single facility's shares are routed to each fog
    /// node. A raw `(share_id - 1) mod num_fog_nodes` routing, with
    /// `secret_total == num_fog_nodes`, sends exactly one share per
    /// node and no node could ever reach `secret_threshold` — so shares
    /// are routed in groups of this size instead, one group per node.
    pub fn shares_per_fog_node(&self) -> u32 {
        (self.secret_total / self.num_fog_nodes).max(1)
    }

    /// Fog-node index that share `share_id` admits to. Share ids
    /// `1..=shares_per_fog_node()` go to node 0, the next group to node
    /// 1, and so on, wrapping if `secret_total` exceeds
    /// `num_fog_nodes * shares_per_fog_node()`. Every node ends up with
    /// `shares_per_fog_node()` of a facility's shares, which must be
    /// `>= secret_threshold` for reconstruction to be possible there.
    pub fn fog_node_index_for_share(&self, share_id: u32) -> u32 {
        ((share_id - 1) / self.shares_per_fog_node()) % self.num_fog_nodes
    }

    /// Validator index a facility addresses share `share_index` to,
    /// per `spec.md` §4.1 step 6: `share_index mod V`.
    pub fn validator_index_for_share(&self, share_index: u32) -> u32 {
        share_index % self.num_validators
    }
}

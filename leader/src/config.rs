use clap::Parser;
use fedhier_net::config::SharedConfig;

#[derive(Parser, Debug, Clone)]
pub struct LeaderConfig {
    /// This leader's identifier; there is exactly one per run.
    #[clap(long, env = "FEDHIER_LEADER_ID", default_value = "leader-0")]
    pub leader_id: String,

    /// Base URL of the trusted authority.
    #[clap(long, env = "FEDHIER_TA_URL")]
    pub ta_url: String,

    /// How long to wait, after the first fog partial of a round
    /// arrives, before aggregating with whatever partials are in hand
    /// (`T_leader` in `spec.md` §4.4).
    #[clap(
        long,
        env = "FEDHIER_LEADER_PARTIAL_TIMEOUT",
        default_value = "10s",
        value_parser = humantime::parse_duration
    )]
    pub partial_timeout: std::time::Duration,

    /// Number of fog-node failures tolerated before a round aborts with
    /// `QuorumUnmet`: aggregation proceeds on timeout with at least
    /// `num_fog_nodes - byzantine_tolerance` partials in hand.
    #[clap(long, env = "FEDHIER_BYZANTINE_TOLERANCE", default_value = "1")]
    pub byzantine_tolerance: u32,

    #[clap(flatten)]
    pub shared: SharedConfig,
}

impl LeaderConfig {
    /// Minimum partial count the leader will aggregate on, once the
    /// timeout fires without every fog node reporting.
    pub fn min_partials(&self) -> u32 {
        self.shared
            .num_fog_nodes
            .saturating_sub(self.byzantine_tolerance)
            .max(1)
    }
}

use clap::Parser;
use fedhier_net::config::SharedConfig;

#[derive(Parser, Debug, Clone)]
pub struct FogNodeConfig {
    /// This fog node's identifier, e.g. `fog-0`.
    #[clap(long, env = "FEDHIER_FOG_NODE_ID")]
    pub fog_node_id: String,

    /// This fog node's zero-based index, used to know which facilities
    /// route to it under the `(share_id - 1) mod G` rule.
    #[clap(long, env = "FEDHIER_FOG_NODE_INDEX")]
    pub fog_node_index: u32,

    /// Base URL of the leader.
    #[clap(long, env = "FEDHIER_LEADER_URL")]
    pub leader_url: String,

    /// Facility ids expected to contribute shares this round. A real
    /// deployment would learn this from the TA's facility list; fixed
    /// here since topology is static for the run.
    #[clap(long, env = "FEDHIER_EXPECTED_FACILITIES", value_delimiter = ',')]
    pub expected_facilities: Vec<String>,

    /// How long to wait after the first share of a round arrives
    /// before giving up on facilities that never reach threshold.
    #[clap(
        long,
        env = "FEDHIER_FOG_COLLECTION_WINDOW",
        default_value = "2s",
        value_parser = humantime::parse_duration
    )]
    pub collection_window: std::time::Duration,

    #[clap(flatten)]
    pub shared: SharedConfig,
}

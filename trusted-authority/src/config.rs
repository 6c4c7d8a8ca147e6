use clap::Parser;
use fedhier_net::config::SharedConfig;
use fedhier_types::Policy;

#[derive(Parser, Debug, Clone)]
pub struct TaConfig {
    /// This trusted authority's identifier; there is exactly one per run.
    #[clap(long, env = "FEDHIER_TA_ID", default_value = "ta-0")]
    pub ta_id: String,

    /// `facility_id=base_url` pairs, one per facility expected to
    /// register this run. Distribution POSTs use this map rather than
    /// a live service registry.
    #[clap(long, env = "FEDHIER_FACILITY_URLS", value_delimiter = ',')]
    pub facility_urls: Vec<String>,

    /// The distribution policy, as a comma-separated list of
    /// `attribute=value` literals ANDed together. A facility is
    /// eligible for a round's global model iff its registered
    /// attributes satisfy every literal.
    #[clap(long, env = "FEDHIER_POLICY", value_delimiter = ',')]
    pub policy_literals: Vec<String>,

    /// Maximum nonces the PoW solver itself would try; used only to
    /// bound verification cost, since `verify` is O(1) regardless.
    #[clap(long, env = "FEDHIER_POW_MAX_ITERATIONS", default_value = "10000000")]
    pub pow_max_iterations: u64,

    #[clap(flatten)]
    pub shared: SharedConfig,
}

impl TaConfig {
    pub fn facility_url(&self, facility_id: &str) -> Option<String> {
        self.facility_urls.iter().find_map(|pair| {
            let (id, url) = pair.split_once('=')?;
            (id == facility_id).then(|| url.to_string())
        })
    }

    /// Builds the distribution policy from `policy_literals`. An empty
    /// list means "every registered, non-revoked facility is eligible".
    pub fn policy(&self) -> Option<Policy> {
        if self.policy_literals.is_empty() {
            return None;
        }
        let literals = self
            .policy_literals
            .iter()
            .filter_map(|entry| entry.split_once('='))
            .map(|(attribute, value)| Policy::literal(attribute, value))
            .collect();
        Some(Policy::And(literals))
    }
}

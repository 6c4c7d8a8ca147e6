use clap::Parser;
use fedhier_net::config::SharedConfig;

#[derive(Parser, Debug, Clone)]
pub struct ValidatorConfig {
    /// This validator's identifier, e.g. `v-0`.
    #[clap(long, env = "FEDHIER_VALIDATOR_ID")]
    pub validator_id: String,

    /// This validator's zero-based index, used for peer gossip and
    /// self-identification in votes.
    #[clap(long, env = "FEDHIER_VALIDATOR_INDEX")]
    pub validator_index: u32,

    /// Base URLs of every peer validator (including self is harmless;
    /// gossip to self is a no-op once voted).
    #[clap(long, env = "FEDHIER_PEER_VALIDATOR_URLS", value_delimiter = ',')]
    pub peer_validator_urls: Vec<String>,

    /// Base URLs of every fog node, in index order.
    #[clap(long, env = "FEDHIER_FOG_NODE_URLS", value_delimiter = ',')]
    pub fog_node_urls: Vec<String>,

    /// Registered facilities' public keys, known out of band for this
    /// reference deployment (`facility_id=pubkey_hex` pairs). A real
    /// deployment would instead query the TA's `/facility_list`.
    #[clap(long, env = "FEDHIER_KNOWN_FACILITIES", value_delimiter = ',')]
    pub known_facilities: Vec<String>,

    #[clap(flatten)]
    pub shared: SharedConfig,
}

impl ValidatorConfig {
    pub fn known_facility_pubkey(&self, facility_id: &str) -> Option<String> {
        self.known_facilities.iter().find_map(|entry| {
            let (id, key) = entry.split_once('=')?;
            (id == facility_id).then(|| key.to_string())
        })
    }
}

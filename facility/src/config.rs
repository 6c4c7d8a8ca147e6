//! Facility-specific configuration, flattening [`SharedConfig`] the way
//! `ExampleOprfNodeConfig` flattens `OprfNodeConfig`.

use clap::Parser;
use fedhier_net::config::SharedConfig;

#[derive(Parser, Debug, Clone)]
pub struct FacilityConfig {
    /// This facility's identifier, e.g. `f-0`.
    #[clap(long, env = "FEDHIER_FACILITY_ID")]
    pub facility_id: String,

    /// Base URL of the Trusted Authority (e.g. `http://127.0.0.1:7600`).
    #[clap(long, env = "FEDHIER_TA_URL")]
    pub ta_url: String,

    /// Base URLs of every validator, in index order; share `i` is sent
    /// to `validator_urls[i mod V]`.
    #[clap(long, env = "FEDHIER_VALIDATOR_URLS", value_delimiter = ',')]
    pub validator_urls: Vec<String>,

    /// Lengths of each layer of the weight vector this run trains,
    /// comma-separated (layer shapes are fixed for the run).
    #[clap(
        long,
        env = "FEDHIER_LAYER_LENS",
        value_delimiter = ',',
        default_value = "16,4"
    )]
    pub layer_lens: Vec<usize>,

    /// Local training epochs per round, passed through to `LocalTrainer`.
    #[clap(long, env = "FEDHIER_EPOCHS", default_value = "1")]
    pub epochs: u32,

    /// Local training batch size, passed through to `LocalTrainer`.
    #[clap(long, env = "FEDHIER_BATCH_SIZE", default_value = "32")]
    pub batch_size: u32,

    #[clap(flatten)]
    pub shared: SharedConfig,
}

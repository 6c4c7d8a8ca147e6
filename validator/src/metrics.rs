pub const METRICS_ID_VOTES_CAST: &str = "validator_votes_cast_total";
pub const METRICS_ID_SHARES_ADMITTED: &str = "validator_shares_admitted_total";
pub const METRICS_ID_SHARES_REJECTED: &str = "validator_shares_rejected_total";
pub const METRICS_ID_FORWARDS: &str = "validator_forwards_total";
pub const METRICS_ID_GOSSIP_SENT: &str = "validator_gossip_sent_total";

pub fn describe_metrics() {
    metrics::describe_counter!(METRICS_ID_VOTES_CAST, "Votes this validator has cast");
    metrics::describe_counter!(METRICS_ID_SHARES_ADMITTED, "Shares admitted by quorum");
    metrics::describe_counter!(METRICS_ID_SHARES_REJECTED, "Shares rejected by quorum");
    metrics::describe_counter!(METRICS_ID_FORWARDS, "Shares forwarded to a fog node");
    metrics::describe_counter!(METRICS_ID_GOSSIP_SENT, "Votes gossiped to peer validators");
}

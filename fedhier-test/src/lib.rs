//! Cross-role test harness: spins up every role as an in-process axum
//! server bound to loopback ephemeral ports, wires their URLs together,
//! and waits for all of them to answer their health endpoint before
//! handing control back — the same shape as the reference health-poll
//! helpers, adapted from polling a fixed set of URLs to booting them
//! first.

pub mod harness;

pub use harness::{RunningRole, TestSetup, Topology};

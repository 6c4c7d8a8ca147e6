//! Tracing bootstrap, standing in for the teacher's internal
//! `nodes_observability::install_tracing`. Directly expressed with
//! `tracing-subscriber` since that internal crate isn't something this
//! repo can depend on.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber with an `EnvFilter` seeded
/// from `default_directives`, overridable via `RUST_LOG`.
pub fn install_tracing(default_directives: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

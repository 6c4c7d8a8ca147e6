//! In-process multi-role test harness, modeled on the reference
//! `oprf-test-utils` health-poll pattern: every role binds an ephemeral
//! port, and callers wait on `/` before treating a role as live rather
//! than sleeping a fixed duration.

use std::net::SocketAddr;
use std::time::Duration;

use fedhier_net::config::{Environment, SharedConfig};
use tokio::task::JoinSet;

/// Topology sizes for a harness run. Mirrors `spec.md` §2's role counts.
#[derive(Debug, Clone, Copy)]
pub struct Topology {
    pub facilities: u32,
    pub validators: u32,
    pub fog_nodes: u32,
    pub quorum: u32,
    pub secret_threshold: u32,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            facilities: 4,
            validators: 3,
            fog_nodes: 3,
            quorum: 2,
            secret_threshold: 2,
        }
    }
}

pub struct RunningRole {
    pub url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// A fully wired, fully live instance of the pipeline: every role bound
/// to a loopback ephemeral port, health-checked before being handed
/// back to the caller.
pub struct TestSetup {
    pub topology: Topology,
    pub ta: RunningRole,
    pub leader: RunningRole,
    pub fog_nodes: Vec<RunningRole>,
    pub validators: Vec<RunningRole>,
    pub facilities: Vec<RunningRole>,
}

fn shared_config(topology: &Topology) -> SharedConfig {
    SharedConfig {
        environment: Environment::Dev,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        num_facilities: topology.facilities,
        num_validators: topology.validators,
        num_fog_nodes: topology.fog_nodes,
        quorum: topology.quorum,
        secret_threshold: topology.secret_threshold,
        secret_total: topology.fog_nodes * topology.secret_threshold,
        pow_difficulty: 4,
        dp_epsilon: 1.0,
        dp_delta: 0.00001,
        dp_clip_norm: 1.0,
        max_share_payload_bytes: 1024 * 1024,
        control_timeout: Duration::from_secs(5),
        transfer_timeout: Duration::from_secs(10),
        round_deadline: Duration::from_secs(30),
        max_retries: 3,
    }
}

/// Binds an ephemeral loopback port without serving anything yet. Some
/// roles (validators gossiping to peers, the TA distributing to
/// facilities) need every peer's URL before their own config can be
/// built, but a URL only exists once its listener is bound — so
/// binding is split from serving.
async fn bind_listener() -> eyre::Result<(SocketAddr, tokio::net::TcpListener)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok((addr, listener))
}

fn spawn_with_listener(listener: tokio::net::TcpListener, router: axum::Router) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            tracing::error!(%err, "test role server error");
        }
    })
}

async fn spawn_router(router: axum::Router) -> eyre::Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
    let (addr, listener) = bind_listener().await?;
    Ok((addr, spawn_with_listener(listener, router)))
}

/// Polls `{url}/health`, mirroring the reference `/health` poll loop
/// every role binary's readiness check uses.
async fn wait_healthy(url: &str, max_wait: Duration) -> eyre::Result<()> {
    let health_url = format!("{url}/health");
    tokio::time::timeout(max_wait, async {
        loop {
            if let Ok(resp) = reqwest::get(&health_url).await {
                if resp.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .map_err(|_| eyre::eyre!("{url} did not become healthy within {max_wait:?}"))
}

impl TestSetup {
    pub async fn start(topology: Topology) -> eyre::Result<Self> {
        let shared = shared_config(&topology);

        // Facility identities and listeners are both established up
        // front: the TA needs every facility's URL to build its
        // distribution map, and validators need every facility's public
        // key, before any of those roles' configs can be constructed.
        let facility_identities: Vec<_> = (0..topology.facilities)
            .map(|_| fedhier_crypto::signing::Identity::generate())
            .collect();
        let known_facilities: Vec<String> = facility_identities
            .iter()
            .enumerate()
            .map(|(index, identity)| format!("f-{index}={}", identity.public_key_hex()))
            .collect();
        let mut facility_listeners = Vec::new();
        let mut facility_urls = Vec::new();
        for index in 0..topology.facilities {
            let (addr, listener) = bind_listener().await?;
            let url = format!("http://{addr}");
            facility_urls.push(format!("f-{index}={url}"));
            facility_listeners.push((url, listener));
        }
        let expected_facilities: Vec<String> = (0..topology.facilities).map(|index| format!("f-{index}")).collect();

        let ta_config = trusted_authority::config::TaConfig {
            ta_id: "ta-0".to_string(),
            facility_urls,
            policy_literals: Vec::new(),
            pow_max_iterations: 10_000_000,
            shared: shared.clone(),
        };
        let (ta_router, ta_state) = trusted_authority::build_router(ta_config);
        let (ta_addr, ta_handle) = spawn_router(ta_router).await?;
        let ta_url = format!("http://{ta_addr}");
        wait_healthy(&ta_url, Duration::from_secs(5)).await?;
        drop(ta_state);

        let leader_config = leader::config::LeaderConfig {
            leader_id: "leader-0".to_string(),
            ta_url: ta_url.clone(),
            partial_timeout: Duration::from_secs(2),
            byzantine_tolerance: 1,
            shared: shared.clone(),
        };
        let (leader_router, _) = leader::build_router(leader_config);
        let (leader_addr, leader_handle) = spawn_router(leader_router).await?;
        let leader_url = format!("http://{leader_addr}");
        wait_healthy(&leader_url, Duration::from_secs(5)).await?;

        let mut fog_nodes = Vec::new();
        let mut fog_node_urls = Vec::new();
        for index in 0..topology.fog_nodes {
            let config = fog_node::config::FogNodeConfig {
                fog_node_id: format!("fog-{index}"),
                fog_node_index: index,
                leader_url: leader_url.clone(),
                expected_facilities: expected_facilities.clone(),
                collection_window: Duration::from_millis(200),
                shared: shared.clone(),
            };
            let (router, _) = fog_node::build_router(config);
            let (addr, handle) = spawn_router(router).await?;
            let url = format!("http://{addr}");
            wait_healthy(&url, Duration::from_secs(5)).await?;
            fog_node_urls.push(url.clone());
            fog_nodes.push(RunningRole {
                url,
                _handle: handle,
            });
        }

        // Validator listeners are pre-bound so every validator's URL is
        // known before any `ValidatorConfig` is built, letting
        // `peer_validator_urls` name the real siblings instead of an
        // empty list (which would make gossip_vote a no-op).
        let mut validator_listeners = Vec::new();
        let mut validator_urls = Vec::new();
        for _ in 0..topology.validators {
            let (addr, listener) = bind_listener().await?;
            let url = format!("http://{addr}");
            validator_urls.push(url.clone());
            validator_listeners.push(listener);
        }

        let mut validators = Vec::new();
        for (index, listener) in validator_listeners.into_iter().enumerate() {
            let config = validator::config::ValidatorConfig {
                validator_id: format!("v-{index}"),
                validator_index: index as u32,
                peer_validator_urls: validator_urls.clone(),
                fog_node_urls: fog_node_urls.clone(),
                known_facilities: known_facilities.clone(),
                shared: shared.clone(),
            };
            let (router, _) = validator::build_router(config);
            let url = validator_urls[index].clone();
            let handle = spawn_with_listener(listener, router);
            wait_healthy(&url, Duration::from_secs(5)).await?;
            validators.push(RunningRole {
                url,
                _handle: handle,
            });
        }

        let mut facilities = Vec::new();
        for (index, (identity, (url, listener))) in facility_identities
            .into_iter()
            .zip(facility_listeners.into_iter())
            .enumerate()
        {
            let config = facility::config::FacilityConfig {
                facility_id: format!("f-{index}"),
                ta_url: ta_url.clone(),
                validator_urls: validator_urls.clone(),
                layer_lens: vec![16, 4],
                epochs: 1,
                batch_size: 8,
                shared: shared.clone(),
            };
            let trainer: fedhier_net::LocalTrainerService =
                std::sync::Arc::new(fedhier_net::DeterministicTrainer { offset: 0.01 });
            let (router, _) = facility::build_router_with_identity(config, trainer, identity);
            let handle = spawn_with_listener(listener, router);
            wait_healthy(&url, Duration::from_secs(5)).await?;
            facilities.push(RunningRole {
                url,
                _handle: handle,
            });
        }

        Ok(Self {
            topology,
            ta: RunningRole {
                url: ta_url,
                _handle: ta_handle,
            },
            leader: RunningRole {
                url: leader_url,
                _handle: leader_handle,
            },
            fog_nodes,
            validators,
            facilities,
        })
    }

    pub async fn health_check_all(&self, max_wait: Duration) -> eyre::Result<()> {
        let mut urls = vec![self.ta.url.clone(), self.leader.url.clone()];
        urls.extend(self.fog_nodes.iter().map(|r| r.url.clone()));
        urls.extend(self.validators.iter().map(|r| r.url.clone()));
        urls.extend(self.facilities.iter().map(|r| r.url.clone()));

        let mut checks = urls
            .into_iter()
            .map(|url| wait_healthy_owned(url, max_wait))
            .collect::<JoinSet<_>>();
        while let Some(result) = checks.join_next().await {
            result??;
        }
        Ok(())
    }
}

async fn wait_healthy_owned(url: String, max_wait: Duration) -> eyre::Result<()> {
    wait_healthy(&url, max_wait).await
}

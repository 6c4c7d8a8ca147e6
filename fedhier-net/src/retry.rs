//! Bounded exponential backoff for outbound POSTs, per `spec.md` §4.1
//! ("retried with exponential backoff up to a bounded attempt count")
//! and §7 (`TransientTransport`).

use std::time::Duration;

use serde::Serialize;

use crate::error::RoundError;

/// POSTs `body` as JSON to `url`, retrying on transport failure or a
/// 5xx response with exponential backoff starting at `base_delay`,
/// doubling each attempt, up to `max_retries` additional attempts
/// beyond the first.
pub async fn post_json_with_retry<T: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &T,
    timeout: Duration,
    max_retries: u32,
    base_delay: Duration,
) -> Result<reqwest::Response, RoundError> {
    let mut attempt = 0;
    loop {
        let result = client
            .post(url)
            .timeout(timeout)
            .json(body)
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) if response.status().is_server_error() && attempt < max_retries => {
                tracing::warn!(%url, status = %response.status(), attempt, "server error, retrying");
            }
            Ok(response) => {
                return Err(RoundError::TransientTransport(format!(
                    "{url} responded with {}",
                    response.status()
                )));
            }
            Err(err) if attempt < max_retries => {
                tracing::warn!(%url, %err, attempt, "transport error, retrying");
            }
            Err(err) => return Err(RoundError::TransientTransport(format!("{url}: {err}"))),
        }
        tokio::time::sleep(base_delay * 2u32.pow(attempt)).await;
        attempt += 1;
    }
}

/// POSTs `body` as a raw binary frame to `url` (used for the
/// length-prefixed `bincode` endpoints), with the same retry policy as
/// [`post_json_with_retry`].
pub async fn post_bytes_with_retry(
    client: &reqwest::Client,
    url: &str,
    body: Vec<u8>,
    timeout: Duration,
    max_retries: u32,
    base_delay: Duration,
) -> Result<reqwest::Response, RoundError> {
    let mut attempt = 0;
    loop {
        let result = client
            .post(url)
            .timeout(timeout)
            .body(body.clone())
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) if response.status().is_server_error() && attempt < max_retries => {
                tracing::warn!(%url, status = %response.status(), attempt, "server error, retrying");
            }
            Ok(response) => {
                return Err(RoundError::TransientTransport(format!(
                    "{url} responded with {}",
                    response.status()
                )));
            }
            Err(err) if attempt < max_retries => {
                tracing::warn!(%url, %err, attempt, "transport error, retrying");
            }
            Err(err) => return Err(RoundError::TransientTransport(format!("{url}: {err}"))),
        }
        tokio::time::sleep(base_delay * 2u32.pow(attempt)).await;
        attempt += 1;
    }
}

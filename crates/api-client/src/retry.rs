use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

/// Configuration for retry behaviour on idempotent GET requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub delays_ms: Vec<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delays_ms: vec![100, 200, 400],
        }
    }
}

impl RetryConfig {
    /// No retries at all; used by tests and one-shot probes.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delays_ms: Vec::new(),
        }
    }
}

/// Retry an HTTP GET with exponential backoff.
///
/// Retries on network errors and 5xx responses.
/// Returns immediately on success or 4xx.
pub async fn retry_get(
    client: &reqwest::Client,
    url: &str,
    auth_token: Option<&str>,
    config: &RetryConfig,
) -> Result<reqwest::Response> {
    let max_attempts = config.max_retries + 1;
    let mut attempt = 0;

    loop {
        let mut req = client.get(url);
        if let Some(token) = auth_token {
            req = req.bearer_auth(token);
        }
        let delay = config
            .delays_ms
            .get(attempt)
            .copied()
            .filter(|_| attempt + 1 < max_attempts);

        match req.send().await {
            Ok(resp) if resp.status().is_server_error() => {
                let Some(delay) = delay else {
                    return Ok(resp);
                };
                warn!(
                    "GET {} attempt {}/{} failed (HTTP {}), retrying in {}ms",
                    url,
                    attempt + 1,
                    max_attempts,
                    resp.status(),
                    delay,
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Ok(resp) => return Ok(resp),
            Err(e) => {
                let Some(delay) = delay else {
                    return Err(e).context("Failed to connect after retries");
                };
                warn!(
                    "GET {} attempt {}/{} failed ({}), retrying in {}ms",
                    url,
                    attempt + 1,
                    max_attempts,
                    e,
                    delay,
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }
        attempt += 1;
    }
}

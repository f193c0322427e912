use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::constants::GATEWAY_TIMEOUT_SECS;

#[derive(Debug, Deserialize)]
struct GatewayEnvelope {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayStatus {
    pub chain_id: Option<String>,
    pub latency_ms: u128,
}

/// Reachability probe for the chain gateway the wallet talks to.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the gateway's network config and report the chain id it serves.
    pub async fn probe(&self) -> Result<GatewayStatus> {
        let started = std::time::Instant::now();
        let response = self
            .client
            .get(format!("{}/network/config", self.base_url))
            .timeout(Duration::from_secs(GATEWAY_TIMEOUT_SECS))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Gateway returned status {}", response.status()));
        }

        let envelope: GatewayEnvelope = response.json().await?;
        let status = parse_envelope(envelope)?;

        Ok(GatewayStatus {
            latency_ms: started.elapsed().as_millis(),
            ..status
        })
    }
}

fn parse_envelope(envelope: GatewayEnvelope) -> Result<GatewayStatus> {
    if !envelope.error.is_empty() {
        return Err(anyhow::anyhow!("Gateway error: {}", envelope.error));
    }
    if !envelope.code.is_empty() && envelope.code != "successful" {
        return Err(anyhow::anyhow!("Gateway returned code '{}'", envelope.code));
    }

    let chain_id = envelope
        .data
        .pointer("/config/erd_chain_id")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Ok(GatewayStatus { chain_id, latency_ms: 0 })
}

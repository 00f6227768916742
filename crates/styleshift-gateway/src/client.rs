//! HTTP client for the generation gateway.
//!
//! The gateway runs one deployment per dispatched job and reports status via
//! polling (`get_run`) and signed webhooks. Requests authenticate with a
//! bearer credential.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use styleshift_core::models::GenerationRun;
use styleshift_core::GatewayConfig;

use crate::error::{GatewayError, GatewayResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Inputs for one generation job: the photo to restyle and the style
/// reference image, both as URLs the gateway can fetch.
#[derive(Debug, Clone, Serialize)]
pub struct RunInputs {
    pub input_image: String,
    pub input_image_style: String,
}

#[derive(Debug, Deserialize)]
struct QueueRunResponse {
    #[serde(rename = "runId", alias = "run_id")]
    run_id: String,
}

/// Client for the generation gateway API.
#[derive(Clone)]
pub struct GatewayClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    deployment_id: String,
    webhook_url: String,
}

// Manual Debug: the bearer credential must not end up in logs.
impl Debug for GatewayClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("deployment_id", &self.deployment_id)
            .field("webhook_url", &self.webhook_url)
            .finish()
    }
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(GatewayClient {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            deployment_id: config.deployment_id.clone(),
            webhook_url: config.webhook_url.clone(),
        })
    }

    /// Queue one generation run and return the gateway-assigned run id.
    pub async fn queue_run(&self, inputs: &RunInputs) -> GatewayResult<String> {
        let url = format!("{}/run/deployment/queue", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "deployment_id": self.deployment_id,
                "webhook": self.webhook_url,
                "inputs": inputs,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Gateway dispatch failed"
            );
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let queued: QueueRunResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        tracing::info!(run_id = %queued.run_id, "Generation run queued");

        Ok(queued.run_id)
    }

    /// Fetch the current status of a run.
    pub async fn get_run(&self, run_id: &str) -> GatewayResult<GenerationRun> {
        let url = format!("{}/run/{}", self.base_url, run_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let run = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(run)
    }
}

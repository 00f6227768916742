//! Configuration module
//!
//! Environment-driven configuration for the API, the storage backend, and the
//! generation gateway. Loaded once at startup with [`Config::from_env`] and
//! validated with [`Config::validate`] before any service is constructed.

use std::env;
use std::time::Duration;

use crate::constants;
use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 3000;

/// Generation gateway settings (outbound API and inbound webhook).
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Base URL of the generation gateway API.
    pub base_url: String,
    /// Bearer credential for the gateway API.
    pub api_key: String,
    /// Deployment identifier the gateway runs for every dispatched job.
    pub deployment_id: String,
    /// Callback URL handed to the gateway on dispatch. Defaults to a
    /// placeholder domain when unset; see `Config::validate` for the warning.
    pub webhook_url: String,
    /// Shared secret for verifying inbound webhook signatures. When unset the
    /// webhook receiver rejects every delivery (fails closed).
    pub webhook_secret: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload constraints
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub signed_url_ttl_secs: u64,
    // Generation gateway
    pub gateway: GatewayConfig,
    // Run polling
    pub run_poll_interval_ms: u64,
    pub run_poll_max_attempts: u32,
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    env::var(key)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_else(|_| default.iter().map(|s| s.to_string()).collect())
}

/// Like [`env_list`], lowercased — for extension and content-type allowlists
/// that are matched case-insensitively.
fn env_list_lower(key: &str, default: &[&str]) -> Vec<String> {
    env_list(key, default)
        .into_iter()
        .map(|s| s.to_lowercase())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let storage_backend = match env_string("STORAGE_BACKEND") {
            Some(raw) => Some(raw.parse::<StorageBackend>()?),
            None => None,
        };

        let gateway = GatewayConfig {
            base_url: env_string("GATEWAY_BASE_URL")
                .ok_or_else(|| anyhow::anyhow!("GATEWAY_BASE_URL is required"))?,
            api_key: env_string("GATEWAY_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("GATEWAY_API_KEY is required"))?,
            deployment_id: env_string("GATEWAY_DEPLOYMENT_ID")
                .ok_or_else(|| anyhow::anyhow!("GATEWAY_DEPLOYMENT_ID is required"))?,
            webhook_url: env_string("GATEWAY_WEBHOOK_URL")
                .unwrap_or_else(|| constants::PLACEHOLDER_WEBHOOK_URL.to_string()),
            webhook_secret: env_string("GATEWAY_WEBHOOK_SECRET"),
        };

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT),
            environment: env_string("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            cors_origins: env_list("CORS_ORIGINS", &["*"]),
            storage_backend,
            s3_bucket: env_string("S3_BUCKET"),
            s3_region: env_string("S3_REGION").or_else(|| env_string("AWS_REGION")),
            s3_endpoint: env_string("S3_ENDPOINT"),
            local_storage_path: env_string("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_string("LOCAL_STORAGE_BASE_URL"),
            max_file_size_bytes: env_parse(
                "MAX_FILE_SIZE_BYTES",
                constants::DEFAULT_MAX_FILE_SIZE_BYTES,
            ),
            allowed_extensions: env_list_lower(
                "ALLOWED_EXTENSIONS",
                &["jpg", "jpeg", "png", "webp", "gif"],
            ),
            allowed_content_types: env_list_lower(
                "ALLOWED_CONTENT_TYPES",
                &["image/jpeg", "image/png", "image/webp", "image/gif"],
            ),
            signed_url_ttl_secs: env_parse(
                "SIGNED_URL_TTL_SECS",
                constants::DEFAULT_SIGNED_URL_TTL_SECS,
            ),
            gateway,
            run_poll_interval_ms: env_parse(
                "RUN_POLL_INTERVAL_MS",
                constants::DEFAULT_RUN_POLL_INTERVAL_MS,
            ),
            run_poll_max_attempts: env_parse(
                "RUN_POLL_MAX_ATTEMPTS",
                constants::DEFAULT_RUN_POLL_MAX_ATTEMPTS,
            ),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }

    pub fn run_poll_interval(&self) -> Duration {
        Duration::from_millis(self.run_poll_interval_ms)
    }

    /// Fail fast on contradictory settings; warn on misconfiguration risks
    /// that are survivable (placeholder webhook URL, missing webhook secret).
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend.unwrap_or(StorageBackend::S3) {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    anyhow::bail!("S3_BUCKET is required for the s3 storage backend");
                }
                if self.s3_region.is_none() {
                    anyhow::bail!(
                        "S3_REGION or AWS_REGION is required for the s3 storage backend"
                    );
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_PATH is required for the local storage backend");
                }
                if self.local_storage_base_url.is_none() {
                    anyhow::bail!(
                        "LOCAL_STORAGE_BASE_URL is required for the local storage backend"
                    );
                }
            }
        }

        if self.gateway.api_key.len() < 10 {
            anyhow::bail!("GATEWAY_API_KEY appears to be invalid or a placeholder");
        }
        if self.max_file_size_bytes == 0 {
            anyhow::bail!("MAX_FILE_SIZE_BYTES must be greater than zero");
        }
        if self.run_poll_interval_ms == 0 {
            anyhow::bail!("RUN_POLL_INTERVAL_MS must be greater than zero");
        }

        if self.gateway.webhook_url == constants::PLACEHOLDER_WEBHOOK_URL {
            tracing::warn!(
                webhook_url = %self.gateway.webhook_url,
                "GATEWAY_WEBHOOK_URL not set; the gateway will deliver callbacks to a placeholder domain"
            );
        }
        if self.gateway.webhook_secret.is_none() {
            tracing::warn!(
                "GATEWAY_WEBHOOK_SECRET not set; every inbound webhook will be rejected"
            );
        }

        Ok(())
    }
}

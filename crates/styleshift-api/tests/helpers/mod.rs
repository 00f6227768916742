//! Test helpers: build AppState and router for integration tests.
//!
//! Tests run against a local-filesystem storage backend in a temp directory
//! and a mock generation gateway; no external services are required.
//! Run from the workspace root: `cargo test -p styleshift-api`.

use axum_test::TestServer;
use std::sync::Arc;
use styleshift_api::constants;
use styleshift_api::setup::routes::build_router;
use styleshift_api::state::AppState;
use styleshift_core::{Config, GatewayConfig, StorageBackend};
use styleshift_gateway::GatewayClient;
use tempfile::TempDir;

pub const TEST_WEBHOOK_SECRET: &str = "test-secret-0123456789abcdef";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, state, mock gateway, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub gateway: mockito::ServerGuard,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Build a test app, letting the caller tweak the config before services are
/// constructed.
pub async fn setup_test_app_with(mutate: impl FnOnce(&mut Config)) -> TestApp {
    let gateway_server = mockito::Server::new_async().await;
    let temp_dir = TempDir::new().expect("temp dir");

    let mut config = Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: Some(temp_dir.path().to_string_lossy().to_string()),
        local_storage_base_url: Some("http://localhost:3000/media".to_string()),
        max_file_size_bytes: 1024 * 1024,
        allowed_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
        allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        signed_url_ttl_secs: 3600,
        gateway: GatewayConfig {
            base_url: gateway_server.url(),
            api_key: "test-api-key-0123".to_string(),
            deployment_id: "deployment-1".to_string(),
            webhook_url: "http://localhost:3000/api/v0/webhook".to_string(),
            webhook_secret: Some(TEST_WEBHOOK_SECRET.to_string()),
        },
        run_poll_interval_ms: 10,
        run_poll_max_attempts: 3,
    };
    mutate(&mut config);

    let storage = styleshift_storage::create_storage(&config)
        .await
        .expect("storage backend");
    let gateway = Arc::new(GatewayClient::new(&config.gateway).expect("gateway client"));
    let state = Arc::new(AppState::new(config, storage, gateway));
    let router = build_router(state.clone()).expect("router");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        state,
        gateway: gateway_server,
        _temp_dir: temp_dir,
    }
}

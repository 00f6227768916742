//! Application state.
//!
//! Clients are constructed once at startup and passed to handlers through
//! axum state (explicit dependency injection, no process-wide singletons).
//! Sub-values handlers commonly need on their own are extractable via
//! `FromRef`.

use std::sync::Arc;
use styleshift_core::Config;
use styleshift_gateway::GatewayClient;
use styleshift_storage::Storage;

use crate::services::{Dispatcher, RunTracker, WatcherConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub gateway: Arc<GatewayClient>,
    pub runs: RunTracker,
    pub dispatcher: Dispatcher,
    pub is_production: bool,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>, gateway: Arc<GatewayClient>) -> Self {
        let is_production = config.is_production();
        let dispatcher = Dispatcher::new(gateway.clone());
        AppState {
            config,
            storage,
            gateway,
            runs: RunTracker::new(),
            dispatcher,
            is_production,
        }
    }

    /// Polling parameters for spawned run watchers.
    pub fn watcher_config(&self) -> WatcherConfig {
        WatcherConfig {
            poll_interval: self.config.run_poll_interval(),
            max_attempts: self.config.run_poll_max_attempts,
        }
    }
}

impl axum::extract::FromRef<Arc<AppState>> for RunTracker {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.runs.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}

//! Per-run polling watcher.
//!
//! One watcher task is spawned per dispatched run. It polls the gateway on a
//! fixed period and publishes every observed snapshot into the tracker. The
//! loop ends when a terminal status is observed — by its own poll or by a
//! webhook that landed first — or on the first fetch failure, which is fatal
//! for that run's polling (no retry; the status endpoint remains usable).

use std::sync::Arc;
use std::time::Duration;
use styleshift_gateway::GatewayClient;
use tokio::task::JoinHandle;

use super::run_tracker::{RunSnapshot, RunTracker};

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

/// Spawn the polling loop for one run.
pub fn spawn_run_watcher(
    gateway: Arc<GatewayClient>,
    tracker: RunTracker,
    run_id: String,
    config: WatcherConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        for attempt in 0..config.max_attempts {
            if tracker.is_terminal(&run_id) {
                tracing::debug!(run_id = %run_id, "Run already terminal; watcher exiting");
                return;
            }

            match gateway.get_run(&run_id).await {
                Ok(run) => {
                    let snapshot = RunSnapshot::from(run);
                    let terminal = snapshot.is_terminal();
                    tracker.publish(snapshot);
                    if terminal {
                        tracing::info!(
                            run_id = %run_id,
                            attempts = attempt + 1,
                            "Run reached terminal status"
                        );
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        run_id = %run_id,
                        error = %e,
                        "Run status poll failed; stopping watcher"
                    );
                    let mut snapshot = tracker
                        .latest(&run_id)
                        .unwrap_or_else(|| RunSnapshot::pending(&run_id));
                    snapshot.error = Some("Failed to fetch run status".to_string());
                    tracker.publish(snapshot);
                    return;
                }
            }

            tokio::time::sleep(config.poll_interval).await;
        }

        tracing::warn!(
            run_id = %run_id,
            attempts = config.max_attempts,
            "Run watcher gave up after attempt cap"
        );
    })
}

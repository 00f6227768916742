//! Unified run state store.
//!
//! Poll responses and webhook deliveries both publish into one tracker, so
//! consumers see whichever signal arrives first. Each run id owns a watch
//! channel; SSE subscribers and watchers observe the same snapshots.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use styleshift_core::models::{GenerationRun, OutputEntry, RunStatus};
use tokio::sync::watch;
use utoipa::ToSchema;

/// Latest observed state of one generation run.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub id: String,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_status: Option<String>,
    pub progress: f64,
    pub outputs: Vec<OutputEntry>,
    /// Set when the polling loop died on a fetch failure. Terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunSnapshot {
    /// Initial state for a run whose first signal has not arrived yet.
    pub fn pending(run_id: &str) -> Self {
        RunSnapshot {
            id: run_id.to_string(),
            status: RunStatus::NotStarted,
            live_status: None,
            progress: 0.0,
            outputs: Vec::new(),
            error: None,
        }
    }

    /// A run stops being observed once its status is terminal or its polling
    /// loop has failed.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal() || self.error.is_some()
    }

    pub fn progress_percent(&self) -> u8 {
        (self.progress.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

impl From<GenerationRun> for RunSnapshot {
    fn from(run: GenerationRun) -> Self {
        RunSnapshot {
            id: run.id,
            status: run.status,
            live_status: run.live_status,
            progress: run.progress,
            outputs: run.outputs,
            error: None,
        }
    }
}

/// Shared store of per-run watch channels.
#[derive(Clone, Default)]
pub struct RunTracker {
    channels: Arc<DashMap<String, watch::Sender<RunSnapshot>>>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, run_id: &str) -> watch::Sender<RunSnapshot> {
        self.channels
            .entry(run_id.to_string())
            .or_insert_with(|| watch::channel(RunSnapshot::pending(run_id)).0)
            .clone()
    }

    /// Publish a snapshot, overwriting the stored state.
    ///
    /// A terminal state is sticky: a late non-terminal signal (e.g. a slow
    /// poll response racing a webhook) never regresses it.
    pub fn publish(&self, snapshot: RunSnapshot) {
        let tx = self.channel(&snapshot.id);
        tx.send_if_modified(|current| {
            if current.is_terminal() && !snapshot.is_terminal() {
                return false;
            }
            *current = snapshot;
            true
        });
    }

    /// Subscribe to a run's snapshots. Creates a pending entry when the run
    /// has not been observed yet.
    pub fn subscribe(&self, run_id: &str) -> watch::Receiver<RunSnapshot> {
        self.channel(run_id).subscribe()
    }

    /// Latest snapshot for a run, if any signal (or subscription) created it.
    pub fn latest(&self, run_id: &str) -> Option<RunSnapshot> {
        self.channels.get(run_id).map(|tx| tx.borrow().clone())
    }

    pub fn is_terminal(&self, run_id: &str) -> bool {
        self.latest(run_id).map(|s| s.is_terminal()).unwrap_or(false)
    }
}

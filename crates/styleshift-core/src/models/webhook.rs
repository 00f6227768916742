use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{GenerationRun, OutputEntry, RunStatus};

/// Status callback pushed by the generation gateway.
///
/// Carries the same fields as a polled run status, keyed by `runId`. The
/// payload is only trusted after its signature has been verified.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunWebhookPayload {
    pub run_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub live_status: Option<String>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub outputs: Vec<OutputEntry>,
}

impl From<RunWebhookPayload> for GenerationRun {
    fn from(payload: RunWebhookPayload) -> Self {
        GenerationRun {
            id: payload.run_id,
            status: payload.status,
            live_status: payload.live_status,
            progress: payload.progress,
            outputs: payload.outputs,
        }
    }
}

//! Job dispatch with duplicate suppression.
//!
//! Every dispatch derives a stable key from its inputs; a key seen before
//! resolves to the already-issued run id instead of a second gateway call, so
//! resubmitting a style selection never redispatches jobs that already went
//! out. Failed dispatches leave no ledger entry and can be retried.

use dashmap::DashMap;
use std::sync::Arc;
use styleshift_gateway::{dispatch_key, GatewayClient, GatewayError, RunInputs};

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new run was queued on the gateway.
    Dispatched(String),
    /// The same inputs were dispatched before; no gateway call was made.
    Duplicate(String),
}

impl DispatchOutcome {
    pub fn run_id(&self) -> &str {
        match self {
            DispatchOutcome::Dispatched(id) | DispatchOutcome::Duplicate(id) => id,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, DispatchOutcome::Duplicate(_))
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    gateway: Arc<GatewayClient>,
    ledger: Arc<DashMap<String, String>>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Dispatcher {
            gateway,
            ledger: Arc::new(DashMap::new()),
        }
    }

    /// Queue one generation run, unless the same (photo, style) pair already
    /// produced one.
    pub async fn dispatch(
        &self,
        input_image: &str,
        input_image_style: &str,
    ) -> Result<DispatchOutcome, GatewayError> {
        let key = dispatch_key(input_image, input_image_style);

        if let Some(existing) = self.ledger.get(&key) {
            tracing::info!(
                run_id = %existing.value(),
                "Duplicate dispatch suppressed"
            );
            return Ok(DispatchOutcome::Duplicate(existing.value().clone()));
        }

        let run_id = self
            .gateway
            .queue_run(&RunInputs {
                input_image: input_image.to_string(),
                input_image_style: input_image_style.to_string(),
            })
            .await?;

        self.ledger.insert(key, run_id.clone());
        Ok(DispatchOutcome::Dispatched(run_id))
    }
}

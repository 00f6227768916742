//! Domain models shared across crates.

mod asset;
mod run;
mod style;
mod webhook;

pub use asset::UploadedAsset;
pub use run::{GenerationRun, NodeMeta, OutputData, OutputEntry, OutputImage, RunStatus};
pub use style::{find_style, style_catalog, StyleOption};
pub use webhook::RunWebhookPayload;

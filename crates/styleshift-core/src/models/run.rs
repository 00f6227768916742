use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Run status reported by the generation gateway.
///
/// `Success`, `Failed`, `Cancelled`, and `Timeout` are terminal; everything
/// else means the run is still moving. Statuses this build does not know are
/// mapped to `Unknown` and treated as non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    NotStarted,
    Queued,
    Started,
    Running,
    Uploading,
    Success,
    Failed,
    Cancelled,
    Timeout,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Success | RunStatus::Failed | RunStatus::Cancelled | RunStatus::Timeout
        )
    }
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            RunStatus::NotStarted => "not-started",
            RunStatus::Queued => "queued",
            RunStatus::Started => "started",
            RunStatus::Running => "running",
            RunStatus::Uploading => "uploading",
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Timeout => "timeout",
            RunStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// One produced image inside an output entry. Immutable once observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputImage {
    pub url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub subfolder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OutputData {
    #[serde(default)]
    pub images: Vec<OutputImage>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Metadata identifying which workflow node produced an output entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NodeMeta {
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub node_class: String,
}

/// Output metadata attached to a run by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputEntry {
    pub id: String,
    #[serde(default)]
    pub data: OutputData,
    #[serde(default)]
    pub node_meta: NodeMeta,
}

impl OutputEntry {
    /// Whether this entry comes from an output-image node and actually carries
    /// images. Node class names are vendor-prefixed, hence the suffix match.
    pub fn is_output_image(&self) -> bool {
        self.node_meta.node_class.ends_with("OutputImage") && !self.data.images.is_empty()
    }
}

/// A generation job as reported by the gateway. Created on dispatch, mutated
/// only by gateway signals (poll responses and webhooks), never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRun {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub live_status: Option<String>,
    /// Progress in [0, 1].
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub outputs: Vec<OutputEntry>,
}

impl GenerationRun {
    /// Output entries produced by output-image nodes, in gateway order.
    pub fn image_outputs(&self) -> impl Iterator<Item = &OutputEntry> {
        self.outputs.iter().filter(|entry| entry.is_output_image())
    }

    /// Progress rounded to whole percent for display.
    pub fn progress_percent(&self) -> u8 {
        (self.progress.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(node_class: &str, image_urls: &[&str]) -> OutputEntry {
        OutputEntry {
            id: "entry-1".to_string(),
            data: OutputData {
                images: image_urls
                    .iter()
                    .map(|url| OutputImage {
                        url: url.to_string(),
                        filename: "out.png".to_string(),
                        is_public: true,
                        subfolder: String::new(),
                    })
                    .collect(),
                tags: vec![],
            },
            node_meta: NodeMeta {
                node_id: "17".to_string(),
                node_class: node_class.to_string(),
            },
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RunStatus::Success.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
        assert!(RunStatus::Timeout.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(!RunStatus::NotStarted.is_terminal());
        assert!(!RunStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_status_wire_format() {
        let status: RunStatus = serde_json::from_str("\"not-started\"").unwrap();
        assert_eq!(status, RunStatus::NotStarted);
        let status: RunStatus = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(status, RunStatus::Success);
        // Statuses from a newer gateway version must not break parsing.
        let status: RunStatus = serde_json::from_str("\"preparing-gpu\"").unwrap();
        assert_eq!(status, RunStatus::Unknown);
    }

    #[test]
    fn test_image_outputs_filters_node_class_and_empty_entries() {
        let run = GenerationRun {
            id: "run-1".to_string(),
            status: RunStatus::Success,
            live_status: None,
            progress: 1.0,
            outputs: vec![
                entry("VendorOutputImage", &["https://cdn.example/a.png"]),
                entry("PreviewImage", &["https://cdn.example/b.png"]),
                entry("VendorOutputImage", &[]),
            ],
        };
        let urls: Vec<_> = run
            .image_outputs()
            .map(|e| e.data.images[0].url.as_str())
            .collect();
        assert_eq!(urls, vec!["https://cdn.example/a.png"]);
    }

    #[test]
    fn test_progress_percent_rounding() {
        let mut run = GenerationRun {
            id: "run-1".to_string(),
            status: RunStatus::Running,
            live_status: None,
            progress: 0.0,
            outputs: vec![],
        };
        assert_eq!(run.progress_percent(), 0);
        run.progress = 0.45;
        assert_eq!(run.progress_percent(), 45);
        run.progress = 1.0;
        assert_eq!(run.progress_percent(), 100);
        run.progress = 1.7; // out-of-range input is clamped
        assert_eq!(run.progress_percent(), 100);
    }

    #[test]
    fn test_run_wire_format() {
        let json = r#"{
            "id": "8f14e45f",
            "status": "running",
            "liveStatus": "KSampler 12/20",
            "progress": 0.6,
            "outputs": [
                {
                    "id": "out-1",
                    "data": { "images": [{ "url": "https://cdn.example/a.png", "filename": "a.png", "isPublic": true, "subfolder": "" }] },
                    "nodeMeta": { "node_id": "17", "node_class": "VendorOutputImage" }
                }
            ]
        }"#;
        let run: GenerationRun = serde_json::from_str(json).unwrap();
        assert_eq!(run.id, "8f14e45f");
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.live_status.as_deref(), Some("KSampler 12/20"));
        assert_eq!(run.image_outputs().count(), 1);
    }
}

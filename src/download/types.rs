//! Download phases and event payloads

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadPhase {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "requesting-url")]
    RequestingUrl,
    #[serde(rename = "streaming")]
    Streaming,
    #[serde(rename = "assembling")]
    Assembling,
    #[serde(rename = "saved")]
    Saved,
    #[serde(rename = "failed")]
    Failed,
}

impl DownloadPhase {
    /// Saved and Failed discard their state; nothing observes them in the
    /// registry afterwards
    pub fn is_terminal(&self) -> bool {
        matches!(self, DownloadPhase::Saved | DownloadPhase::Failed)
    }
}

impl std::fmt::Display for DownloadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadPhase::Idle => write!(f, "idle"),
            DownloadPhase::RequestingUrl => write!(f, "requesting-url"),
            DownloadPhase::Streaming => write!(f, "streaming"),
            DownloadPhase::Assembling => write!(f, "assembling"),
            DownloadPhase::Saved => write!(f, "saved"),
            DownloadPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Progress event payload
#[derive(Debug, Clone, Serialize)]
pub struct DownloadProgress {
    pub key: String,
    pub percent: u32,
    pub downloaded_bytes: u64,
    pub total_bytes: u64,
}

/// Phase change event payload
#[derive(Debug, Clone, Serialize)]
pub struct DownloadPhaseChanged {
    pub key: String,
    pub phase: DownloadPhase,
    pub error: Option<String>,
}

/// Everything the presentation layer can observe about downloads
#[derive(Debug, Clone, Serialize)]
pub enum DownloadEvent {
    Progress(DownloadProgress),
    PhaseChanged(DownloadPhaseChanged),
}

/// Channel the worker emits events on; the presentation layer holds the
/// receiving end
pub type DownloadEvents = mpsc::UnboundedSender<DownloadEvent>;

//! Per-key download state registry

use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::types::DownloadPhase;

/// Live state for one key's download
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DownloadState {
    pub phase: DownloadPhase,
    pub percent: u32,
}

/// Tracks at most one active download per key. Only the task that claimed
/// a key mutates its entry; the presentation layer reads snapshots.
#[derive(Debug, Default)]
pub struct DownloadRegistry {
    entries: Mutex<HashMap<String, DownloadState>>,
}

impl DownloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a key for a new download. Returns false when a download for
    /// the key is already underway, in which case the caller must not
    /// start another one.
    pub async fn begin(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(key) {
            warn!("download_begin_ignored: {} already in progress", key);
            return false;
        }
        entries.insert(
            key.to_string(),
            DownloadState {
                phase: DownloadPhase::RequestingUrl,
                percent: 0,
            },
        );
        true
    }

    pub async fn update(&self, key: &str, phase: DownloadPhase, percent: u32) {
        let mut entries = self.entries.lock().await;
        if let Some(state) = entries.get_mut(key) {
            state.phase = phase;
            state.percent = percent;
        }
    }

    /// Drop a key's entry so a later download can start fresh
    pub async fn finish(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            debug!("download_state_cleared: {}", key);
        }
    }

    /// Point-in-time copy for the presentation layer
    pub async fn snapshot(&self) -> HashMap<String, DownloadState> {
        self.entries.lock().await.clone()
    }
}

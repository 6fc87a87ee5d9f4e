//! Progressive downloads with per-key state and progress events
//!
//! A download walks Idle -> RequestingUrl -> Streaming -> Assembling ->
//! Saved, with Failed reachable from any non-Idle phase. Terminal phases
//! drop the key's registry entry so a later call starts fresh. Downloads
//! for distinct keys run as independent tasks; re-entrant starts for a key
//! already underway are ignored.

mod state;
mod types;
mod worker;

pub use state::{DownloadRegistry, DownloadState};
pub use types::{
    DownloadEvent, DownloadEvents, DownloadPhase, DownloadPhaseChanged, DownloadProgress,
};
pub use worker::{download_object, download_object_with_timeout};

//! Download worker: presign, stream with progress, assemble, save

use futures_util::StreamExt;
use log::{debug, info, warn};
use reqwest::Client;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::signer::UrlSigner;

use super::state::DownloadRegistry;
use super::types::{
    DownloadEvent, DownloadEvents, DownloadPhase, DownloadPhaseChanged, DownloadProgress,
};

/// A chunk read that makes no progress for this long fails the download
const STREAM_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Download one object through a signed URL, saving it under `dest_dir`
/// with the key as its file name.
///
/// Returns `Ok(None)` when a download for the key is already underway
/// (re-entrant starts perform no network requests and leave the existing
/// state untouched). The registry entry is cleared on every exit path, so
/// neither success nor failure leaves a stale entry behind.
pub async fn download_object(
    http: &Client,
    signer: &dyn UrlSigner,
    registry: &DownloadRegistry,
    events: &DownloadEvents,
    key: &str,
    dest_dir: &Path,
) -> Result<Option<PathBuf>> {
    download_object_with_timeout(
        http,
        signer,
        registry,
        events,
        key,
        dest_dir,
        STREAM_IDLE_TIMEOUT,
    )
    .await
}

/// [`download_object`] with an explicit stall timeout for chunk reads
#[allow(clippy::too_many_arguments)]
pub async fn download_object_with_timeout(
    http: &Client,
    signer: &dyn UrlSigner,
    registry: &DownloadRegistry,
    events: &DownloadEvents,
    key: &str,
    dest_dir: &Path,
    idle_timeout: Duration,
) -> Result<Option<PathBuf>> {
    if !registry.begin(key).await {
        return Ok(None);
    }

    let result = run_download(http, signer, registry, events, key, dest_dir, idle_timeout).await;

    registry.finish(key).await;

    match &result {
        Ok(path) => {
            info!("download_saved: {} -> {}", key, path.display());
            emit_phase(events, key, DownloadPhase::Saved, None);
        }
        Err(err) => {
            warn!("download_failed: {} error={}", key, err);
            emit_phase(events, key, DownloadPhase::Failed, Some(err.to_string()));
        }
    }

    result.map(Some)
}

async fn run_download(
    http: &Client,
    signer: &dyn UrlSigner,
    registry: &DownloadRegistry,
    events: &DownloadEvents,
    key: &str,
    dest_dir: &Path,
    idle_timeout: Duration,
) -> Result<PathBuf> {
    // Resolve the save path up front so a hostile key fails before any
    // network request is made.
    let destination = safe_destination(dest_dir, key)?;

    emit_phase(events, key, DownloadPhase::RequestingUrl, None);
    let url = signer.sign(key).await?;

    registry.update(key, DownloadPhase::Streaming, 0).await;
    emit_phase(events, key, DownloadPhase::Streaming, None);

    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::Transport(format!("download request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::Transport(format!(
            "download failed with status {}",
            response.status()
        )));
    }

    let (body, percent) = match response.content_length() {
        Some(total) if total > 0 => {
            let body =
                stream_with_progress(registry, events, key, response, total, idle_timeout).await?;
            let percent = chunk_percent(body.len() as u64, total);
            (body, percent)
        }
        _ => {
            // No declared length: buffer the whole body without progress
            debug!("download_no_length: {} buffering body in one step", key);
            let body = response
                .bytes()
                .await
                .map_err(|e| Error::Stream(format!("failed to read body: {}", e)))?
                .to_vec();
            (body, 0)
        }
    };

    registry
        .update(key, DownloadPhase::Assembling, percent)
        .await;
    emit_phase(events, key, DownloadPhase::Assembling, None);

    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Other(format!("failed to create directory: {}", e)))?;
    }
    tokio::fs::write(&destination, &body)
        .await
        .map_err(|e| Error::Other(format!("failed to write {}: {}", destination.display(), e)))?;

    Ok(destination)
}

async fn stream_with_progress(
    registry: &DownloadRegistry,
    events: &DownloadEvents,
    key: &str,
    response: reqwest::Response,
    total_bytes: u64,
    idle_timeout: Duration,
) -> Result<Vec<u8>> {
    let mut stream = response.bytes_stream();
    let mut body: Vec<u8> = Vec::new();
    let mut downloaded: u64 = 0;

    loop {
        // Chunk reads are strictly sequential; a stalled one fails the
        // download rather than hanging its key forever.
        let next = timeout(idle_timeout, stream.next()).await.map_err(|_| {
            Error::Stream(format!(
                "stream stalled for {}ms",
                idle_timeout.as_millis()
            ))
        })?;

        let Some(chunk_result) = next else {
            break;
        };
        let chunk =
            chunk_result.map_err(|e| Error::Stream(format!("failed to read chunk: {}", e)))?;

        body.extend_from_slice(&chunk);
        downloaded += chunk.len() as u64;

        let percent = chunk_percent(downloaded, total_bytes);
        registry
            .update(key, DownloadPhase::Streaming, percent)
            .await;
        let _ = events.send(DownloadEvent::Progress(DownloadProgress {
            key: key.to_string(),
            percent,
            downloaded_bytes: downloaded,
            total_bytes,
        }));
    }

    debug!(
        "download_stream_done: {} bytes={} total_bytes={}",
        key, downloaded, total_bytes
    );
    Ok(body)
}

/// Resolve a key to a save path strictly inside `dest_dir`.
///
/// Keys act as pseudo-paths, so `/`-separated segments become
/// subdirectories. Listings are bucket-controlled input: absolute keys
/// and keys with `.`/`..` segments would land outside the destination
/// directory and are rejected.
fn safe_destination(dest_dir: &Path, key: &str) -> Result<PathBuf> {
    let relative = Path::new(key);
    let escapes = key.is_empty()
        || relative.is_absolute()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(Error::Other(format!("refusing unsafe object key: {}", key)));
    }
    Ok(dest_dir.join(relative))
}

/// floor(downloaded / total * 100), capped at 100
fn chunk_percent(downloaded: u64, total_bytes: u64) -> u32 {
    if total_bytes == 0 {
        return 0;
    }
    std::cmp::min(
        ((downloaded as f64 / total_bytes as f64) * 100.0) as u32,
        100,
    )
}

fn emit_phase(events: &DownloadEvents, key: &str, phase: DownloadPhase, error: Option<String>) {
    let _ = events.send(DownloadEvent::PhaseChanged(DownloadPhaseChanged {
        key: key.to_string(),
        phase,
        error,
    }));
}

#[cfg(test)]
mod tests {
    use super::{chunk_percent, safe_destination};
    use std::path::Path;

    #[test]
    fn chunk_percent_floors_and_caps() {
        assert_eq!(chunk_percent(0, 1000), 0);
        assert_eq!(chunk_percent(999, 1000), 99);
        assert_eq!(chunk_percent(1000, 1000), 100);
        assert_eq!(chunk_percent(1500, 1000), 100);
        assert_eq!(chunk_percent(1, 3), 33);
        assert_eq!(chunk_percent(5, 0), 0);
    }

    #[test]
    fn safe_destination_keeps_keys_under_the_base() {
        let base = Path::new("/downloads");
        assert_eq!(
            safe_destination(base, "en-guide.pdf").unwrap(),
            base.join("en-guide.pdf")
        );
        assert_eq!(
            safe_destination(base, "en-docs/guide.pdf").unwrap(),
            base.join("en-docs/guide.pdf")
        );
    }

    #[test]
    fn safe_destination_rejects_escaping_keys() {
        let base = Path::new("/downloads");
        assert!(safe_destination(base, "../escape.txt").is_err());
        assert!(safe_destination(base, "en-docs/../../escape.txt").is_err());
        assert!(safe_destination(base, "/etc/hosts").is_err());
        assert!(safe_destination(base, "./dotted").is_err());
        assert!(safe_destination(base, "").is_err());
    }
}

//! Public-bucket probing over plain HTTP
//!
//! For buckets with public read access, objects live at predictable URLs
//! and can be discovered one key at a time without credentials.

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::{Client, StatusCode};

use crate::error::{Error, Result};
use crate::listing::ObjectRecord;

/// HEAD an object at the public URL `{endpoint}/{bucket}/{key}`.
///
/// Returns `None` when the object does not exist. Size and last-modified
/// come from response headers when the server provides them.
pub async fn probe_object(
    http: &Client,
    endpoint: &str,
    bucket: &str,
    key: &str,
) -> Result<Option<ObjectRecord>> {
    let url = format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key);
    let response = http
        .head(&url)
        .send()
        .await
        .map_err(|e| Error::Transport(format!("probe request failed: {}", e)))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if status == StatusCode::FORBIDDEN {
        return Err(Error::Access(format!("probe denied for {}", url)));
    }
    if !status.is_success() {
        return Err(Error::Transport(format!(
            "probe failed with status {}",
            status
        )));
    }

    let size = response
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok());
    let last_modified = response
        .headers()
        .get(reqwest::header::LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_http_date);

    debug!("probe_hit: {} size={:?}", key, size);
    Ok(Some(ObjectRecord {
        key: key.to_string(),
        size,
        last_modified,
    }))
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

//! Bucket listing flattened into one sequence for classification

use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{map_sdk_error, Result};

/// A single object as returned by the bucket listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub key: String,
    pub size: Option<i64>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// List every object in the bucket as one flat sequence.
///
/// Pages through ListObjectsV2 with continuation tokens. A failed page
/// aborts the whole listing so callers never classify partial data.
pub async fn list_objects(client: &Client, bucket: &str) -> Result<Vec<ObjectRecord>> {
    let mut records: Vec<ObjectRecord> = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let mut request = client.list_objects_v2().bucket(bucket).max_keys(1000);
        if let Some(token) = &continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_sdk_error("list objects", e))?;

        let page: Vec<ObjectRecord> = response
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?.to_string();
                // Skip directory markers
                if key.ends_with('/') {
                    return None;
                }
                Some(ObjectRecord {
                    key,
                    size: obj.size(),
                    last_modified: obj.last_modified().and_then(to_chrono),
                })
            })
            .collect();
        records.extend(page);

        if !response.is_truncated().unwrap_or(false) {
            break;
        }
        continuation_token = response.next_continuation_token().map(|s| s.to_string());
    }

    debug!("listing_done: bucket={} objects={}", bucket, records.len());
    Ok(records)
}

fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

//! Signed-URL issuing

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use std::time::Duration;

use crate::error::{map_sdk_error, Error, Result};

/// Validity window for signed retrieval URLs
pub const SIGNED_URL_TTL_SECS: u64 = 3600;

/// Issues time-limited retrieval URLs for objects in a bucket
#[async_trait]
pub trait UrlSigner: Send + Sync {
    async fn sign(&self, key: &str) -> Result<String>;
}

/// Production signer backed by presigned S3 GetObject requests
pub struct S3Signer {
    client: Client,
    bucket: String,
}

impl S3Signer {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        S3Signer {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl UrlSigner for S3Signer {
    async fn sign(&self, key: &str) -> Result<String> {
        let presigning_config = PresigningConfig::builder()
            .expires_in(Duration::from_secs(SIGNED_URL_TTL_SECS))
            .build()
            .map_err(|e| Error::Other(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| map_sdk_error("sign url", e))?;

        Ok(presigned.uri().to_string())
    }
}

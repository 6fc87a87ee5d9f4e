//! Error taxonomy shared by listing, signing and download operations

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything the core surfaces to the presentation layer. No operation
/// retries on its own; each failure carries a human-readable message.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Required credentials, bucket or endpoint missing
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The backend denied listing, signing or retrieval
    #[error("access denied: {0}")]
    Access(String),

    /// Bucket or key does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Network failure or non-success HTTP status
    #[error("transport error: {0}")]
    Transport(String),

    /// Failure mid-stream during a download
    #[error("stream error: {0}")]
    Stream(String),

    /// Uncategorized failure carrying the underlying description
    #[error("{0}")]
    Other(String),
}

/// Map an SDK service error into the taxonomy by its error code.
pub(crate) fn map_sdk_error<E, R>(op: &str, err: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::fmt::Debug,
    R: std::fmt::Debug,
{
    let (code, message) = match err.as_service_error() {
        Some(service) => (
            service.code().map(str::to_string),
            service.message().map(str::to_string),
        ),
        None => (None, None),
    };
    let message = message
        .or_else(|| code.clone())
        .unwrap_or_else(|| format!("{:?}", err));

    match code.as_deref() {
        Some("AccessDenied") | Some("InvalidAccessKeyId") | Some("SignatureDoesNotMatch") => {
            Error::Access(format!("{}: {}", op, message))
        }
        Some("NoSuchBucket") | Some("NoSuchKey") | Some("NotFound") => {
            Error::NotFound(format!("{}: {}", op, message))
        }
        _ => Error::Transport(format!("{}: {}", op, message)),
    }
}

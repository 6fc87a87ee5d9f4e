//! Environment-backed configuration

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{Error, Result};

const ENV_ACCESS_KEY_ID: &str = "BUCKETSHELF_ACCESS_KEY_ID";
const ENV_SECRET_ACCESS_KEY: &str = "BUCKETSHELF_SECRET_ACCESS_KEY";
const ENV_REGION: &str = "BUCKETSHELF_REGION";
const ENV_ENDPOINT: &str = "BUCKETSHELF_ENDPOINT";
const ENV_BUCKET: &str = "BUCKETSHELF_BUCKET";
const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub endpoint: String,
    pub bucket: String,
}

impl ShelfConfig {
    /// Load configuration from the environment. Every required variable is
    /// validated for presence before any storage operation runs; a missing
    /// one is reported as a configuration error naming the variable.
    pub fn from_env() -> Result<Self> {
        Ok(ShelfConfig {
            access_key_id: required(ENV_ACCESS_KEY_ID)?,
            secret_access_key: required(ENV_SECRET_ACCESS_KEY)?,
            region: env::var(ENV_REGION).unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            endpoint: required(ENV_ENDPOINT)?,
            bucket: required(ENV_BUCKET)?,
        })
    }
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Configuration(format!("{} is not set", name))),
    }
}

//! S3 client construction

use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::Client;

use crate::config::ShelfConfig;

/// Create an S3 client for the configured S3-compatible endpoint
pub fn create_client(config: &ShelfConfig) -> Client {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "bucketshelf",
    );

    let s3_config = S3ConfigBuilder::new()
        .credentials_provider(credentials)
        .region(Region::new(config.region.clone()))
        .endpoint_url(&config.endpoint)
        .force_path_style(true)
        .build();

    Client::from_conf(s3_config)
}

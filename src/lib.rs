//! Client library for browsing and downloading files from S3-compatible
//! object storage buckets.
//!
//! The library owns two pieces of logic: the section classifier, which
//! groups a bucket listing by a two-letter key prefix convention, and the
//! progressive downloader, which streams objects through signed URLs while
//! reporting per-key progress. A presentation layer (the `bucketshelf`
//! binary, or any other frontend) consumes both through explicit state
//! snapshots and an event channel.

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod listing;
pub mod public;
pub mod sections;
pub mod signer;

pub use config::ShelfConfig;
pub use error::{Error, Result};

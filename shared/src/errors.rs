//! Error types shared between the schedule calculator and the cache policy

use thiserror::Error;

/// Cache-store error types
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache storage unavailable")]
    Unavailable,
}

/// Errors produced by the request-interception pipeline
///
/// `Network` carries the original failure message so that a
/// network-and-cache miss re-raises what the network leg reported
/// instead of a synthesized "offline" response.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network request failed: {0}")]
    Network(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("cached day record could not be rewritten: {0}")]
    Rewrite(#[from] serde_json::Error),

    #[error("shell asset {url} returned status {status}")]
    Precache { url: String, status: u16 },
}

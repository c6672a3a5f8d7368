//! Offline-cache interception policy
//!
//! Runs on every outgoing request: network first, write-through caching
//! of successful GET responses, cache fallback when the network leg
//! throws. Deep links under the client-routed day view fall back to the
//! cached app shell, and cache-served day records are rewritten to carry
//! `cached: true` so the schedule layer can render them read-only.
//!
//! Both collaborators are injected: [`Network`] for the live leg and
//! [`CacheStore`] for the fallback. That keeps the policy a pure
//! decision procedure that tests drive with fakes.

mod http;
mod store;

pub use http::{Method, Request, Response};
pub use store::{CacheEntry, CacheRegistry, CacheStore, MemoryCache};

use crate::errors::FetchError;
use async_trait::async_trait;
use tracing::debug;

/// Path prefix of client-routed day views; these deep links only exist
/// after script execution, so their cache fallback is the app shell
pub const DAY_VIEW_PREFIX: &str = "/baby/";

/// Canonical cache key for the app shell
pub const ROOT_SHELL_PATH: &str = "/";

/// Shell assets pre-populated before a new cache version takes over
pub const SHELL_MANIFEST: [&str; 5] = [
    "/",
    "/static/app.js",
    "/static/icon.png",
    "/static/icon.svg",
    "/static/style.css",
];

/// Store name for a cache version tag, e.g. `babynap-v1`
pub fn cache_name(version: &str) -> String {
    format!("babynap-{}", version)
}

/// The live network leg of the pipeline
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Whether a URL has the shape of a day-data API response
pub fn is_day_data_url(url: &str) -> bool {
    let pattern = regex_lite::Regex::new(r"^/api/baby/\d+/day/\d{4}-\d{2}-\d{2}$").unwrap();
    pattern.is_match(url)
}

/// Intercept one request: network, then cache, then the original error
///
/// Non-2xx live responses are returned unmodified and are not cached;
/// only a failed network *attempt* falls back to the store. When neither
/// source can answer, the original network failure is re-raised rather
/// than fabricating a synthetic response. Cache-store failures propagate
/// as fetch failures.
pub async fn handle(
    request: &Request,
    network: &dyn Network,
    cache: &dyn CacheStore,
) -> Result<Response, FetchError> {
    match network.fetch(request).await {
        Ok(response) => {
            if response.is_ok() && request.is_cacheable() {
                cache.put(
                    &request.url,
                    CacheEntry {
                        url: request.url.clone(),
                        response: response.clone(),
                    },
                )?;
            }
            Ok(response)
        }
        Err(err) => {
            let key = if request.url.starts_with(DAY_VIEW_PREFIX) {
                ROOT_SHELL_PATH
            } else {
                request.url.as_str()
            };
            match cache.get(key)? {
                Some(entry) => {
                    debug!(url = %request.url, key = %key, "network failed, serving from cache");
                    if is_day_data_url(&entry.url) {
                        mark_cached(entry)
                    } else {
                        Ok(entry.response)
                    }
                }
                None => Err(err),
            }
        }
    }
}

/// Pre-populate a fresh store with the shell manifest
///
/// Fails if any asset cannot be fetched or returns a non-2xx status; a
/// partially-installed shell must not take over.
pub async fn precache(
    cache: &dyn CacheStore,
    manifest: &[&str],
    network: &dyn Network,
) -> Result<(), FetchError> {
    for url in manifest {
        let request = Request::get(*url);
        let response = network.fetch(&request).await?;
        if !response.is_ok() {
            return Err(FetchError::Precache {
                url: url.to_string(),
                status: response.status,
            });
        }
        cache.put(
            url,
            CacheEntry {
                url: url.to_string(),
                response,
            },
        )?;
    }
    debug!(assets = manifest.len(), "shell manifest cached");
    Ok(())
}

/// Rewrite a cache-served day record as stale: `cached: true` is
/// injected into the JSON body, headers and status are preserved
fn mark_cached(entry: CacheEntry) -> Result<Response, FetchError> {
    let mut value: serde_json::Value = serde_json::from_slice(&entry.response.body)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("cached".to_string(), serde_json::Value::Bool(true));
    }
    let body = serde_json::to_vec(&value)?;
    Ok(Response::new(entry.response.status, entry.response.headers, body))
}

//! Client error handling
//!
//! One error type for the day pipeline. "No record yet" is not an error
//! (the API layer returns `Ok(None)` for a 404 day), so every variant
//! here is something the UI must surface: a load or save that failed, or
//! a save precondition that was not met.

use babynap_shared::FetchError;
use thiserror::Error;

/// Errors surfaced by the day API and the schedule aggregate
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network and cache both exhausted; carries the original failure
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed response body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("invalid nap input: {0}")]
    Validation(String),

    #[error("segment is an offline copy and read-only")]
    ReadOnly,

    #[error("wake-up time is required before saving")]
    MissingWakeUpTime,

    #[error("a save for this segment is already in flight")]
    SaveInFlight,

    #[error("no segment with index {0}")]
    UnknownSegment(u8),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether this failure means the day simply has no state the client
    /// could determine, as opposed to a benign empty day
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Fetch(_) | ClientError::Status { .. } | ClientError::Body(_)
        )
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

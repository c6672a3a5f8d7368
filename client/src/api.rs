//! Typed day API client
//!
//! Every request (babies list, day fetch, nap save) is dispatched
//! through the offline cache policy, so a dead network can still answer
//! a day view from the versioned store, marked stale, while saves fail
//! cleanly. A 404 day is a valid empty state, not an error.

use crate::error::{ClientError, ClientResult};
use crate::net::HttpNetwork;
use crate::routes;
use babynap_shared::offline::{self, MemoryCache, Request, Response};
use babynap_shared::validation;
use babynap_shared::{Baby, DayRecord, SaveNapRequest};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Client for the day API, intercepted by the offline cache policy
#[derive(Clone)]
pub struct DayApi {
    network: HttpNetwork,
    cache: Arc<MemoryCache>,
}

impl DayApi {
    pub fn new(network: HttpNetwork, cache: Arc<MemoryCache>) -> Self {
        Self { network, cache }
    }

    /// Fetch the babies list
    pub async fn list_babies(&self) -> ClientResult<Vec<Baby>> {
        let response = self
            .intercepted(Request::get(routes::api_babies_path()))
            .await?;
        if !response.is_ok() {
            return Err(ClientError::Status {
                status: response.status,
                url: routes::api_babies_path().to_string(),
            });
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Fetch one baby's day record
    ///
    /// Returns `Ok(None)` for a 404: the day simply has no data yet.
    /// Any other non-2xx status is a load failure the caller must render
    /// distinctly from an empty day.
    pub async fn get_day(&self, baby_id: i64, day: NaiveDate) -> ClientResult<Option<DayRecord>> {
        let url = routes::api_day_path(baby_id, day);
        let response = self.intercepted(Request::get(url.clone())).await?;
        match response.status {
            404 => {
                debug!(baby_id, %day, "no day record yet");
                Ok(None)
            }
            _ if response.is_ok() => {
                let record: DayRecord = serde_json::from_slice(&response.body)?;
                if record.cached {
                    info!(baby_id, %day, "day record served from offline cache");
                }
                Ok(Some(record))
            }
            status => Err(ClientError::Status { status, url }),
        }
    }

    /// Persist one segment's fields
    pub async fn save_nap(
        &self,
        baby_id: i64,
        day: NaiveDate,
        index: u8,
        request: &SaveNapRequest,
    ) -> ClientResult<()> {
        validation::validate_segment_index(index).map_err(ClientError::Validation)?;
        request
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;
        validation::validate_awake_window(request.awake_window).map_err(ClientError::Validation)?;
        validation::validate_calm_down(request.calm_down_time).map_err(ClientError::Validation)?;

        let url = routes::api_nap_path(baby_id, day, index);
        let body = serde_json::to_vec(request)?;
        let response = self.intercepted(Request::post_json(url.clone(), body)).await?;
        if response.is_ok() {
            debug!(baby_id, %day, index, "nap saved");
            Ok(())
        } else {
            Err(ClientError::Status {
                status: response.status,
                url,
            })
        }
    }

    async fn intercepted(&self, request: Request) -> ClientResult<Response> {
        offline::handle(&request, &self.network, self.cache.as_ref())
            .await
            .map_err(ClientError::from)
    }
}

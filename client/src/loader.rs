//! Navigation-aware day loading
//!
//! Rapid re-navigation can leave a fetch for the previous day in flight;
//! its response must not overwrite the newer day's state. Each
//! navigation bumps a generation counter and hands out a ticket; a fetch
//! completing under a stale ticket is discarded, success or failure,
//! never applied.

use crate::api::DayApi;
use crate::day::DaySchedule;
use crate::error::ClientResult;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Generation counter for (baby, day) navigation
#[derive(Debug, Default)]
pub struct Navigator {
    generation: AtomicU64,
}

/// One navigation's claim on the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTicket {
    generation: u64,
    pub baby_id: i64,
    pub day: NaiveDate,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to a (baby, day); supersedes every earlier ticket
    pub fn navigate(&self, baby_id: i64, day: NaiveDate) -> NavTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        NavTicket {
            generation,
            baby_id,
            day,
        }
    }

    /// Whether a ticket still matches the current navigation state
    pub fn is_current(&self, ticket: &NavTicket) -> bool {
        ticket.generation == self.generation.load(Ordering::SeqCst)
    }
}

/// Outcome of a navigated day load
pub enum LoadOutcome {
    /// The fetch matched the current navigation and was applied
    Loaded(DaySchedule),
    /// The view moved on while the fetch was in flight; result discarded
    Superseded,
}

/// Fetch and reconcile the ticket's day, unless the ticket went stale
pub async fn load_day(
    api: &DayApi,
    navigator: &Navigator,
    ticket: NavTicket,
) -> ClientResult<LoadOutcome> {
    let result = api.get_day(ticket.baby_id, ticket.day).await;
    if !navigator.is_current(&ticket) {
        debug!(baby_id = ticket.baby_id, day = %ticket.day, "discarding superseded day fetch");
        return Ok(LoadOutcome::Superseded);
    }
    let record = result?;
    Ok(LoadOutcome::Loaded(DaySchedule::from_record(
        ticket.baby_id,
        ticket.day,
        record.as_ref(),
    )))
}

//! Day-state aggregation
//!
//! [`DaySchedule`] owns the five segments of one (baby, day) view. All
//! segment edits go through it so derived times and day totals are
//! recomputed together, and an explicit totals-changed callback keeps
//! the day-level display current: segment mutations report back to the
//! aggregator instead of relying on an event bus.

use crate::api::DayApi;
use crate::error::{ClientError, ClientResult};
use babynap_shared::schedule::{
    compute_totals, reconcile_day, DayTotals, NapSegment, SavingStatus, SEGMENTS_PER_DAY,
};
use babynap_shared::validation;
use babynap_shared::{DayRecord, SaveNapRequest};
use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};
use validator::Validate;

type TotalsCallback = Box<dyn Fn(&DayTotals) + Send + Sync>;

/// One day's five segments plus derived totals
pub struct DaySchedule {
    baby_id: i64,
    day: NaiveDate,
    baby_name: Option<String>,
    offline: bool,
    segments: [NapSegment; SEGMENTS_PER_DAY],
    totals: DayTotals,
    on_totals: Option<TotalsCallback>,
}

impl DaySchedule {
    /// Build the day state from a fetched record, or from defaults when
    /// the day has no record yet
    pub fn from_record(baby_id: i64, day: NaiveDate, record: Option<&DayRecord>) -> Self {
        let segments = reconcile_day(day, record);
        let totals = compute_totals(&segments);
        Self {
            baby_id,
            day,
            baby_name: record.map(|r| r.baby.name.clone()),
            offline: record.map(|r| r.cached).unwrap_or(false),
            segments,
            totals,
            on_totals: None,
        }
    }

    pub fn baby_id(&self) -> i64 {
        self.baby_id
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn baby_name(&self) -> Option<&str> {
        self.baby_name.as_deref()
    }

    /// Whether the whole record was served from the offline cache
    pub fn offline(&self) -> bool {
        self.offline
    }

    pub fn segments(&self) -> &[NapSegment; SEGMENTS_PER_DAY] {
        &self.segments
    }

    pub fn totals(&self) -> &DayTotals {
        &self.totals
    }

    /// Register the day-level callback fired after every recomputation
    pub fn on_totals_changed(&mut self, callback: impl Fn(&DayTotals) + Send + Sync + 'static) {
        self.on_totals = Some(Box::new(callback));
    }

    pub fn segment(&self, index: u8) -> ClientResult<&NapSegment> {
        self.segments
            .iter()
            .find(|s| s.index == index)
            .ok_or(ClientError::UnknownSegment(index))
    }

    /// Set a segment's wake-up time and recompute
    pub fn set_wake_up_time(&mut self, index: u8, time: NaiveTime) -> ClientResult<()> {
        self.mutate_segment(index, |segment| {
            segment.wake_up_time = Some(time);
            Ok(())
        })
    }

    /// Set a segment's awake window and recompute
    pub fn set_awake_window(&mut self, index: u8, minutes: i32) -> ClientResult<()> {
        validation::validate_awake_window(minutes).map_err(ClientError::Validation)?;
        self.mutate_segment(index, |segment| {
            segment.awake_window = minutes;
            Ok(())
        })
    }

    /// Set a segment's calm-down duration and recompute
    pub fn set_calm_down(&mut self, index: u8, minutes: i32) -> ClientResult<()> {
        validation::validate_calm_down(minutes).map_err(ClientError::Validation)?;
        self.mutate_segment(index, |segment| {
            segment.calm_down = minutes;
            Ok(())
        })
    }

    /// Start a save: run the guards, re-estimate, flip the status to
    /// `Saving` and hand back the wire request
    ///
    /// Rejected without any I/O when the segment is a read-only offline
    /// copy, has no wake-up time, already has a save in flight, or fails
    /// field validation.
    pub fn begin_save(&mut self, index: u8) -> ClientResult<SaveNapRequest> {
        let segment = self.segment_mut(index)?;
        if segment.cached {
            return Err(ClientError::ReadOnly);
        }
        if segment.saving == SavingStatus::Saving {
            return Err(ClientError::SaveInFlight);
        }
        let request = segment.save_request().ok_or(ClientError::MissingWakeUpTime)?;
        request
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;
        validation::validate_awake_window(request.awake_window).map_err(ClientError::Validation)?;
        validation::validate_calm_down(request.calm_down_time).map_err(ClientError::Validation)?;

        segment.estimate();
        segment.saving = SavingStatus::Saving;
        self.recompute_totals();
        Ok(request)
    }

    /// Record a save outcome: back to `Idle` on success, `Error` on
    /// failure (the segment stays editable and retryable)
    pub fn finish_save(&mut self, index: u8, success: bool) -> ClientResult<()> {
        let segment = self.segment_mut(index)?;
        segment.saving = if success {
            SavingStatus::Idle
        } else {
            SavingStatus::Error
        };
        Ok(())
    }

    /// Persist one segment through the API
    ///
    /// Saves for distinct segments are independent: each targets its own
    /// (baby, day, index) key and only this segment's status changes.
    pub async fn save_segment(&mut self, api: &DayApi, index: u8) -> ClientResult<()> {
        let request = self.begin_save(index)?;
        match api.save_nap(self.baby_id, self.day, index, &request).await {
            Ok(()) => {
                info!(baby_id = self.baby_id, day = %self.day, index, "segment saved");
                self.finish_save(index, true)
            }
            Err(err) => {
                warn!(baby_id = self.baby_id, day = %self.day, index, error = %err, "segment save failed");
                self.finish_save(index, false)?;
                Err(err)
            }
        }
    }

    fn segment_mut(&mut self, index: u8) -> ClientResult<&mut NapSegment> {
        self.segments
            .iter_mut()
            .find(|s| s.index == index)
            .ok_or(ClientError::UnknownSegment(index))
    }

    fn mutate_segment(
        &mut self,
        index: u8,
        edit: impl FnOnce(&mut NapSegment) -> ClientResult<()>,
    ) -> ClientResult<()> {
        let segment = self.segment_mut(index)?;
        if segment.cached {
            return Err(ClientError::ReadOnly);
        }
        edit(segment)?;
        segment.estimate();
        self.recompute_totals();
        Ok(())
    }

    fn recompute_totals(&mut self) {
        self.totals = compute_totals(&self.segments);
        if let Some(callback) = &self.on_totals {
            callback(&self.totals);
        }
    }
}

//! Nap schedule calculator
//!
//! Derives sleep and put-down times for the five segments of a day
//! (naps 1-4, then night) from each segment's wake-up time, awake window
//! and calm-down duration, reconciles the segments against a server day
//! record, and computes day-level totals.

use crate::models::{clock_time, clock_time_opt, DayRecord, Nap, SaveNapRequest};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Number of segments in a day: four naps plus the night
pub const SEGMENTS_PER_DAY: usize = 5;

/// Calm-down duration used when the server has no value for a segment
pub const DEFAULT_CALM_DOWN_MINUTES: i32 = 15;

/// Fixed per-index segment behavior
///
/// One segment type parameterized by index; the night slot differs only
/// in label and default window, so variance lives in this table rather
/// than in subtypes.
#[derive(Debug, Clone, Copy)]
pub struct SegmentSlot {
    pub index: u8,
    pub label: &'static str,
    pub default_awake_window: i32,
}

/// The five slots of a day, in display order
pub const SEGMENT_SLOTS: [SegmentSlot; SEGMENTS_PER_DAY] = [
    SegmentSlot { index: 1, label: "nap 1", default_awake_window: 80 },
    SegmentSlot { index: 2, label: "nap 2", default_awake_window: 95 },
    SegmentSlot { index: 3, label: "nap 3", default_awake_window: 95 },
    SegmentSlot { index: 4, label: "nap 4", default_awake_window: 90 },
    SegmentSlot { index: 5, label: "night", default_awake_window: 105 },
];

/// Look up the slot for a segment index
pub fn slot(index: u8) -> Option<&'static SegmentSlot> {
    SEGMENT_SLOTS.iter().find(|s| s.index == index)
}

/// Transient save state of one segment; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SavingStatus {
    #[default]
    Idle,
    Saving,
    Error,
}

/// Derived times for a segment; recomputed on every edit, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NapEstimate {
    pub sleep_time: NaiveDateTime,
    pub put_down_time: NaiveDateTime,
    pub sleep_time_display: String,
    pub put_down_time_display: String,
}

/// One of the five ordered segments of a day
///
/// Segment N's wake-up time is displayed against segment N-1's derived
/// sleep time, but each segment stores its own wake-up time; the values
/// are juxtaposed, never derived from each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NapSegment {
    pub index: u8,
    pub day: NaiveDate,
    /// True when the data came from an offline cache fallback; the
    /// segment is then read-only.
    #[serde(default)]
    pub cached: bool,
    #[serde(default, with = "clock_time_opt", skip_serializing_if = "Option::is_none")]
    pub wake_up_time: Option<NaiveTime>,
    pub awake_window: i32,
    pub calm_down: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<NapEstimate>,
    #[serde(default)]
    pub saving: SavingStatus,
}

impl NapSegment {
    /// Segment with no server data: default window, nothing scheduled,
    /// always editable
    pub fn unscheduled(slot: &SegmentSlot, day: NaiveDate) -> Self {
        Self {
            index: slot.index,
            day,
            cached: false,
            wake_up_time: None,
            awake_window: slot.default_awake_window,
            calm_down: DEFAULT_CALM_DOWN_MINUTES,
            estimate: None,
            saving: SavingStatus::Idle,
        }
    }

    /// Segment populated from a stored nap, with derived times computed
    pub fn from_nap(slot: &SegmentSlot, day: NaiveDate, nap: &Nap, cached: bool) -> Self {
        let mut segment = Self {
            index: slot.index,
            day,
            cached,
            wake_up_time: Some(nap.wake_up_time),
            awake_window: nap.awake_window,
            calm_down: nap.calm_down_time,
            estimate: None,
            saving: SavingStatus::Idle,
        };
        segment.estimate();
        segment
    }

    /// Display label for this segment ("nap 1".."nap 4", "night")
    pub fn label(&self) -> &'static str {
        slot(self.index).map(|s| s.label).unwrap_or("nap")
    }

    /// Label for the wake-up input: the first segment starts the day,
    /// later ones record the previous segment's wake-up
    pub fn wake_label(&self) -> String {
        if self.index == 1 {
            "morning pick-up".to_string()
        } else {
            format!("nap {} wake-up time", self.index - 1)
        }
    }

    /// Recompute the derived sleep and put-down times
    ///
    /// Pure in its inputs and idempotent; a segment without a wake-up
    /// time has no derived times. Sums past midnight roll into the next
    /// calendar day through the date arithmetic.
    pub fn estimate(&mut self) {
        self.estimate = self.wake_up_time.map(|wake| {
            let wake_at = self.day.and_time(wake);
            let sleep_time = wake_at + Duration::minutes(self.awake_window as i64);
            let put_down_time = sleep_time - Duration::minutes(self.calm_down as i64);
            NapEstimate {
                sleep_time_display: clock_time::format(&sleep_time.time()),
                put_down_time_display: clock_time::format(&put_down_time.time()),
                sleep_time,
                put_down_time,
            }
        });
    }

    /// Derived sleep time, computed from the raw fields
    pub fn sleep_time(&self) -> Option<NaiveDateTime> {
        self.wake_up_time
            .map(|wake| self.day.and_time(wake) + Duration::minutes(self.awake_window as i64))
    }

    /// Derived put-down time, computed from the raw fields
    pub fn put_down_time(&self) -> Option<NaiveDateTime> {
        self.sleep_time()
            .map(|sleep| sleep - Duration::minutes(self.calm_down as i64))
    }

    /// Whether a save may be started for this segment
    pub fn can_save(&self) -> bool {
        self.wake_up_time.is_some() && !self.cached && self.saving != SavingStatus::Saving
    }

    /// Wire request for persisting this segment's fields
    ///
    /// None when there is no wake-up time to persist.
    pub fn save_request(&self) -> Option<SaveNapRequest> {
        self.wake_up_time.map(|wake_up_time| SaveNapRequest {
            wake_up_time,
            awake_window: self.awake_window,
            calm_down_time: self.calm_down,
        })
    }
}

/// Day-level totals over the five segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DayTotals {
    pub total_nap_minutes: i64,
    pub total_awake_minutes: i64,
}

/// Build the five segments of a day from a server record, or from the
/// per-index defaults when the record (or an index within it) is absent
///
/// A 404 day maps to `record = None` and is a valid state: five default
/// segments, nothing scheduled, all editable. Unpopulated indices are
/// never marked cached, even inside a cached record; there is nothing in
/// them to protect.
pub fn reconcile_day(day: NaiveDate, record: Option<&DayRecord>) -> [NapSegment; SEGMENTS_PER_DAY] {
    std::array::from_fn(|i| {
        let slot = &SEGMENT_SLOTS[i];
        match record.and_then(|r| r.nap(slot.index).map(|nap| (nap, r.cached))) {
            Some((nap, cached)) => NapSegment::from_nap(slot, day, nap, cached),
            None => NapSegment::unscheduled(slot, day),
        }
    })
}

/// Sum awake and nap minutes over the day
///
/// Segments without a wake-up time are excluded from both sums. The nap
/// total chains each segment's wake-up time against the previous
/// segment's *derived* sleep time, compared wall-clock.
pub fn compute_totals(segments: &[NapSegment]) -> DayTotals {
    let mut totals = DayTotals::default();
    for (i, segment) in segments.iter().enumerate() {
        let Some(wake) = segment.wake_up_time else {
            continue;
        };
        totals.total_awake_minutes += segment.awake_window as i64;
        if i == 0 {
            continue;
        }
        let Some(prev_sleep) = segments[i - 1].sleep_time() else {
            continue;
        };
        totals.total_nap_minutes += minutes_of_day(wake) - minutes_of_day(prev_sleep.time());
    }
    totals
}

/// Format a minute count for display: "45 minutes", "1hrs 30mins"
pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        format!("{} minutes", minutes)
    } else {
        format!("{}hrs {}mins", minutes / 60, minutes % 60)
    }
}

fn minutes_of_day(time: NaiveTime) -> i64 {
    (time.hour() * 60 + time.minute()) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BabySummary;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 26).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record_with(naps: Vec<(u8, Nap)>, cached: bool) -> DayRecord {
        DayRecord {
            baby: BabySummary { name: "Ada".to_string() },
            day: day(),
            naps: naps.into_iter().collect::<BTreeMap<_, _>>(),
            cached,
        }
    }

    fn nap(h: u32, m: u32, window: i32, calm: i32) -> Nap {
        Nap {
            wake_up_time: time(h, m),
            awake_window: window,
            calm_down_time: calm,
        }
    }

    // =========================================================================
    // Estimation
    // =========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_sleep_is_wake_plus_window(
            hour in 0u32..24,
            minute in 0u32..60,
            window in 30i32..=180,
            calm in 0i32..=60,
        ) {
            let slot = &SEGMENT_SLOTS[0];
            let mut segment = NapSegment::unscheduled(slot, day());
            segment.wake_up_time = Some(time(hour, minute));
            segment.awake_window = window;
            segment.calm_down = calm;
            segment.estimate();

            let estimate = segment.estimate.clone().unwrap();
            let wake_at = day().and_time(time(hour, minute));
            prop_assert_eq!(estimate.sleep_time - wake_at, Duration::minutes(window as i64));
            prop_assert_eq!(
                estimate.sleep_time - estimate.put_down_time,
                Duration::minutes(calm as i64)
            );
        }

        #[test]
        fn prop_estimate_is_idempotent(
            hour in 0u32..24,
            minute in 0u32..60,
            window in 30i32..=180,
            calm in 0i32..=60,
        ) {
            let slot = &SEGMENT_SLOTS[2];
            let mut segment = NapSegment::unscheduled(slot, day());
            segment.wake_up_time = Some(time(hour, minute));
            segment.awake_window = window;
            segment.calm_down = calm;
            segment.estimate();
            let first = segment.estimate.clone();
            segment.estimate();
            prop_assert_eq!(first, segment.estimate);
        }
    }

    #[test]
    fn test_estimate_noop_without_wake_up_time() {
        let mut segment = NapSegment::unscheduled(&SEGMENT_SLOTS[0], day());
        segment.estimate();
        assert!(segment.estimate.is_none());
        assert!(segment.sleep_time().is_none());
        assert!(segment.put_down_time().is_none());
    }

    #[test]
    fn test_estimate_display_strings() {
        let segment = NapSegment::from_nap(&SEGMENT_SLOTS[0], day(), &nap(6, 45, 80, 15), false);
        let estimate = segment.estimate.unwrap();
        assert_eq!(estimate.sleep_time_display, "08:05");
        assert_eq!(estimate.put_down_time_display, "07:50");
    }

    #[test]
    fn test_estimate_rolls_past_midnight() {
        // night segment waking late: 23:30 + 105 minutes lands next day
        let segment = NapSegment::from_nap(&SEGMENT_SLOTS[4], day(), &nap(23, 30, 105, 15), false);
        let estimate = segment.estimate.unwrap();
        assert_eq!(
            estimate.sleep_time.date(),
            NaiveDate::from_ymd_opt(2024, 3, 27).unwrap()
        );
        assert_eq!(estimate.sleep_time_display, "01:15");
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    #[rstest]
    #[case(1, "nap 1", 80)]
    #[case(2, "nap 2", 95)]
    #[case(3, "nap 3", 95)]
    #[case(4, "nap 4", 90)]
    #[case(5, "night", 105)]
    fn test_slot_table(#[case] index: u8, #[case] label: &str, #[case] window: i32) {
        let slot = slot(index).unwrap();
        assert_eq!(slot.label, label);
        assert_eq!(slot.default_awake_window, window);
    }

    #[test]
    fn test_reconcile_absent_record_yields_defaults() {
        let segments = reconcile_day(day(), None);
        assert_eq!(segments.len(), SEGMENTS_PER_DAY);
        for (segment, slot) in segments.iter().zip(SEGMENT_SLOTS.iter()) {
            assert_eq!(segment.index, slot.index);
            assert!(segment.wake_up_time.is_none());
            assert_eq!(segment.awake_window, slot.default_awake_window);
            assert_eq!(segment.calm_down, DEFAULT_CALM_DOWN_MINUTES);
            assert!(!segment.cached);
            assert!(segment.estimate.is_none());
            assert_eq!(segment.saving, SavingStatus::Idle);
        }
    }

    #[test]
    fn test_reconcile_partial_record() {
        let record = record_with(vec![(3, nap(12, 30, 95, 10))], false);
        let segments = reconcile_day(day(), Some(&record));

        let third = &segments[2];
        assert_eq!(third.wake_up_time, Some(time(12, 30)));
        assert_eq!(third.calm_down, 10);
        assert!(third.estimate.is_some());

        for segment in [&segments[0], &segments[1], &segments[3], &segments[4]] {
            assert!(segment.wake_up_time.is_none());
            assert!(!segment.cached);
        }
    }

    #[test]
    fn test_reconcile_cached_record_marks_only_populated_segments() {
        let record = record_with(vec![(1, nap(6, 45, 80, 15))], true);
        let segments = reconcile_day(day(), Some(&record));
        assert!(segments[0].cached);
        assert!(!segments[0].can_save());
        // defaults-only segments stay editable
        assert!(!segments[1].cached);
    }

    #[test]
    fn test_wake_labels() {
        let segments = reconcile_day(day(), None);
        assert_eq!(segments[0].wake_label(), "morning pick-up");
        assert_eq!(segments[1].wake_label(), "nap 1 wake-up time");
        assert_eq!(segments[4].wake_label(), "nap 4 wake-up time");
    }

    // =========================================================================
    // Totals
    // =========================================================================

    #[test]
    fn test_totals_exclude_unset_segments() {
        let mut segments = reconcile_day(day(), None);
        segments[1].wake_up_time = Some(time(8, 0));
        segments[1].awake_window = 90;
        segments[1].estimate();

        let totals = compute_totals(&segments);
        assert_eq!(totals.total_awake_minutes, 90);
        assert_eq!(totals.total_nap_minutes, 0);
    }

    #[test]
    fn test_totals_chain_derived_sleep_times() {
        let record = record_with(
            vec![
                (1, nap(6, 45, 80, 15)), // sleeps 08:05
                (2, nap(9, 0, 95, 15)),  // nap 1 lasted 08:05 -> 09:00 = 55
                (3, nap(12, 30, 95, 10)), // nap 2: slept 10:35, woke 12:30 = 115
            ],
            false,
        );
        let segments = reconcile_day(day(), Some(&record));
        let totals = compute_totals(&segments);
        assert_eq!(totals.total_awake_minutes, 80 + 95 + 95);
        assert_eq!(totals.total_nap_minutes, 55 + 115);
    }

    #[test]
    fn test_totals_skip_gap_after_unset_segment() {
        // naps 1 and 3 set, 2 unset: no pair is consecutive, so no nap time
        let record = record_with(
            vec![(1, nap(6, 45, 80, 15)), (3, nap(12, 30, 95, 10))],
            false,
        );
        let segments = reconcile_day(day(), Some(&record));
        let totals = compute_totals(&segments);
        assert_eq!(totals.total_awake_minutes, 80 + 95);
        assert_eq!(totals.total_nap_minutes, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_awake_total_sums_only_set_windows(mask in 0u8..32) {
            let mut segments = reconcile_day(day(), None);
            let mut expected = 0i64;
            for (i, segment) in segments.iter_mut().enumerate() {
                if mask & (1 << i) != 0 {
                    segment.wake_up_time = Some(time(6 + i as u32 * 3, 0));
                    segment.estimate();
                    expected += segment.awake_window as i64;
                }
            }
            prop_assert_eq!(compute_totals(&segments).total_awake_minutes, expected);
        }
    }

    // =========================================================================
    // Duration formatting
    // =========================================================================

    #[rstest]
    #[case(0, "0 minutes")]
    #[case(45, "45 minutes")]
    #[case(59, "59 minutes")]
    #[case(60, "1hrs 0mins")]
    #[case(90, "1hrs 30mins")]
    #[case(125, "2hrs 5mins")]
    fn test_format_duration(#[case] minutes: i64, #[case] expected: &str) {
        assert_eq!(format_duration(minutes), expected);
    }
}

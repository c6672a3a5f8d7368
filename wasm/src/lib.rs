//! Babynap WASM Module
//!
//! WebAssembly bindings over the shared nap schedule calculator so the
//! browser shell runs the same estimation, reconciliation and totals
//! logic as the native client. Records and segments cross the boundary
//! as JSON strings.

use babynap_shared::schedule::{self, NapSegment, SEGMENT_SLOTS};
use babynap_shared::DayRecord;
use chrono::{NaiveDate, NaiveTime};
use wasm_bindgen::prelude::*;

fn parse_day(day: &str) -> Result<NaiveDate, JsError> {
    day.parse::<NaiveDate>()
        .map_err(|e| JsError::new(&format!("invalid day {day:?}: {e}")))
}

/// Derive sleep and put-down times for one segment
///
/// Returns the estimate as JSON: machine times plus "HH:MM" display
/// strings.
#[wasm_bindgen]
pub fn estimate_nap(
    day: &str,
    wake_up_time: &str,
    awake_window: i32,
    calm_down: i32,
) -> Result<String, JsError> {
    let day = parse_day(day)?;
    let wake = NaiveTime::parse_from_str(wake_up_time, "%H:%M")
        .map_err(|e| JsError::new(&format!("invalid time {wake_up_time:?}: {e}")))?;

    let mut segment = NapSegment::unscheduled(&SEGMENT_SLOTS[0], day);
    segment.wake_up_time = Some(wake);
    segment.awake_window = awake_window;
    segment.calm_down = calm_down;
    segment.estimate();

    Ok(serde_json::to_string(&segment.estimate)?)
}

/// Build the five segments of a day from a day-record JSON payload
///
/// Pass no record for a 404 day: the segments come back with the
/// per-index default windows and nothing scheduled.
#[wasm_bindgen]
pub fn reconcile_day(day: &str, record_json: Option<String>) -> Result<String, JsError> {
    let day = parse_day(day)?;
    let record: Option<DayRecord> = match record_json {
        Some(json) => Some(serde_json::from_str(&json)?),
        None => None,
    };
    let segments = schedule::reconcile_day(day, record.as_ref());
    Ok(serde_json::to_string(&segments)?)
}

/// Compute day totals over a JSON array of segments
#[wasm_bindgen]
pub fn day_totals(segments_json: &str) -> Result<String, JsError> {
    let segments: Vec<NapSegment> = serde_json::from_str(segments_json)?;
    let totals = schedule::compute_totals(&segments);
    Ok(serde_json::to_string(&totals)?)
}

/// Format a minute count for display: "45 minutes", "1hrs 30mins"
#[wasm_bindgen]
pub fn format_duration(minutes: i64) -> String {
    schedule::format_duration(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_estimate_nap() {
        let out = estimate_nap("2024-03-26", "06:45", 80, 15).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["sleep_time_display"], "08:05");
        assert_eq!(value["put_down_time_display"], "07:50");
    }

    #[test]
    fn test_reconcile_day_without_record() {
        let out = reconcile_day("2024-03-26", None).unwrap();
        let segments: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(segments.as_array().unwrap().len(), 5);
        assert_eq!(segments[0]["awake_window"], 80);
        assert_eq!(segments[4]["awake_window"], 105);
        assert!(segments[0].get("wake_up_time").is_none());
    }

    #[test]
    fn test_reconcile_then_totals() {
        let record = json!({
            "baby": {"name": "Ada"},
            "day": "2024-03-26",
            "naps": {
                "1": {"wake_up_time": "06:45", "awake_window": 80, "calm_down_time": 15},
                "2": {"wake_up_time": "09:00", "awake_window": 95, "calm_down_time": 15}
            }
        });
        let segments = reconcile_day("2024-03-26", Some(record.to_string())).unwrap();
        let totals = day_totals(&segments).unwrap();
        let value: serde_json::Value = serde_json::from_str(&totals).unwrap();
        assert_eq!(value["total_awake_minutes"], 175);
        assert_eq!(value["total_nap_minutes"], 55);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45 minutes");
        assert_eq!(format_duration(90), "1hrs 30mins");
    }

    #[test]
    fn test_invalid_inputs_error() {
        assert!(estimate_nap("someday", "06:45", 80, 15).is_err());
        assert!(estimate_nap("2024-03-26", "late", 80, 15).is_err());
        assert!(day_totals("not json").is_err());
    }
}

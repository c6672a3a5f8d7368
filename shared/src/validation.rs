//! Input validation for nap segment fields
//!
//! Bounds mirror the day view's form controls. The `SaveNapRequest`
//! derive covers the plain ranges; the helpers here add the checks the
//! derive cannot express (the 5-minute step) and are usable on their own.

/// Smallest accepted awake window, in minutes
pub const MIN_AWAKE_WINDOW_MINUTES: i32 = 30;
/// Largest accepted awake window, in minutes
pub const MAX_AWAKE_WINDOW_MINUTES: i32 = 180;
/// Awake windows are edited in steps of this many minutes
pub const AWAKE_WINDOW_STEP_MINUTES: i32 = 5;
/// Largest accepted calm-down duration, in minutes
pub const MAX_CALM_DOWN_MINUTES: i32 = 60;

/// Validate an awake window (range and step)
pub fn validate_awake_window(minutes: i32) -> Result<(), String> {
    if minutes < MIN_AWAKE_WINDOW_MINUTES {
        return Err(format!(
            "Awake window must be at least {} minutes",
            MIN_AWAKE_WINDOW_MINUTES
        ));
    }
    if minutes > MAX_AWAKE_WINDOW_MINUTES {
        return Err(format!(
            "Awake window must be at most {} minutes",
            MAX_AWAKE_WINDOW_MINUTES
        ));
    }
    if minutes % AWAKE_WINDOW_STEP_MINUTES != 0 {
        return Err(format!(
            "Awake window must be a multiple of {} minutes",
            AWAKE_WINDOW_STEP_MINUTES
        ));
    }
    Ok(())
}

/// Validate a calm-down duration
pub fn validate_calm_down(minutes: i32) -> Result<(), String> {
    if minutes < 0 {
        return Err("Calm-down time cannot be negative".to_string());
    }
    if minutes > MAX_CALM_DOWN_MINUTES {
        return Err(format!(
            "Calm-down time must be at most {} minutes",
            MAX_CALM_DOWN_MINUTES
        ));
    }
    Ok(())
}

/// Validate a segment index (1..=5)
pub fn validate_segment_index(index: u8) -> Result<(), String> {
    if (1..=5).contains(&index) {
        Ok(())
    } else {
        Err(format!("No segment with index {}", index))
    }
}

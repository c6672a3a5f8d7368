//! Babynap Shared Library
//!
//! This crate contains the two cores shared by the native client and the
//! WASM module: the nap schedule calculator and the offline-cache
//! interception policy, plus the wire types they exchange.

pub mod errors;
pub mod models;
pub mod offline;
pub mod schedule;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Baby, BabySummary, DayRecord, Nap, SaveNapRequest};
pub use schedule::{
    compute_totals, format_duration, reconcile_day, DayTotals, NapEstimate, NapSegment,
    SavingStatus, SegmentSlot, DEFAULT_CALM_DOWN_MINUTES, SEGMENTS_PER_DAY, SEGMENT_SLOTS,
};

//! Wire types for the nap-planning API
//!
//! These structs mirror the JSON shapes exchanged with the day API:
//! `GET /api/babies`, `GET /api/baby/{id}/day/{date}` and
//! `POST /api/baby/{id}/day/{date}/nap/{index}`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Serde adapter for wall-clock `"HH:MM"` fields
///
/// The day API and the `<input type="time">` controls exchange times as
/// `"HH:MM"`. Seconds are accepted on input for tolerance but never
/// emitted.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub(crate) fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    }

    pub(crate) fn format(time: &NaiveTime) -> String {
        time.format(FORMAT).to_string()
    }
}

/// `clock_time` for optional fields
pub mod clock_time_opt {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => super::clock_time::serialize(t, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(s) => super::clock_time::parse(&s)
                .map(Some)
                .map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

/// A baby known to the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Baby {
    pub id: i64,
    pub name: String,
}

/// Baby summary embedded in a day record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BabySummary {
    pub name: String,
}

/// One stored nap within a day record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Nap {
    #[serde(with = "clock_time")]
    pub wake_up_time: chrono::NaiveTime,
    pub awake_window: i32,
    pub calm_down_time: i32,
}

/// One calendar day for one baby
///
/// `naps` is keyed by segment index; indices the server has no data for
/// are absent, not zero-filled. `cached` is written by the cache layer
/// only, never by the server, and marks the record as a stale offline
/// copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayRecord {
    pub baby: BabySummary,
    pub day: NaiveDate,
    pub naps: BTreeMap<u8, Nap>,
    #[serde(default)]
    pub cached: bool,
}

impl DayRecord {
    /// Look up the stored nap for a segment index, if any
    pub fn nap(&self, index: u8) -> Option<&Nap> {
        self.naps.get(&index)
    }
}

/// Body of `POST /api/baby/{id}/day/{date}/nap/{index}`
///
/// Range bounds match the form controls; the 5-minute step on the awake
/// window is enforced by [`crate::validation::validate_awake_window`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct SaveNapRequest {
    #[serde(with = "clock_time")]
    pub wake_up_time: chrono::NaiveTime,
    #[validate(range(min = 30, max = 180))]
    pub awake_window: i32,
    #[validate(range(min = 0, max = 60))]
    pub calm_down_time: i32,
}

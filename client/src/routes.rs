//! Route table shared by the API client and the shell
//!
//! One place for every path the app knows: the client-routed views and
//! the API endpoints they call. Dates travel as ISO `YYYY-MM-DD`.

use chrono::NaiveDate;

/// A client-routed view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// The baby list
    Home,
    /// One baby's day view
    BabyDay { baby_id: i64, day: NaiveDate },
}

/// Parse a location path into a page, if it is one of ours
pub fn parse_path(path: &str) -> Option<Page> {
    if path == "/" {
        return Some(Page::Home);
    }
    let pattern = regex_lite::Regex::new(r"^/baby/(\d+)/day/(\d{4}-\d{2}-\d{2})$").unwrap();
    let captures = pattern.captures(path)?;
    let baby_id = captures[1].parse().ok()?;
    let day = captures[2].parse().ok()?;
    Some(Page::BabyDay { baby_id, day })
}

/// Client-side path of a baby's day view
pub fn day_view_path(baby_id: i64, day: NaiveDate) -> String {
    format!("/baby/{}/day/{}", baby_id, day)
}

/// `GET` path for the babies list
pub fn api_babies_path() -> &'static str {
    "/api/babies"
}

/// `GET` path for one baby's day record
pub fn api_day_path(baby_id: i64, day: NaiveDate) -> String {
    format!("/api/baby/{}/day/{}", baby_id, day)
}

/// `POST` path for one segment of a day
pub fn api_nap_path(baby_id: i64, day: NaiveDate, index: u8) -> String {
    format!("/api/baby/{}/day/{}/nap/{}", baby_id, day, index)
}

/// The day before, for the back navigation link
pub fn previous_day(day: NaiveDate) -> Option<NaiveDate> {
    day.pred_opt()
}

/// The day after, for the forward navigation link
pub fn next_day(day: NaiveDate) -> Option<NaiveDate> {
    day.succ_opt()
}

//! Time windows over event timestamps

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Half-open time range `[start, end)` in seconds since the epoch.
///
/// # Example
///
/// ```
/// use keystroke_stats::utils::TimeWindow;
///
/// let window = TimeWindow::new(10.0, 20.0);
/// assert!(window.contains(10.0));
/// assert!(window.contains(19.999));
/// assert!(!window.contains(20.0));
///
/// let open = TimeWindow::since(10.0);
/// assert!(open.contains(1e12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window with no upper bound
    pub fn since(start: f64) -> Self {
        Self::new(start, f64::INFINITY)
    }

    /// Every representable timestamp
    pub fn all() -> Self {
        Self::since(0.0)
    }

    pub fn contains(&self, timestamp: f64) -> bool {
        self.start <= timestamp && timestamp < self.end
    }

    /// Local midnight to the following local midnight for a calendar date.
    ///
    /// Returns `None` if local midnight does not exist on that date.
    pub fn for_date(date: NaiveDate) -> Option<Self> {
        let next = date.checked_add_days(Days::new(1))?;
        let start = local_midnight(date)?;
        let end = local_midnight(next)?;
        Some(Self::new(start, end))
    }

    /// Day window containing the given instant (local time)
    pub fn day_containing(instant: f64) -> Option<Self> {
        let secs = instant.floor();
        let nanos = ((instant - secs) * 1e9) as u32;
        let local: DateTime<Local> = Local.timestamp_opt(secs as i64, nanos).single()?;
        Self::for_date(local.date_naive())
    }

    /// Day window containing the current instant
    pub fn today() -> Option<Self> {
        Self::for_date(Local::now().date_naive())
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::all()
    }
}

fn local_midnight(date: NaiveDate) -> Option<f64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    let local = Local.from_local_datetime(&midnight).earliest()?;
    Some(local.timestamp() as f64)
}

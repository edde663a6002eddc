//! Time windows and timestamp formatting.
//!
//! Notes carry epoch-millisecond timestamps; everything here works on `i64`
//! milliseconds and takes "now" as an argument so callers control the clock.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::defaults::{DAY_MS, HOUR_MS, MINUTE_MS, MONTH_MS, WEEK_MS};
use crate::error::Error;

// =============================================================================
// NAMED TIME RANGES
// =============================================================================

/// Creation-time window used by list and search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "90days")]
    NinetyDays,
}

impl TimeRange {
    /// Window length in milliseconds.
    pub fn window_ms(&self) -> i64 {
        match self {
            Self::SevenDays => 7 * DAY_MS,
            Self::ThirtyDays => 30 * DAY_MS,
            Self::NinetyDays => 90 * DAY_MS,
        }
    }

    /// Whether a note created at `create_time` falls inside the window ending
    /// at `now`. The boundary is inclusive.
    pub fn contains(&self, create_time: i64, now: i64) -> bool {
        now - create_time <= self.window_ms()
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7days" => Ok(Self::SevenDays),
            "30days" => Ok(Self::ThirtyDays),
            "90days" => Ok(Self::NinetyDays),
            other => Err(Error::InvalidInput(format!("Unknown time range: {}", other))),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenDays => write!(f, "7days"),
            Self::ThirtyDays => write!(f, "30days"),
            Self::NinetyDays => write!(f, "90days"),
        }
    }
}

// =============================================================================
// FORMATTING
// =============================================================================

/// Epoch-ms timestamp of the most recent local midnight at or before `now_ms`.
pub fn local_day_start(now_ms: i64) -> i64 {
    let Some(now) = Local.timestamp_millis_opt(now_ms).single() else {
        return now_ms - now_ms.rem_euclid(DAY_MS);
    };
    let Some(midnight) = now.date_naive().and_hms_opt(0, 0, 0) else {
        return now_ms - now_ms.rem_euclid(DAY_MS);
    };
    match Local.from_local_datetime(&midnight).earliest() {
        Some(start) => start.timestamp_millis(),
        None => now_ms - now_ms.rem_euclid(DAY_MS),
    }
}

/// `YYYY/MM/DD HH:MM:SS` in local time.
pub fn format_time(ts_ms: i64) -> String {
    match Local.timestamp_millis_opt(ts_ms).single() {
        Some(dt) => dt.format("%Y/%m/%d %H:%M:%S").to_string(),
        None => ts_ms.to_string(),
    }
}

/// Relative display used by note lists: "刚刚", "5分钟前", … then a date.
pub fn format_time_ago(ts_ms: i64, now_ms: i64) -> String {
    let diff = now_ms - ts_ms;

    if diff < MINUTE_MS {
        "刚刚".to_string()
    } else if diff < HOUR_MS {
        format!("{}分钟前", diff / MINUTE_MS)
    } else if diff < DAY_MS {
        format!("{}小时前", diff / HOUR_MS)
    } else if diff < WEEK_MS {
        format!("{}天前", diff / DAY_MS)
    } else if diff < MONTH_MS {
        format!("{}周前", diff / WEEK_MS)
    } else {
        match Local.timestamp_millis_opt(ts_ms).single() {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => ts_ms.to_string(),
        }
    }
}

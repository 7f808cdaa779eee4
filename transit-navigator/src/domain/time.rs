//! Upstream timestamps and departure countdowns.
//!
//! The transit API reports times as local ISO 8601 datetimes without an
//! offset (e.g. `2024-05-01T10:15:00`). Some deployments append an offset;
//! those are reduced to their local wall-clock time so both forms compare
//! against the same local "now".

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an upstream timestamp, returning `None` for anything unrecognised.
///
/// # Examples
///
/// ```
/// use transit_navigator::domain::parse_upstream_time;
///
/// assert!(parse_upstream_time("2024-05-01T10:15:00").is_some());
/// assert!(parse_upstream_time("2024-05-01T10:15:00-05:00").is_some());
/// assert!(parse_upstream_time("soon").is_none());
/// ```
pub fn parse_upstream_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in LOCAL_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.naive_local())
}

/// Format a time the way upstream expects it in query parameters.
pub fn format_upstream_time(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Time remaining until a departure, in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "minutes", rename_all = "snake_case")]
pub enum Countdown {
    Departed,
    Now,
    Minutes(i64),
}

impl Countdown {
    /// Countdown from `now` to `at`, rounded half up to the nearest minute.
    pub fn until(at: NaiveDateTime, now: NaiveDateTime) -> Self {
        let millis = (at - now).num_milliseconds() as f64;
        let minutes = (millis / 60_000.0 + 0.5).floor() as i64;

        match minutes {
            m if m < 0 => Countdown::Departed,
            0 => Countdown::Now,
            m => Countdown::Minutes(m),
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Departed => f.write_str("Departed"),
            Countdown::Now => f.write_str("Now"),
            Countdown::Minutes(1) => f.write_str("1 min"),
            Countdown::Minutes(m) => write!(f, "{m} mins"),
        }
    }
}

//! Time window resolution for range-based queries.
//!
//! A request names a symbolic range (`"30d"`, `"7d"`, `"24h"`) and optionally
//! an anchor. With an anchor the window runs forward from it; without one it
//! runs backward from the moment of resolution. Unrecognized range tokens fall
//! back to 24 hours rather than failing.

use crate::error::ApiError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Naive formats accepted for anchors without an explicit offset. Read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Symbolic range accepted by the analytics routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeToken {
    /// Thirty days.
    ThirtyDays,
    /// Seven days.
    SevenDays,
    /// Twenty-four hours (also the fallback).
    #[default]
    TwentyFourHours,
}

impl RangeToken {
    /// Maps a token to a range. Unknown or absent tokens mean 24 hours.
    #[must_use]
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("30d") => Self::ThirtyDays,
            Some("7d") => Self::SevenDays,
            _ => Self::TwentyFourHours,
        }
    }

    /// Length of the range.
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::ThirtyDays => Duration::days(30),
            Self::SevenDays => Duration::days(7),
            Self::TwentyFourHours => Duration::hours(24),
        }
    }
}

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window, rejecting empty or inverted intervals.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ApiError> {
        if start >= end {
            return Err(ApiError::InvalidParameter(
                "start time must be before end time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Inclusive start.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Window length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Resolves a window against the current time.
///
/// # Errors
/// Returns `InvalidParameter` if the anchor is not a readable timestamp.
pub fn resolve(range: Option<&Value>, anchor: Option<&Value>) -> Result<TimeWindow, ApiError> {
    resolve_at(range, anchor, Utc::now())
}

/// Resolves a window against an explicit `now`.
///
/// # Errors
/// Returns `InvalidParameter` if the anchor is not a readable timestamp or
/// the window would run past the representable range.
pub fn resolve_at(
    range: Option<&Value>,
    anchor: Option<&Value>,
    now: DateTime<Utc>,
) -> Result<TimeWindow, ApiError> {
    let duration = RangeToken::from_token(range.and_then(Value::as_str)).duration();

    match anchor {
        Some(value) => {
            let start = parse_timestamp(value).ok_or_else(invalid_start_time)?;
            let end = start
                .checked_add_signed(duration)
                .ok_or_else(invalid_start_time)?;
            TimeWindow::new(start, end)
        }
        None => {
            let start = now.checked_sub_signed(duration).ok_or_else(|| {
                ApiError::InvalidParameter("window start is out of range".to_string())
            })?;
            TimeWindow::new(start, now)
        }
    }
}

/// Builds a window from explicit start and end values.
///
/// # Errors
/// Returns `InvalidParameter` if either value is unreadable or the interval is empty.
pub fn explicit(start: &Value, end: &Value) -> Result<TimeWindow, ApiError> {
    let start = parse_timestamp(start).ok_or_else(invalid_start_time)?;
    let end = parse_timestamp(end)
        .ok_or_else(|| ApiError::InvalidParameter("invalid end time".to_string()))?;
    TimeWindow::new(start, end)
}

fn invalid_start_time() -> ApiError {
    ApiError::InvalidParameter("invalid start time".to_string())
}

/// Parses a request timestamp.
///
/// Strings may be RFC 3339, a naive date-time (read as UTC) or a bare date.
/// Integers are milliseconds since the Unix epoch.
#[must_use]
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_str(text.trim()),
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Renders a timestamp as `YYYY-MM-DDTHH:MM:SS+00:00`.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}

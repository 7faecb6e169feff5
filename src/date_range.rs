//! Resolution of symbolic time windows (`30d`, `90d`, `ytd`, `all`) and
//! explicit start/end dates into the date bounds sent to the order source.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// TimeRange
// ---------------------------------------------------------------------------

/// Symbolic reporting windows understood by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::All => "all",
            TimeRange::Last30Days => "30d",
            TimeRange::Last90Days => "90d",
            TimeRange::YearToDate => "ytd",
        }
    }

    /// Human label shown in range pickers.
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::All => "All Time",
            TimeRange::Last30Days => "Last 30 Days",
            TimeRange::Last90Days => "Last 90 Days",
            TimeRange::YearToDate => "Year to Date",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TimeRange::All),
            "30d" => Ok(TimeRange::Last30Days),
            "90d" => Ok(TimeRange::Last90Days),
            "ytd" => Ok(TimeRange::YearToDate),
            other => Err(format!("unknown time range '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// DateRangeRequest / DateBounds
// ---------------------------------------------------------------------------

/// Raw window request as it arrives from a caller (e.g. HTTP query string).
///
/// Values are kept as plain strings; unknown ranges are not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeRequest {
    #[serde(alias = "range")]
    pub time_range: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeRequest {
    pub fn range(time_range: impl Into<String>) -> Self {
        Self {
            time_range: Some(time_range.into()),
            ..Self::default()
        }
    }

    pub fn explicit(start_date: impl Into<String>, end_date: Option<String>) -> Self {
        Self {
            time_range: None,
            start_date: Some(start_date.into()),
            end_date,
        }
    }
}

/// Inclusive `YYYY-MM-DD` bounds; `None` means unbounded on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateBounds {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a `YYYY-MM-DD` date falls inside the bounds.
    ///
    /// Both sides compare lexically, which is exact for zero-padded ISO dates.
    pub fn contains(&self, date: &str) -> bool {
        let after_start = self.start.as_deref().map_or(true, |s| date >= s);
        let before_end = self.end.as_deref().map_or(true, |e| date <= e);
        after_start && before_end
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a window request against the current UTC clock.
pub fn resolve_range(request: &DateRangeRequest) -> DateBounds {
    resolve_range_at(request, Utc::now())
}

/// Resolve a window request relative to `now`.
///
/// An explicit `start_date` always wins and is returned verbatim together
/// with `end_date`. Otherwise a missing or `all` range, and any unrecognized
/// range, resolve to unbounded.
pub fn resolve_range_at(request: &DateRangeRequest, now: DateTime<Utc>) -> DateBounds {
    if let Some(start) = request.start_date.as_deref().filter(|s| !s.is_empty()) {
        return DateBounds {
            start: Some(start.to_string()),
            end: request.end_date.clone().filter(|e| !e.is_empty()),
        };
    }

    let range = match request.time_range.as_deref() {
        None | Some("") => return DateBounds::unbounded(),
        Some(raw) => match raw.parse::<TimeRange>() {
            Ok(range) => range,
            Err(_) => {
                tracing::debug!(range = raw, "unrecognized time range, using all time");
                return DateBounds::unbounded();
            }
        },
    };

    let today = format_date(now.date_naive());
    let start = match range {
        TimeRange::All => return DateBounds::unbounded(),
        TimeRange::Last30Days => format_date((now - Duration::days(30)).date_naive()),
        TimeRange::Last90Days => format_date((now - Duration::days(90)).date_naive()),
        TimeRange::YearToDate => format!("{}-01-01", now.year()),
    };

    DateBounds {
        start: Some(start),
        end: Some(today),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn explicit_start_wins_over_range() {
        let request = DateRangeRequest {
            time_range: Some("30d".into()),
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-02-01".into()),
        };
        let bounds = resolve_range_at(&request, fixed_now());
        assert_eq!(bounds.start.as_deref(), Some("2024-01-01"));
        assert_eq!(bounds.end.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn explicit_start_without_end_is_open_ended() {
        let bounds = resolve_range_at(&DateRangeRequest::explicit("2024-01-01", None), fixed_now());
        assert_eq!(bounds.start.as_deref(), Some("2024-01-01"));
        assert_eq!(bounds.end, None);
    }

    #[test]
    fn all_and_missing_are_unbounded() {
        assert!(resolve_range_at(&DateRangeRequest::range("all"), fixed_now()).is_unbounded());
        assert!(resolve_range_at(&DateRangeRequest::default(), fixed_now()).is_unbounded());
    }

    #[test]
    fn unknown_range_falls_back_to_unbounded() {
        assert!(resolve_range_at(&DateRangeRequest::range("bogus"), fixed_now()).is_unbounded());
    }

    #[test]
    fn end_date_alone_is_ignored() {
        let request = DateRangeRequest {
            end_date: Some("2024-02-01".into()),
            ..DateRangeRequest::default()
        };
        assert!(resolve_range_at(&request, fixed_now()).is_unbounded());
    }

    #[test]
    fn symbolic_ranges_resolve_relative_to_now() {
        let now = fixed_now();
        let d30 = resolve_range_at(&DateRangeRequest::range("30d"), now);
        assert_eq!(d30.start.as_deref(), Some("2024-02-14"));
        assert_eq!(d30.end.as_deref(), Some("2024-03-15"));

        let d90 = resolve_range_at(&DateRangeRequest::range("90d"), now);
        assert_eq!(d90.start.as_deref(), Some("2023-12-16"));

        let ytd = resolve_range_at(&DateRangeRequest::range("ytd"), now);
        assert_eq!(ytd.start.as_deref(), Some("2024-01-01"));
        assert_eq!(ytd.end.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn bounds_contain_is_inclusive() {
        let bounds = DateBounds {
            start: Some("2024-01-01".into()),
            end: Some("2024-01-31".into()),
        };
        assert!(bounds.contains("2024-01-01"));
        assert!(bounds.contains("2024-01-31"));
        assert!(!bounds.contains("2023-12-31"));
        assert!(!bounds.contains("2024-02-01"));
        assert!(DateBounds::unbounded().contains("1999-01-01"));
    }

    #[test]
    fn time_range_round_trips_through_strings() {
        for range in [
            TimeRange::All,
            TimeRange::Last30Days,
            TimeRange::Last90Days,
            TimeRange::YearToDate,
        ] {
            assert_eq!(range.as_str().parse::<TimeRange>(), Ok(range));
        }
        assert!("7d".parse::<TimeRange>().is_err());
    }
}

//! Open/closed status for an interval set at an instant.
//!
//! A status query is a pure function of the intervals, the instant, the
//! zone, and the thresholds. The engine trusts its input to be canonical
//! (see [`crate::model::Interval`]) and never re-validates it.
//!
//! # States
//!
//! - `Open` — inside an interval, more than `closing_soon_minutes` left
//!   (or open all day, with no countdown).
//! - `ClosingSoon` — inside an interval, at most `closing_soon_minutes` left.
//! - `OpeningSoon` — outside every interval, next opening at most
//!   `opening_soon_minutes` away.
//! - `Closed` — outside every interval, next opening further away or unknown.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::{next_day, Interval, IntervalSet, MINUTES_PER_DAY};
use crate::zone::{zoned_parts, ZonedParts};

pub const DEFAULT_CLOSING_SOON_MINUTES: u32 = 90;
pub const DEFAULT_OPENING_SOON_MINUTES: u32 = 60;

/// Lookahead windows for the "soon" states, supplied per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    #[serde(default = "default_closing_soon")]
    pub closing_soon_minutes: u32,
    #[serde(default = "default_opening_soon")]
    pub opening_soon_minutes: u32,
}

fn default_closing_soon() -> u32 {
    DEFAULT_CLOSING_SOON_MINUTES
}

fn default_opening_soon() -> u32 {
    DEFAULT_OPENING_SOON_MINUTES
}

impl Default for StatusThresholds {
    fn default() -> Self {
        StatusThresholds {
            closing_soon_minutes: DEFAULT_CLOSING_SOON_MINUTES,
            opening_soon_minutes: DEFAULT_OPENING_SOON_MINUTES,
        }
    }
}

/// The result of a status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusResult {
    /// `minutes_until_close` is `None` for all-day service.
    Open { minutes_until_close: Option<u32> },
    ClosingSoon { minutes_until_close: u32 },
    OpeningSoon { minutes_until_open: u32 },
    /// `minutes_until_open` is `None` when no opening is known today or
    /// tomorrow, including when there are no hours at all.
    Closed { minutes_until_open: Option<u32> },
}

impl StatusResult {
    /// Stable state name: `open`, `closing_soon`, `opening_soon`, `closed`.
    pub fn label(&self) -> &'static str {
        match self {
            StatusResult::Open { .. } => "open",
            StatusResult::ClosingSoon { .. } => "closing_soon",
            StatusResult::OpeningSoon { .. } => "opening_soon",
            StatusResult::Closed { .. } => "closed",
        }
    }

    /// Open or closing soon.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            StatusResult::Open { .. } | StatusResult::ClosingSoon { .. }
        )
    }

    /// One-line human-readable status, e.g. `"Closing soon · closes in 15 min"`.
    pub fn summary(&self) -> String {
        match *self {
            StatusResult::Open {
                minutes_until_close: None,
            } => "Open".to_string(),
            StatusResult::Open {
                minutes_until_close: Some(m),
            } => format!("Open · closes in {}", format_countdown(m)),
            StatusResult::ClosingSoon {
                minutes_until_close: m,
            } => format!("Closing soon · closes in {}", format_countdown(m)),
            StatusResult::OpeningSoon {
                minutes_until_open: m,
            } => format!("Opening soon · opens in {}", format_countdown(m)),
            StatusResult::Closed {
                minutes_until_open: Some(m),
            } => format!("Closed · opens in {}", format_countdown(m)),
            StatusResult::Closed {
                minutes_until_open: None,
            } => "Closed".to_string(),
        }
    }
}

/// Compute the status of `intervals` at `instant`, read in zone `tz`.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Utc};
/// use hours_engine::lines::parse_lines;
/// use hours_engine::model::IntervalSet;
/// use hours_engine::status::{compute_status, StatusResult, StatusThresholds};
///
/// let hours = IntervalSet::new(parse_lines(["Mon-Fri 6:00am - 10:00pm"]));
/// // Wednesday 21:45 in New York.
/// let at: DateTime<Utc> = "2026-02-18T21:45:00-05:00".parse().unwrap();
/// let status = compute_status(
///     &hours,
///     at,
///     &chrono_tz::America::New_York,
///     &StatusThresholds::default(),
/// );
/// assert_eq!(status, StatusResult::ClosingSoon { minutes_until_close: 15 });
/// ```
pub fn compute_status(
    intervals: &IntervalSet,
    instant: DateTime<Utc>,
    tz: &Tz,
    thresholds: &StatusThresholds,
) -> StatusResult {
    if intervals.is_empty() {
        return StatusResult::Closed {
            minutes_until_open: None,
        };
    }
    compute_status_at_parts(intervals, zoned_parts(instant, tz), thresholds)
}

/// Same state machine as [`compute_status`], on an already-decomposed local
/// weekday and minute.
///
/// `parts.minutes` past the end of the day is clamped to `24:00`.
pub fn compute_status_at_parts(
    intervals: &IntervalSet,
    parts: ZonedParts,
    thresholds: &StatusThresholds,
) -> StatusResult {
    let parts = ZonedParts {
        day: parts.day,
        minutes: parts.minutes.min(MINUTES_PER_DAY),
    };
    let ZonedParts { day, minutes } = parts;

    // First match wins; only malformed source data can produce overlaps.
    let current = intervals.on_day(day).find(|i| i.contains(minutes));

    match current {
        Some(interval) => open_status(intervals, interval, minutes, thresholds),
        None => closed_status(intervals, parts, thresholds),
    }
}

fn open_status(
    intervals: &IntervalSet,
    current: &Interval,
    minutes: u32,
    thresholds: &StatusThresholds,
) -> StatusResult {
    if current.is_all_day() {
        return StatusResult::Open {
            minutes_until_close: None,
        };
    }

    let mut until_close = current.close().minutes() - minutes;
    if current.close().is_end_of_day() {
        // An overnight range was split at midnight; follow it into tomorrow.
        let continuation = intervals
            .on_day(next_day(current.day()))
            .find(|i| i.open().minutes() == 0);
        if let Some(next) = continuation {
            until_close = (MINUTES_PER_DAY - minutes) + next.close().minutes();
        }
    }

    if until_close <= thresholds.closing_soon_minutes {
        StatusResult::ClosingSoon {
            minutes_until_close: until_close,
        }
    } else {
        StatusResult::Open {
            minutes_until_close: Some(until_close),
        }
    }
}

fn closed_status(
    intervals: &IntervalSet,
    parts: ZonedParts,
    thresholds: &StatusThresholds,
) -> StatusResult {
    let ZonedParts { day, minutes } = parts;

    let later_today = intervals
        .on_day(day)
        .map(|i| i.open().minutes())
        .filter(|&open| open > minutes)
        .min()
        .map(|open| open - minutes);

    let until_open = later_today.or_else(|| {
        intervals
            .on_day(next_day(day))
            .map(|i| i.open().minutes())
            .min()
            .map(|open| (MINUTES_PER_DAY - minutes) + open)
    });

    match until_open {
        Some(m) if m <= thresholds.opening_soon_minutes => StatusResult::OpeningSoon {
            minutes_until_open: m,
        },
        other => StatusResult::Closed {
            minutes_until_open: other,
        },
    }
}

/// Format a countdown in minutes: `"45 min"`, `"2 hr"`, `"1 hr 15 min"`.
pub fn format_countdown(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} hr"),
        (h, m) => format!("{h} hr {m} min"),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

//! Timezone handling: wall-clock decomposition, zone label normalization,
//! and query-instant resolution.
//!
//! All functions take explicit inputs. Nothing here reads the system clock;
//! callers pass the "now" anchor when one is needed.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{HoursError, Result};
use crate::model::{day_index, DayIndex};

/// Zone assumed when a facility carries no usable label.
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

/// Labels seen in page data that all mean US Eastern time.
const EASTERN_ALIASES: &[&str] = &[
    "eastern standard time",
    "eastern daylight time",
    "eastern time",
    "est",
    "edt",
    "et",
    "us/eastern",
];

/// Local weekday and minutes since midnight of an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedParts {
    pub day: DayIndex,
    /// 0..=1439.
    pub minutes: u32,
}

/// Decompose `instant` into local weekday and minute-of-day in `tz`.
///
/// DST is handled by the zone's own rules: the result is whatever a wall
/// clock in that zone shows at that instant.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hours_engine::zone::zoned_parts;
///
/// // Wednesday Feb 18 2026, 14:30 UTC is 09:30 EST.
/// let instant = Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap();
/// let parts = zoned_parts(instant, &chrono_tz::America::New_York);
/// assert_eq!(parts.day, 3);
/// assert_eq!(parts.minutes, 9 * 60 + 30);
/// ```
pub fn zoned_parts(instant: DateTime<Utc>, tz: &Tz) -> ZonedParts {
    let local = instant.with_timezone(tz);
    ZonedParts {
        day: day_index(local.weekday()),
        minutes: local.hour() * 60 + local.minute(),
    }
}

/// Map a raw zone label to a zone identifier.
///
/// Known US Eastern aliases (case-insensitive) become `America/New_York`,
/// empty or absent labels default to `America/New_York`, and anything else is
/// returned trimmed but otherwise unchanged.
pub fn normalize_time_zone(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_TIME_ZONE.to_string();
    }
    let lowered = trimmed.to_lowercase();
    if EASTERN_ALIASES.contains(&lowered.as_str()) {
        return DEFAULT_TIME_ZONE.to_string();
    }
    trimmed.to_string()
}

/// Normalize a label and resolve it to an IANA zone.
///
/// # Errors
///
/// Returns [`HoursError::InvalidTimezone`] if the normalized label is not a
/// known IANA zone name.
pub fn resolve_time_zone(raw: Option<&str>) -> Result<Tz> {
    let name = normalize_time_zone(raw);
    name.parse::<Tz>()
        .map_err(|_| HoursError::InvalidTimezone(format!("'{name}'")))
}

/// Parse an RFC 3339 instant.
///
/// # Errors
///
/// Returns [`HoursError::InvalidDatetime`] if the string is not RFC 3339.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HoursError::InvalidDatetime(format!("'{s}': {e}")))
}

/// Resolve the instant a status query refers to.
///
/// An absent or unparseable value means "now"; a malformed query instant
/// never fails the query.
pub fn resolve_instant(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => now,
        Some(s) => parse_instant(s).unwrap_or_else(|err| {
            tracing::debug!(%err, "unparseable query instant, using now");
            now
        }),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

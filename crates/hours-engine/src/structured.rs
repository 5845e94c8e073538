//! Structured hours from page data → canonical intervals.
//!
//! Page data carries hours in two pre-structured shapes. Both are rendered
//! back into synthetic text lines and run through [`crate::lines`], so the
//! day grammar, time validation and overnight split live in one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::lines::parse_lines;
use crate::model::{Interval, IntervalSet};

/// A `{ "days": "Mon-Fri", "hours": "9am-5pm" }` entry. A missing or null
/// side reads as blank and the entry is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHoursEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub days: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hours: String,
}

/// A `{ "startTime": "9:00", "endTime": "17:00" }` pair. Either side may be
/// missing in the source data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Either structured shape, as found in page data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructuredHours {
    /// `[{ "days": ..., "hours": ... }, ...]`
    Entries(Vec<DayHoursEntry>),
    /// `{ "Monday": [{ "startTime": ..., "endTime": ... }], ... }`
    ByWeekday(
        #[serde(deserialize_with = "deserialize_weekday_map")] BTreeMap<String, Vec<TimeRange>>,
    ),
}

impl StructuredHours {
    /// The synthetic text lines this input stands for.
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            StructuredHours::Entries(entries) => entry_lines(entries),
            StructuredHours::ByWeekday(map) => weekday_range_lines(map),
        }
    }

    /// Parse into an interval set, keeping the synthetic lines as sources.
    pub fn to_interval_set(&self) -> IntervalSet {
        IntervalSet::from_lines(self.to_lines())
    }
}

/// Render `{days, hours}` entries as `"<days> <hours>"` lines.
///
/// Entries with a blank side are skipped.
pub fn entry_lines(entries: &[DayHoursEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| {
            let (days, hours) = (entry.days.trim(), entry.hours.trim());
            if days.is_empty() || hours.is_empty() {
                tracing::debug!(?entry, "skipping entry without both days and hours");
                return None;
            }
            Some(format!("{days} {hours}"))
        })
        .collect()
}

/// Render a weekday → ranges map as `"<day> <HH:MM> - <HH:MM>"` lines.
///
/// Ranges missing a start or end are skipped.
pub fn weekday_range_lines(map: &BTreeMap<String, Vec<TimeRange>>) -> Vec<String> {
    let mut lines = Vec::new();
    for (day, ranges) in map {
        for range in ranges {
            let start = range.start_time.as_deref().and_then(pad_time);
            let end = range.end_time.as_deref().and_then(pad_time);
            match (start, end) {
                (Some(start), Some(end)) => {
                    lines.push(format!("{} {start} - {end}", day.trim()))
                }
                _ => {
                    tracing::debug!(day = %day, ?range, "skipping range without both boundaries")
                }
            }
        }
    }
    lines
}

/// Parse `{days, hours}` entries into intervals.
pub fn parse_entries(entries: &[DayHoursEntry]) -> Vec<Interval> {
    parse_lines(entry_lines(entries))
}

/// Parse a weekday → ranges map into intervals.
pub fn parse_weekday_ranges(map: &BTreeMap<String, Vec<TimeRange>>) -> Vec<Interval> {
    parse_lines(weekday_range_lines(map))
}

/// Zero-pad a colon-delimited time to `HH:MM`: `"9:0"` → `"09:00"`.
///
/// Seconds, if present, are dropped. Returns `None` for blank input.
fn pad_time(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let padded: Vec<String> = raw
        .split(':')
        .take(2)
        .map(|part| format!("{:0>2}", part.trim()))
        .collect();
    Some(padded.join(":"))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A weekday mapped to `null` counts as a day with no ranges.
fn deserialize_weekday_map<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<TimeRange>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<Vec<TimeRange>>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(day, ranges)| (day, ranges.unwrap_or_default()))
        .collect())
}

// ── Tests ───────────────────────────────────────────────────────────────────

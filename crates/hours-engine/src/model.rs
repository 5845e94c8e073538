//! Canonical opening-hours model.
//!
//! Every ingestion path ends in the types defined here: [`ClockTime`] values
//! on a single weekday form an [`Interval`], intervals form an
//! [`IntervalSet`], and a facility's general hours plus its per-service hours
//! form an [`HoursBundle`]. These are the shapes that get stored and
//! exchanged, so they serialize to plain JSON (`{"day": 1, "open": "09:00",
//! "close": "17:00"}`) and deserialize with the invariants re-checked.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{HoursError, Result};

/// Weekday index, Sunday = 0 through Saturday = 6.
pub type DayIndex = u8;

/// Minutes in a day; also the minute value of the `24:00` sentinel.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

const DAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Short English name of a day index ("Sun" … "Sat").
///
/// Out-of-range indices wrap modulo 7.
pub fn day_name(day: DayIndex) -> &'static str {
    DAY_ABBREVIATIONS[(day % 7) as usize]
}

/// The day after `day`, wrapping Saturday to Sunday.
pub fn next_day(day: DayIndex) -> DayIndex {
    (day + 1) % 7
}

/// Convert a chrono weekday into a Sunday-based day index.
pub fn day_index(weekday: Weekday) -> DayIndex {
    weekday.num_days_from_sunday() as DayIndex
}

// ── ClockTime ───────────────────────────────────────────────────────────────

/// A canonical 24-hour time of day, `00:00` through `24:00`.
///
/// `24:00` is the end-of-day sentinel. It is valid as a closing time only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// `00:00`.
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    /// `24:00`, midnight at the end of the day.
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY as u16);

    /// Build from an hour and minute. `24` is only accepted with minute `0`.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute > 59 || hour > 24 || (hour == 24 && minute != 0) {
            return None;
        }
        Some(ClockTime((hour * 60 + minute) as u16))
    }

    /// Build from minutes since midnight (0..=1440).
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(ClockTime(minutes as u16))
    }

    pub fn minutes(self) -> u32 {
        self.0 as u32
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    pub fn is_end_of_day(self) -> bool {
        self == Self::END_OF_DAY
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = HoursError;

    /// Parse the canonical `HH:MM` form only. Loose human input goes through
    /// [`crate::clock::parse_clock_time`] instead.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || HoursError::InvalidClockTime(format!("'{s}'"));
        let (hh, mm) = s.split_once(':').ok_or_else(invalid)?;
        if hh.len() != 2 || mm.len() != 2 {
            return Err(invalid());
        }
        if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u32 = hh.parse().map_err(|_| invalid())?;
        let minute: u32 = mm.parse().map_err(|_| invalid())?;
        ClockTime::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = HoursError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

// ── Interval ────────────────────────────────────────────────────────────────

/// An open/close range on a single weekday with `open < close`.
///
/// Ranges that cross midnight never appear here; they are split into two
/// intervals on consecutive days when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRecord")]
pub struct Interval {
    day: DayIndex,
    open: ClockTime,
    close: ClockTime,
}

#[derive(Deserialize)]
struct IntervalRecord {
    day: DayIndex,
    open: ClockTime,
    close: ClockTime,
}

impl TryFrom<IntervalRecord> for Interval {
    type Error = HoursError;

    fn try_from(record: IntervalRecord) -> Result<Self> {
        Interval::new(record.day, record.open, record.close)
    }
}

impl Interval {
    /// Construct a canonical interval.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::InvalidDay`] if `day > 6`, or
    /// [`HoursError::InvalidInterval`] unless `open < close`.
    pub fn new(day: DayIndex, open: ClockTime, close: ClockTime) -> Result<Self> {
        if day > 6 {
            return Err(HoursError::InvalidDay(day));
        }
        if open >= close {
            return Err(HoursError::InvalidInterval(format!(
                "{} {open} - {close}: open must be before close",
                day_name(day)
            )));
        }
        Ok(Interval { day, open, close })
    }

    /// The whole of `day`, `00:00` to `24:00`.
    pub fn all_day(day: DayIndex) -> Result<Self> {
        Interval::new(day, ClockTime::MIDNIGHT, ClockTime::END_OF_DAY)
    }

    pub fn day(&self) -> DayIndex {
        self.day
    }

    pub fn open(&self) -> ClockTime {
        self.open
    }

    pub fn close(&self) -> ClockTime {
        self.close
    }

    /// Half-open containment: `open <= minutes < close`.
    pub fn contains(&self, minutes: u32) -> bool {
        self.open.minutes() <= minutes && minutes < self.close.minutes()
    }

    pub fn is_all_day(&self) -> bool {
        self.open == ClockTime::MIDNIGHT && self.close.is_end_of_day()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.close.minutes() - self.open.minutes()
    }
}

impl fmt::Display for Interval {
    /// Canonical text form, e.g. `Mon 09:00 - 17:00`. Parsing this text with
    /// [`crate::lines::parse_line`] yields the same interval.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", day_name(self.day), self.open, self.close)
    }
}

// ── IntervalSet ─────────────────────────────────────────────────────────────

/// Ordered canonical intervals, optionally with the raw lines they came from.
///
/// Order carries no meaning beyond making first-match lookups deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSet {
    pub intervals: Vec<Interval>,
    /// Raw source text, kept for diagnostics only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_lines: Vec<String>,
}

impl IntervalSet {
    pub fn new(intervals: Vec<Interval>) -> Self {
        IntervalSet {
            intervals,
            source_lines: Vec::new(),
        }
    }

    pub fn with_source_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_lines = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Intervals on `day`, in stored order.
    pub fn on_day(&self, day: DayIndex) -> impl Iterator<Item = &Interval> + '_ {
        self.intervals.iter().filter(move |i| i.day == day)
    }

    /// A copy ordered by day, then open, then close.
    pub fn sorted(&self) -> IntervalSet {
        let mut intervals = self.intervals.clone();
        intervals.sort_by_key(|i| (i.day, i.open, i.close));
        IntervalSet {
            intervals,
            source_lines: self.source_lines.clone(),
        }
    }

    /// One canonical text line per interval, in stored order.
    pub fn render_lines(&self) -> Vec<String> {
        self.intervals.iter().map(Interval::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        IntervalSet::new(iter.into_iter().collect())
    }
}

// ── HoursBundle ─────────────────────────────────────────────────────────────

/// Normalize a service or amenity label into a lookup key.
///
/// Lower-cases, collapses every run of non-alphanumeric characters into a
/// single `_`, and trims `_` from both ends: `"Car Wash (Touchless)"` becomes
/// `car_wash_touchless`.
pub fn service_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    let mut pending_separator = false;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    key
}

/// A facility's general hours plus per-service hours keyed by
/// [`service_key`].
///
/// Built once during ingestion and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBundle {
    primary: IntervalSet,
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_services"
    )]
    services: BTreeMap<String, IntervalSet>,
}

/// The interval set chosen for a query, and the service key it came from
/// (`None` for the primary hours).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedHours<'a> {
    pub service: Option<&'a str>,
    pub intervals: &'a IntervalSet,
}

impl HoursBundle {
    pub fn new(primary: IntervalSet) -> Self {
        HoursBundle {
            primary,
            services: BTreeMap::new(),
        }
    }

    /// Attach hours for a service. Labels that normalize to an empty key are
    /// ignored; a repeated key replaces the earlier set.
    pub fn with_service(mut self, label: &str, hours: IntervalSet) -> Self {
        let key = service_key(label);
        if key.is_empty() {
            tracing::debug!(label, "ignoring service with empty key");
            return self;
        }
        self.services.insert(key, hours);
        self
    }

    pub fn primary(&self) -> &IntervalSet {
        &self.primary
    }

    /// Hours for a service label, matched by normalized key.
    pub fn service(&self, label: &str) -> Option<&IntervalSet> {
        self.services.get(&service_key(label))
    }

    pub fn services(&self) -> impl Iterator<Item = (&str, &IntervalSet)> + '_ {
        self.services.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pick the interval set for an optional service label.
    ///
    /// Falls back to the primary hours when the label is absent, unknown, or
    /// maps to an empty set.
    pub fn select(&self, label: Option<&str>) -> SelectedHours<'_> {
        let requested = label.map(service_key).filter(|key| !key.is_empty());
        if let Some(key) = requested {
            match self.services.get_key_value(&key) {
                Some((stored, set)) if !set.is_empty() => {
                    return SelectedHours {
                        service: Some(stored.as_str()),
                        intervals: set,
                    };
                }
                Some(_) => tracing::debug!(service = %key, "service has no hours, using primary"),
                None => tracing::debug!(service = %key, "unknown service, using primary"),
            }
        }
        SelectedHours {
            service: None,
            intervals: &self.primary,
        }
    }
}

fn deserialize_services<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, IntervalSet>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, IntervalSet>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(label, set)| (service_key(&label), set))
        .filter(|(key, _)| !key.is_empty())
        .collect())
}

// ── Tests ───────────────────────────────────────────────────────────────────

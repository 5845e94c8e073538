//! Free-text hours lines → canonical intervals.
//!
//! Scraped hours text is inconsistent by nature, so parsing here is
//! line-local and forgiving: a line that cannot be understood is dropped and
//! the rest still count. Ranges that run past midnight are split so every
//! emitted [`Interval`] satisfies `open < close` on its own day.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::clock::parse_clock_time;
use crate::days::{normalize_dashes, parse_day_spec};
use crate::model::{next_day, ClockTime, DayIndex, Interval, IntervalSet};

/// `<time> - <time>` (or `to`), each side with an optional am/pm suffix.
/// The first time may follow a letter directly (`"Mon9am-5pm"`) but not
/// another digit.
static TIME_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    let time = r"\d{1,2}(?::\d{2})?(?:\s*[ap]\.?\s*m\.?)?";
    Regex::new(&format!(r"(?i)(?:^|\D)({time})\s*(?:-|\bto\b)\s*({time})"))
        .expect("time range pattern is valid")
});

const ALL_DAY_MARKERS: &[&str] = &["24 hours", "open 24"];

/// Parse a sequence of hours lines and concatenate the resulting intervals.
///
/// Intervals appear in line order; nothing is sorted or de-duplicated.
///
/// # Examples
///
/// ```
/// use hours_engine::lines::parse_lines;
///
/// let intervals = parse_lines(["Mon-Fri 6:00am - 10:00pm", "Sun closed"]);
/// assert_eq!(intervals.len(), 5);
/// assert_eq!(intervals[0].to_string(), "Mon 06:00 - 22:00");
/// ```
pub fn parse_lines<I, S>(lines: I) -> Vec<Interval>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .flat_map(|line| parse_line(line.as_ref()))
        .collect()
}

/// Parse one hours line.
///
/// Returns an empty vector when the line asserts closure ("closed"
/// anywhere, case-insensitive), has no recognizable time range, has an
/// unparseable time, or names no weekday before its first digit.
pub fn parse_line(line: &str) -> Vec<Interval> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    if line.to_lowercase().contains("closed") {
        tracing::trace!(line, "dropping closed line");
        return Vec::new();
    }

    let normalized = normalize_dashes(line);
    let Some((open, close)) = find_time_range(&normalized) else {
        tracing::debug!(line, "no parseable time range");
        return Vec::new();
    };

    let days = parse_day_spec(day_text(&normalized));
    if days.is_empty() {
        tracing::debug!(line, "no weekday before the time range");
        return Vec::new();
    }

    days.into_iter()
        .flat_map(|day| split_overnight(day, open, close))
        .collect()
}

/// Turn one naive `open`–`close` range on `day` into canonical intervals.
///
/// - `open == close`: nothing (zero-length).
/// - `open < close`: one interval.
/// - `open > close`: the range crosses midnight and becomes
///   `{day, open, 24:00}` plus `{day + 1, 00:00, close}`.
///
/// Pieces that would be empty after the split (a `24:00` start, a `00:00`
/// close) are dropped.
///
/// # Examples
///
/// ```
/// use hours_engine::lines::split_overnight;
/// use hours_engine::model::ClockTime;
///
/// let open = "22:00".parse::<ClockTime>().unwrap();
/// let close = "02:00".parse::<ClockTime>().unwrap();
/// let parts = split_overnight(6, open, close);
/// assert_eq!(parts[0].to_string(), "Sat 22:00 - 24:00");
/// assert_eq!(parts[1].to_string(), "Sun 00:00 - 02:00");
/// ```
pub fn split_overnight(day: DayIndex, open: ClockTime, close: ClockTime) -> Vec<Interval> {
    match open.cmp(&close) {
        Ordering::Equal => Vec::new(),
        Ordering::Less => Interval::new(day, open, close).into_iter().collect(),
        Ordering::Greater => [
            Interval::new(day, open, ClockTime::END_OF_DAY),
            Interval::new(next_day(day), ClockTime::MIDNIGHT, close),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }
}

impl IntervalSet {
    /// Parse hours lines into a set, keeping the non-empty raw lines as
    /// diagnostics.
    pub fn from_lines<I, S>(lines: I) -> IntervalSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sources: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        IntervalSet::new(parse_lines(&sources)).with_source_lines(sources)
    }
}

/// The open/close pair of a dash-normalized line, if it has one.
fn find_time_range(normalized: &str) -> Option<(ClockTime, ClockTime)> {
    let lowered = normalized.to_lowercase();
    if ALL_DAY_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return Some((ClockTime::MIDNIGHT, ClockTime::END_OF_DAY));
    }

    let caps = TIME_RANGE_RE.captures(normalized)?;
    let open = parse_clock_time(caps.get(1)?.as_str());
    let close = parse_clock_time(caps.get(2)?.as_str());
    match (open, close) {
        (Some(open), Some(close)) => Some((open, close)),
        _ => {
            tracing::debug!(range = &caps[0], "unparseable time in range");
            None
        }
    }
}

/// Everything before the first digit: the part of a line naming its days.
fn day_text(normalized: &str) -> &str {
    let end = normalized
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(normalized.len());
    &normalized[..end]
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn rendered(intervals: &[Interval]) -> Vec<String> {
        intervals.iter().map(Interval::to_string).collect()
    }

    // ── split_overnight tests ───────────────────────────────────────────

    #[test]
    fn test_split_same_day() {
        assert_eq!(
            rendered(&split_overnight(2, t("09:00"), t("17:00"))),
            vec!["Tue 09:00 - 17:00"]
        );
    }

    #[test]
    fn test_split_crosses_midnight() {
        assert_eq!(
            rendered(&split_overnight(2, t("22:00"), t("02:00"))),
            vec!["Tue 22:00 - 24:00", "Wed 00:00 - 02:00"]
        );
    }

    #[test]
    fn test_split_saturday_wraps_to_sunday() {
        assert_eq!(
            rendered(&split_overnight(6, t("20:00"), t("03:30"))),
            vec!["Sat 20:00 - 24:00", "Sun 00:00 - 03:30"]
        );
    }

    #[test]
    fn test_split_zero_length_dropped() {
        assert!(split_overnight(1, t("09:00"), t("09:00")).is_empty());
    }

    #[test]
    fn test_split_close_at_midnight_keeps_first_half_only() {
        assert_eq!(
            rendered(&split_overnight(5, t("18:00"), t("00:00"))),
            vec!["Fri 18:00 - 24:00"]
        );
    }

    // ── parse_line tests ────────────────────────────────────────────────

    #[test]
    fn test_line_weekday_range_with_meridiem() {
        let intervals = parse_line("Mon-Fri 6:00am - 10:00pm");
        assert_eq!(intervals.len(), 5);
        assert_eq!(intervals[0].day(), 1);
        assert_eq!(intervals[4].day(), 5);
        assert!(intervals
            .iter()
            .all(|i| i.open() == t("06:00") && i.close() == t("22:00")));
    }

    #[test]
    fn test_line_with_en_dash() {
        assert_eq!(
            rendered(&parse_line("Sat\u{2013}Sun 8am \u{2013} 8pm")),
            vec!["Sat 08:00 - 20:00", "Sun 08:00 - 20:00"]
        );
    }

    #[test]
    fn test_line_compact_range_reads_24_hour_clock() {
        assert_eq!(
            rendered(&parse_line("Thu: 9-17")),
            vec!["Thu 09:00 - 17:00"]
        );
        // Without a meridiem "5" is 05:00, so the range runs overnight.
        assert_eq!(
            rendered(&parse_line("Thu: 9-5")),
            vec!["Thu 09:00 - 24:00", "Fri 00:00 - 05:00"]
        );
    }

    #[test]
    fn test_line_to_keyword() {
        assert_eq!(
            rendered(&parse_line("Sunday 11 a.m. to 4 p.m.")),
            vec!["Sun 11:00 - 16:00"]
        );
    }

    #[test]
    fn test_line_time_directly_after_day_word() {
        assert_eq!(rendered(&parse_line("Mon9am-5pm")), vec!["Mon 09:00 - 17:00"]);
        assert_eq!(rendered(&parse_line("Thu:9-17")), vec!["Thu 09:00 - 17:00"]);
    }

    #[test]
    fn test_line_range_inside_longer_number_ignored() {
        assert!(parse_line("Sat 123-456").is_empty());
    }

    #[test]
    fn test_line_overnight_is_split() {
        assert_eq!(
            rendered(&parse_line("Tue 10:00pm - 2:00am")),
            vec!["Tue 22:00 - 24:00", "Wed 00:00 - 02:00"]
        );
    }

    #[test]
    fn test_line_all_day_marker() {
        let intervals = parse_line("Daily 24 hours");
        assert_eq!(intervals.len(), 7);
        assert!(intervals.iter().all(Interval::is_all_day));

        assert_eq!(
            rendered(&parse_line("Sat - Sun: Open 24 Hours")),
            vec!["Sat 00:00 - 24:00", "Sun 00:00 - 24:00"]
        );
    }

    #[test]
    fn test_line_closed_marker_discards_even_with_times() {
        assert!(parse_line("Sunday Closed").is_empty());
        assert!(parse_line("Mon 9am-5pm (kitchen closed)").is_empty());
    }

    #[test]
    fn test_line_without_range_discarded() {
        assert!(parse_line("Mon-Fri by appointment").is_empty());
        assert!(parse_line("Call 555 1234").is_empty());
    }

    #[test]
    fn test_line_with_bad_time_discarded() {
        assert!(parse_line("Mon 9:75am - 5pm").is_empty());
        assert!(parse_line("Mon 13pm - 5pm").is_empty());
    }

    #[test]
    fn test_line_without_day_discarded() {
        assert!(parse_line("9:00am - 5:00pm").is_empty());
        assert!(parse_line("Hours: 9 - 5").is_empty());
    }

    #[test]
    fn test_line_zero_length_discarded() {
        assert!(parse_line("Mon 9am - 9am").is_empty());
    }

    #[test]
    fn test_line_empty_and_whitespace() {
        assert!(parse_line("").is_empty());
        assert!(parse_line("   \t ").is_empty());
    }

    #[test]
    fn test_canonical_rendering_reparses_identically() {
        for interval in [
            Interval::new(1, t("09:00"), t("17:00")).unwrap(),
            Interval::new(3, t("22:00"), t("24:00")).unwrap(),
            Interval::new(0, t("00:00"), t("02:00")).unwrap(),
            Interval::all_day(6).unwrap(),
        ] {
            assert_eq!(parse_line(&interval.to_string()), vec![interval]);
        }
    }

    // ── parse_lines tests ───────────────────────────────────────────────

    #[test]
    fn test_lines_concatenate_in_order() {
        let intervals = parse_lines([
            "Mon-Fri 6:00am - 10:00pm",
            "Sat-Sun 8:00am - 8:00pm",
            "Holidays: closed",
            "garbage",
        ]);
        assert_eq!(intervals.len(), 7);
        assert_eq!(intervals[5].to_string(), "Sat 08:00 - 20:00");
        assert_eq!(intervals[6].to_string(), "Sun 08:00 - 20:00");
    }

    #[test]
    fn test_interval_set_from_lines_keeps_sources() {
        let set = IntervalSet::from_lines(["  Mon 9-17 ", "", "Tue closed"]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.source_lines, vec!["Mon 9-17", "Tue closed"]);
    }
}

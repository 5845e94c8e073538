//! Weekday phrase parsing: `"Mon-Fri"`, `"Daily"`, `"Sat, Sun"`,
//! `"Friday to Monday"` → day indices.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{next_day, DayIndex};

/// `<word>[.] (-|to|through|thru) <word>`; both words must be weekdays.
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-z]+)\.?\s*(?:-|\bto\b|\bthrough\b|\bthru\b)\s*([a-z]+)\b")
        .expect("day range pattern is valid")
});

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+").expect("word pattern is valid"));

static ALL_DAYS: [DayIndex; 7] = [0, 1, 2, 3, 4, 5, 6];

/// Replace typographic dash variants with a plain hyphen.
pub fn normalize_dashes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
            | '\u{2212}' => '-',
            other => other,
        })
        .collect()
}

/// Parse a weekday phrase into the days it denotes.
///
/// In order of precedence:
///
/// 1. `daily`, `every day`, `everyday` → all seven days, Sunday first.
/// 2. The first explicit range `<day> - <day>` (or `to`/`through`/`thru`)
///    → every day from start to end walking forward, wrapping past Saturday.
/// 3. Every weekday token anywhere in the text, de-duplicated, in the order
///    first seen. `weekdays` and `weekends` expand in place.
///
/// An empty result means no day was recognized; callers drop the line.
///
/// # Examples
///
/// ```
/// use hours_engine::days::parse_day_spec;
///
/// assert_eq!(parse_day_spec("Fri-Mon"), vec![5, 6, 0, 1]);
/// assert_eq!(parse_day_spec("Sat, Sun"), vec![6, 0]);
/// assert!(parse_day_spec("Holidays").is_empty());
/// ```
pub fn parse_day_spec(text: &str) -> Vec<DayIndex> {
    let lowered = normalize_dashes(text).to_lowercase();

    if lowered.contains("daily") || lowered.contains("every day") || lowered.contains("everyday")
    {
        return ALL_DAYS.to_vec();
    }

    if let Some((start, end)) = find_range(&lowered) {
        return expand_range(start, end);
    }

    let mut days = Vec::new();
    for word in WORD_RE.find_iter(&lowered) {
        for day in expand_token(word.as_str()) {
            if !days.contains(day) {
                days.push(*day);
            }
        }
    }
    days
}

/// First range whose endpoints are both weekday names.
fn find_range(lowered: &str) -> Option<(DayIndex, DayIndex)> {
    RANGE_RE.captures_iter(lowered).find_map(|caps| {
        let start = parse_weekday(caps.get(1)?.as_str())?;
        let end = parse_weekday(caps.get(2)?.as_str())?;
        Some((start, end))
    })
}

/// Inclusive forward walk from `start` to `end`, wrapping the week.
fn expand_range(start: DayIndex, end: DayIndex) -> Vec<DayIndex> {
    let mut days = vec![start];
    let mut day = start;
    while day != end {
        day = next_day(day);
        days.push(day);
    }
    days
}

fn expand_token(word: &str) -> &'static [DayIndex] {
    match word {
        "weekdays" => &[1, 2, 3, 4, 5],
        "weekends" | "weekend" => &[6, 0],
        _ => match parse_weekday(word) {
            Some(day) => &ALL_DAYS[day as usize..=day as usize],
            None => &[],
        },
    }
}

/// Parse a lower-case weekday name, full or abbreviated.
pub fn parse_weekday(s: &str) -> Option<DayIndex> {
    match s {
        "sunday" | "sun" => Some(0),
        "monday" | "mon" => Some(1),
        "tuesday" | "tue" | "tues" => Some(2),
        "wednesday" | "wed" | "weds" => Some(3),
        "thursday" | "thu" | "thur" | "thurs" => Some(4),
        "friday" | "fri" => Some(5),
        "saturday" | "sat" => Some(6),
        _ => None,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

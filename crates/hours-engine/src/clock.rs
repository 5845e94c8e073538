//! Loose clock-time parsing: `"9"`, `"9:30am"`, `"11 pm"`, `"9:30 a.m."`,
//! `"17:00"` → canonical [`ClockTime`].

use crate::model::ClockTime;

/// Parse a human-written time token into a canonical 24-hour time.
///
/// Whitespace and periods are ignored. The token is a 1–2 digit hour, an
/// optional `:MM`, and an optional case-insensitive `am`/`pm` suffix.
///
/// - With a meridiem the hour must be 1–12 (`12am` is `00:00`, `12pm` is
///   `12:00`).
/// - Without one the hour is read on a 24-hour clock, 0–24, and `24` is only
///   accepted as `24:00`.
///
/// Returns `None` for anything else; callers skip the surrounding entry.
///
/// # Examples
///
/// ```
/// use hours_engine::clock::parse_clock_time;
///
/// assert_eq!(parse_clock_time("9:30pm").unwrap().to_string(), "21:30");
/// assert_eq!(parse_clock_time("12 a.m.").unwrap().to_string(), "00:00");
/// assert!(parse_clock_time("13pm").is_none());
/// ```
pub fn parse_clock_time(text: &str) -> Option<ClockTime> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_ascii_lowercase();

    let (digits, meridiem) = if let Some(rest) = compact.strip_suffix("am") {
        (rest, Some(Meridiem::Am))
    } else if let Some(rest) = compact.strip_suffix("pm") {
        (rest, Some(Meridiem::Pm))
    } else {
        (compact.as_str(), None)
    };

    let (hour_str, minute_str) = match digits.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (digits, None),
    };

    let hour = parse_digits(hour_str, 1..=2)?;
    let minute = match minute_str {
        Some(m) => parse_digits(m, 2..=2)?,
        None => 0,
    };
    if minute > 59 {
        return None;
    }

    let hour24 = match meridiem {
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(Meridiem::Am) if hour == 12 => 0,
        Some(Meridiem::Pm) if hour == 12 => 12,
        Some(Meridiem::Pm) => hour + 12,
        Some(Meridiem::Am) | None => hour,
    };

    ClockTime::from_hm(hour24, minute)
}

#[derive(Debug, Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Parse an all-ASCII-digit string whose length falls in `len`.
fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(s: &str) -> Option<String> {
        parse_clock_time(s).map(|t| t.to_string())
    }

    #[test]
    fn test_bare_hour_is_24_hour_clock() {
        assert_eq!(parsed("9").as_deref(), Some("09:00"));
        assert_eq!(parsed("0").as_deref(), Some("00:00"));
        assert_eq!(parsed("17").as_deref(), Some("17:00"));
    }

    #[test]
    fn test_hour_and_minute() {
        assert_eq!(parsed("9:30").as_deref(), Some("09:30"));
        assert_eq!(parsed("09:05").as_deref(), Some("09:05"));
        assert_eq!(parsed("23:59").as_deref(), Some("23:59"));
    }

    #[test]
    fn test_meridiem_suffix() {
        assert_eq!(parsed("9:30am").as_deref(), Some("09:30"));
        assert_eq!(parsed("11 pm").as_deref(), Some("23:00"));
        assert_eq!(parsed("6:00AM").as_deref(), Some("06:00"));
        assert_eq!(parsed("10:00 P.M.").as_deref(), Some("22:00"));
        assert_eq!(parsed("1pm").as_deref(), Some("13:00"));
    }

    #[test]
    fn test_twelve_oclock_edge_cases() {
        assert_eq!(parsed("12am").as_deref(), Some("00:00"));
        assert_eq!(parsed("12:30am").as_deref(), Some("00:30"));
        assert_eq!(parsed("12pm").as_deref(), Some("12:00"));
        assert_eq!(parsed("12:45 pm").as_deref(), Some("12:45"));
    }

    #[test]
    fn test_meridiem_hour_out_of_range() {
        assert_eq!(parsed("0am"), None);
        assert_eq!(parsed("13pm"), None);
        assert_eq!(parsed("00:30 am"), None);
    }

    #[test]
    fn test_end_of_day_sentinel() {
        assert_eq!(parsed("24").as_deref(), Some("24:00"));
        assert_eq!(parsed("24:00").as_deref(), Some("24:00"));
        assert_eq!(parsed("24:30"), None);
        assert_eq!(parsed("25:00"), None);
    }

    #[test]
    fn test_minute_out_of_range() {
        assert_eq!(parsed("9:60"), None);
        assert_eq!(parsed("9:75pm"), None);
    }

    #[test]
    fn test_malformed_input() {
        for input in ["", "noon", "9:3", "9:300", "123", "9:30xm", "a9", "-9", "9::30", ":30"] {
            assert_eq!(parsed(input), None, "input {input:?}");
        }
    }
}

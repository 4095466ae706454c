//! Clock time parsing and day-wrap-aware differences.

use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;

static COLON_TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})").expect("Invalid HH:MM regex"));

static COMPACT_TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2})").expect("Invalid HHMM regex"));

const MINUTES_PER_DAY: i64 = 24 * 60;
const HALF_DAY: i64 = MINUTES_PER_DAY / 2;

/// Parses "HH:MM" or "HHMM" after dropping everything except digits and
/// colons. Out-of-range hours or minutes yield `None`.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ':')
        .collect();
    [&*COLON_TIME_REGEX, &*COMPACT_TIME_REGEX]
        .into_iter()
        .find_map(|regex| {
            let caps = regex.captures(&cleaned)?;
            let hour = caps[1].parse::<u32>().ok()?;
            let minute = caps[2].parse::<u32>().ok()?;
            NaiveTime::from_hms_opt(hour, minute, 0)
        })
}

/// Formats a clock time as `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Signed minutes from `first` to `second`.
///
/// Differences larger than twelve hours in either direction are assumed to
/// cross midnight and are folded into the shorter direction.
pub fn minutes_between(first: NaiveTime, second: NaiveTime) -> i64 {
    let first = i64::from(first.hour() * 60 + first.minute());
    let second = i64::from(second.hour() * 60 + second.minute());
    let diff = second - first;
    if diff < -HALF_DAY {
        diff + MINUTES_PER_DAY
    } else if diff > HALF_DAY {
        diff - MINUTES_PER_DAY
    } else {
        diff
    }
}

/// Parses both times and returns the minutes between them.
pub fn time_diff_minutes(first: &str, second: &str) -> Option<i64> {
    Some(minutes_between(parse_time(first)?, parse_time(second)?))
}

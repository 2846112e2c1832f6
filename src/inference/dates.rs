//! Day-first date recognition for text cells.
use crate::table::Value;
use chrono::NaiveDate;
use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;

/// `D/M/Y` or `D-M-Y` with 1–2 digit day and month and a 2–4 digit year, or ISO
/// `Y-M-D`, optionally followed by a time of day.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}[/-]\d{1,2}[/-]\d{1,2})(?:[ T]\d{1,2}:\d{2}(?::\d{2})?)?$")
        .expect("Hardcode regex pattern")
});

/// Returns true when the trimmed text looks like a date.
pub fn looks_like_date(text: &str) -> bool {
    DATE_PATTERN.is_match(text.trim())
}

/// Strictly parses a day-first date, with an optional trailing time that is validated and dropped.
///
/// Accepted layouts: `%d/%m/%Y`, `%d-%m-%Y`, `%d/%m/%y`, `%d-%m-%y`, `%Y-%m-%d`
/// and `%Y/%m/%d`.
pub fn parse_day_first(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let (date, time) = match text.split_once(|character: char| character == ' ' || character == 'T') {
        Some((date, time)) => (date, Some(time.trim())),
        None => (text, None),
    };
    if let Some(time) = time {
        NaiveTime::parse_from_str(time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .ok()?;
    }

    let separator = date.chars().find(|character| *character == '/' || *character == '-')?;
    let parts = date.split(separator).collect::<Vec<_>>();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit())) {
        return None;
    }
    let format = match (parts[0].len(), parts[2].len()) {
        (4, 1..=2) => format!("%Y{separator}%m{separator}%d"),
        (1..=2, 2) => format!("%d{separator}%m{separator}%y"),
        (1..=2, 3..=4) => format!("%d{separator}%m{separator}%Y"),
        _ => return None,
    };
    NaiveDate::parse_from_str(date, &format).ok()
}

/// Reads a cell as a calendar date: native dates directly, text day-first.
pub fn value_to_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(_) | Value::DateTime(_) => value.as_date(),
        Value::Text(text) => parse_day_first(text),
        _ => None,
    }
}

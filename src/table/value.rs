use chrono::NaiveDate;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Display;

/// A single cell value, as read from a source file or after normalization.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// The missing marker: an absent cell, a null literal, or a value that failed to parse
    #[default]
    Missing,
    /// Free-form text
    Text(String),
    /// Finite IEEE-754 double
    Number(f64),
    /// Boolean cell
    Boolean(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Date with time of day
    DateTime(NaiveDateTime),
}

impl Value {
    /// Builds a number value, mapping non-finite input to the missing marker.
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            Value::Number(value)
        } else {
            Value::Missing
        }
    }

    /// Returns true for the missing marker.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Returns the numeric payload, if any.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the calendar date of date and datetime values.
    #[inline]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(date) => Some(*date),
            Value::DateTime(datetime) => Some(datetime.date()),
            _ => None,
        }
    }

    /// Returns true for natively typed dates and datetimes.
    #[inline]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Value::Date(_) | Value::DateTime(_))
    }

    /// Returns a copy with surrounding whitespace removed from text payloads.
    pub fn trimmed(&self) -> Value {
        match self {
            Value::Text(text) => Value::Text(text.trim().to_owned()),
            other => other.clone(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Text(text) => write!(f, "{}", text),
            Value::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => write!(f, "{:.0}", value),
            Value::Number(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Value::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_integral_numbers_without_fraction() {
        assert_eq!(Value::Number(1.0).to_string(), "1");
        assert_eq!(Value::Number(-42.0).to_string(), "-42");
        assert_eq!(Value::Number(1234.56).to_string(), "1234.56");
    }

    #[test]
    fn display_temporal_values() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2024-03-09");
        let datetime = date.and_hms_opt(8, 5, 0).unwrap();
        assert_eq!(Value::DateTime(datetime).to_string(), "2024-03-09 08:05:00");
        assert_eq!(Value::DateTime(datetime).as_date(), Some(date));
    }

    #[test]
    fn non_finite_numbers_become_missing() {
        assert!(Value::number(f64::NAN).is_missing());
        assert!(Value::number(f64::INFINITY).is_missing());
        assert_eq!(Value::number(2.5), Value::Number(2.5));
    }
}

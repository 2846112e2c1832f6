use crate::spreadsheet::reference::index_to_reference;
use crate::table::Value;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Timelike;
use iso8601_duration::Duration as IsoDuration;

/// Storage kinds of workbook cells, before conversion to [`Value`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean stored as `1` / `0`
    Boolean,
    /// Plain number
    Number,
    /// Date/time serial number, 1900 date system
    NumberDateTime1900,
    /// Date serial number, 1900 date system
    NumberDate1900,
    /// Time-of-day fraction, 1900 date system
    NumberTime1900,
    /// Date/time serial number, 1904 date system
    NumberDateTime1904,
    /// Date serial number, 1904 date system
    NumberDate1904,
    /// Time-of-day fraction, 1904 date system
    NumberTime1904,
    /// ISO 8601 date or date/time text
    IsoDateTime,
    /// ISO 8601 duration text (ODS time cells)
    IsoDuration,
    /// String stored in the cell itself
    InlineString,
    /// Index into the workbook's shared string table
    SharedString,
    /// Formula error such as `#DIV/0!`
    Error,
}

impl CellType {
    /// Maps built-in Excel number format ids to temporal cell types.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(Self::date_time(is_1904)),
            "14" | "15" | "16" | "17" => Some(Self::date(is_1904)),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(Self::time(is_1904)),
            _ => None,
        }
    }

    /// Classifies a custom number format code.
    /// Date and time tokens inside quoted literals, escapes and `[...]` sections are ignored.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_section = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,
                '"' => is_literal = !is_literal,
                _ if is_literal => (),
                '[' => is_section = true,
                ']' => is_section = false,
                _ if is_section => (),
                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }
        match (is_date, is_time) {
            (true, true) => Self::date_time(is_1904),
            (true, false) => Self::date(is_1904),
            (false, true) => Self::time(is_1904),
            (false, false) => Self::Number,
        }
    }

    fn date_time(is_1904: bool) -> Self {
        if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }
    }

    fn date(is_1904: bool) -> Self {
        if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }
    }

    fn time(is_1904: bool) -> Self {
        if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }
    }

    fn is_1904(&self) -> bool {
        matches!(self, Self::NumberDateTime1904 | Self::NumberDate1904 | Self::NumberTime1904)
    }
}

/// A single non-empty cell with its position, storage kind and raw text.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    pub(crate) value: String,
}

impl Cell {
    /// Returns the A1-style reference of the cell.
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Converts the raw cell content to a typed [`Value`].
    ///
    /// Error cells convert to the missing marker; callers decide beforehand
    /// whether an error cell is acceptable.
    pub(crate) fn to_value(&self, shared_strings: &[String]) -> Result<Value, String> {
        let value = match self.kind {
            CellType::Empty | CellType::Error => Value::Missing,
            CellType::Boolean => Value::Boolean(self.value != "0" && !self.value.eq_ignore_ascii_case("false")),
            CellType::Number => Value::number(self.to_double()?),
            CellType::NumberDate1900 | CellType::NumberDate1904 => {
                let datetime = serial_to_datetime(self.to_double()?, self.kind.is_1904())
                    .ok_or_else(|| format!("'{}' is not a valid date serial", self.value))?;
                Value::Date(datetime.date())
            }
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                serial_to_datetime(self.to_double()?, self.kind.is_1904())
                    .map(Value::DateTime)
                    .ok_or_else(|| format!("'{}' is not a valid date/time serial", self.value))?
            }
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                Value::Text(to_time_string(self.to_double()?))
            }
            CellType::IsoDateTime => parse_iso_datetime(&self.value)
                .ok_or_else(|| format!("parse '{}' to date/time failed", self.value))?,
            CellType::IsoDuration => {
                let duration = self.value
                    .parse::<IsoDuration>()
                    .map_err(|_| format!("parse '{}' to iso8601 duration failed", self.value))?;
                let seconds = duration.hour as f64 * 3600.0 + duration.minute as f64 * 60.0 + duration.second as f64;
                Value::Text(to_time_string(seconds / 86_400.0))
            }
            CellType::InlineString => Value::Text(self.value.to_owned()),
            CellType::SharedString => {
                let index = self.value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid shared string index '{}'", self.value))?;
                shared_strings
                    .get(index)
                    .map(|text| Value::Text(text.to_owned()))
                    .ok_or_else(|| format!("shared string index {} out of range", index))?
            }
        };
        Ok(value)
    }

    fn to_double(&self) -> Result<f64, String> {
        self.value.trim()
            .parse::<f64>()
            .map_err(|_| format!("parse '{}' to double failed", self.value))
    }
}

/// Converts a workbook serial number to a date/time.
///
/// The 1900 system counts from 1899-12-30 and carries the Lotus 1-2-3 leap
/// year bug (serial 60 is the nonexistent 1900-02-29); the 1904 system counts
/// from 1904-01-01.
pub(crate) fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial > 2_958_465.0 {
        return None;
    }
    let days = serial.trunc() as i64;
    let offset = if is_1904 {
        1_462
    } else if days < 60 {
        1
    } else {
        0
    };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let milliseconds = (serial.fract() * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::days(days + offset) + Duration::milliseconds(milliseconds))
}

/// Formats a fraction of a day as `HH:MM:SS`.
pub(crate) fn to_time_string(fraction: f64) -> String {
    let total = (fraction.fract().abs() * 86_400.0).round() as i64;
    let seconds = total % 60;
    let minutes = (total / 60) % 60;
    let hours = (total / 3_600) % 24;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parses ISO dates (`2024-01-31`) and date/times (`2024-01-31T10:00:00.5`).
/// A date/time at midnight is read as a plain date.
fn parse_iso_datetime(value: &str) -> Option<Value> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Value::Date(date));
    }
    let trimmed = value.trim_end_matches('Z');
    let datetime = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    if datetime.time().num_seconds_from_midnight() == 0 && datetime.time().nanosecond() == 0 {
        Some(Value::Date(datetime.date()))
    } else {
        Some(Value::DateTime(datetime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell { row: 0, col: 0, kind, value: value.to_owned() }
    }

    #[test]
    fn custom_number_formats() {
        assert_eq!(CellType::parse_custom_number_format("dd/mm/yyyy", false), CellType::NumberDate1900);
        assert_eq!(CellType::parse_custom_number_format("dd/mm/yyyy hh:mm", true), CellType::NumberDateTime1904);
        assert_eq!(CellType::parse_custom_number_format("hh:mm:ss", false), CellType::NumberTime1900);
        assert_eq!(CellType::parse_custom_number_format("\"R$\" #,##0.00", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("[Red]#,##0.00", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("#,##0.00\\ \"days\"", false), CellType::Number);
    }

    #[test]
    fn date_serials() {
        let value = cell(CellType::NumberDate1900, "45306").to_value(&[]).unwrap();
        assert_eq!(value, Value::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));

        let value = cell(CellType::NumberDate1900, "59").to_value(&[]).unwrap();
        assert_eq!(value, Value::Date(NaiveDate::from_ymd_opt(1900, 2, 28).unwrap()));

        let value = cell(CellType::NumberDate1904, "0").to_value(&[]).unwrap();
        assert_eq!(value, Value::Date(NaiveDate::from_ymd_opt(1904, 1, 1).unwrap()));

        let value = cell(CellType::NumberDateTime1900, "45306.5").to_value(&[]).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(value, Value::DateTime(expected));
    }

    #[test]
    fn time_cells_render_as_text() {
        let value = cell(CellType::NumberTime1900, "0.5625").to_value(&[]).unwrap();
        assert_eq!(value, Value::from("13:30:00"));
        let value = cell(CellType::IsoDuration, "PT13H30M00S").to_value(&[]).unwrap();
        assert_eq!(value, Value::from("13:30:00"));
    }

    #[test]
    fn iso_datetimes() {
        let value = cell(CellType::IsoDateTime, "2024-02-29").to_value(&[]).unwrap();
        assert_eq!(value, Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        let value = cell(CellType::IsoDateTime, "2024-02-29T00:00:00").to_value(&[]).unwrap();
        assert_eq!(value, Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        let value = cell(CellType::IsoDateTime, "2024-02-29T08:15:00").to_value(&[]).unwrap();
        assert!(matches!(value, Value::DateTime(_)));
        assert!(cell(CellType::IsoDateTime, "yesterday").to_value(&[]).is_err());
    }

    #[test]
    fn shared_strings_and_booleans() {
        let strings = vec!["Cliente".to_owned(), "Valor".to_owned()];
        assert_eq!(cell(CellType::SharedString, "1").to_value(&strings).unwrap(), Value::from("Valor"));
        assert!(cell(CellType::SharedString, "9").to_value(&strings).is_err());
        assert_eq!(cell(CellType::Boolean, "1").to_value(&[]).unwrap(), Value::Boolean(true));
        assert_eq!(cell(CellType::Boolean, "0").to_value(&[]).unwrap(), Value::Boolean(false));
    }
}

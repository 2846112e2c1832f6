//! Locale-aware parsing of numeric text.
//!
//! Two interpretations compete for each column: Brazilian (`1.234,56`, comma
//! decimal, dot thousands) and international (`1,234.56`). Each parser validates
//! digit grouping so that a value written in one convention is rejected by the
//! other instead of being silently misread.
use serde::Serialize;
use std::fmt::Display;

/// Number formatting convention of a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Interpretation {
    /// Comma decimal separator, dot thousands separator
    Brazilian,
    /// Dot decimal separator, comma thousands separator
    International,
}

impl Interpretation {
    /// Race order; the first entry wins ties.
    pub const ALL: [Interpretation; 2] = [Interpretation::Brazilian, Interpretation::International];

    const fn separators(&self) -> (char, char) {
        match self {
            Interpretation::Brazilian => ('.', ','),
            Interpretation::International => (',', '.'),
        }
    }

    /// Parses `text` under this convention, after stripping currency indicators,
    /// percent signs and whitespace.
    pub fn parse(&self, text: &str, currency_indicators: &[String]) -> Option<f64> {
        let stripped = strip_symbols(text, currency_indicators);
        let (group, decimal) = self.separators();
        let (negative, core) = split_sign(&stripped)?;
        let value = parse_shape(core, group, decimal)?;
        Some(if negative { -value } else { value })
    }
}

impl Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interpretation::Brazilian => write!(f, "BR"),
            Interpretation::International => write!(f, "US"),
        }
    }
}

/// Parses `text` under any interpretation, in race order.
pub fn parse_any(text: &str, currency_indicators: &[String]) -> Option<f64> {
    Interpretation::ALL
        .iter()
        .find_map(|interpretation| interpretation.parse(text, currency_indicators))
}

/// Removes currency indicators, `%` and all whitespace (non-breaking spaces included).
pub fn strip_symbols(text: &str, currency_indicators: &[String]) -> String {
    let mut indicators = currency_indicators.iter().collect::<Vec<_>>();
    // "R$" and "US$" before "$"
    indicators.sort_by_key(|indicator| std::cmp::Reverse(indicator.len()));
    let mut stripped = text.to_owned();
    for indicator in indicators.iter().filter(|indicator| !indicator.is_empty()) {
        stripped = stripped.replace(indicator.as_str(), "");
    }
    stripped
        .chars()
        .filter(|character| *character != '%' && !character.is_whitespace())
        .collect()
}

/// Returns true when `text` carries one of the currency indicators.
pub fn has_currency_indicator(text: &str, currency_indicators: &[String]) -> bool {
    currency_indicators
        .iter()
        .any(|indicator| !indicator.is_empty() && text.contains(indicator.as_str()))
}

/// Splits accounting parentheses and a leading or trailing sign off the digits.
fn split_sign(text: &str) -> Option<(bool, &str)> {
    if let Some(inner) = text.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        return Some((true, inner));
    }
    if let Some(rest) = text.strip_prefix('-') {
        Some((true, rest))
    } else if let Some(rest) = text.strip_suffix('-') {
        Some((true, rest))
    } else if let Some(rest) = text.strip_prefix('+') {
        Some((false, rest))
    } else if text.is_empty() {
        None
    } else {
        Some((false, text))
    }
}

/// Validates and parses unsigned digits with optional grouping and decimal separators.
/// Groups after the first must have exactly three digits.
fn parse_shape(text: &str, group: char, decimal: char) -> Option<f64> {
    let (integer, fraction) = match text.split_once(decimal) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };
    let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit());

    let mut digits = String::with_capacity(text.len());
    if integer.contains(group) {
        for (index, part) in integer.split(group).enumerate() {
            let valid = if index == 0 { (1..=3).contains(&part.len()) } else { part.len() == 3 };
            if !valid || !is_digits(part) {
                return None;
            }
            digits.push_str(part);
        }
    } else if !integer.is_empty() {
        if !is_digits(integer) {
            return None;
        }
        digits.push_str(integer);
    }

    if let Some(fraction) = fraction {
        if !is_digits(fraction) {
            return None;
        }
        if digits.is_empty() {
            digits.push('0');
        }
        digits.push('.');
        digits.push_str(fraction);
    }

    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn br(text: &str) -> Option<f64> {
        Interpretation::Brazilian.parse(text, &Settings::default().currency_indicators)
    }

    fn us(text: &str) -> Option<f64> {
        Interpretation::International.parse(text, &Settings::default().currency_indicators)
    }

    #[test]
    fn brazilian_numbers() {
        assert_eq!(br("1.234,56"), Some(1234.56));
        assert_eq!(br("R$ 1.234,56"), Some(1234.56));
        assert_eq!(br("1.234.567,89"), Some(1234567.89));
        assert_eq!(br("800,00"), Some(800.0));
        assert_eq!(br("1234"), Some(1234.0));
        assert_eq!(br("1.234"), Some(1234.0));
        assert_eq!(br("12,5%"), Some(12.5));
        assert_eq!(br("R$\u{a0}99,90"), Some(99.9));
        assert_eq!(br("1 234,56"), Some(1234.56));
    }

    #[test]
    fn international_numbers() {
        assert_eq!(us("1234.56"), Some(1234.56));
        assert_eq!(us("1,234,567.89"), Some(1234567.89));
        assert_eq!(us("US$ 2,500.00"), Some(2500.0));
        assert_eq!(us(".5"), Some(0.5));
    }

    #[test]
    fn shapes_discriminate_conventions() {
        assert_eq!(br("1234.56"), None);
        assert_eq!(us("1.234,56"), None);
        assert_eq!(us("800,00"), None);
        assert_eq!(br("12.34.567"), None);
    }

    #[test]
    fn negative_forms() {
        assert_eq!(br("(1.234,56)"), Some(-1234.56));
        assert_eq!(br("-R$ 10,00"), Some(-10.0));
        assert_eq!(us("250.00-"), Some(-250.0));
    }

    #[test]
    fn rejects_non_numbers() {
        for text in ["", "R$", "abc", "10,", "1,2,3", "--5", "12a"] {
            assert_eq!(br(text), None, "{text}");
        }
        assert_eq!(parse_any("N/A", &Settings::default().currency_indicators), None);
    }

    #[test]
    fn currency_indicators() {
        let indicators = Settings::default().currency_indicators;
        assert!(has_currency_indicator("R$ 10,00", &indicators));
        assert!(has_currency_indicator("10 EUR", &indicators));
        assert!(!has_currency_indicator("10,00", &indicators));
    }
}

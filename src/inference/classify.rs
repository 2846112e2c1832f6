use crate::inference::dates;
use crate::inference::locale;
use crate::settings::Settings;
use crate::table::Column;
use crate::table::Table;
use crate::table::Value;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Semantic type of a column, decided once per column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ColumnType {
    Date,
    Numeric {
        /// Values are amounts of money
        is_monetary: bool,
        /// Values are counts or volumes
        is_quantity: bool,
    },
    Boolean,
    Categorical,
    FreeText,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric { .. })
    }

    pub fn is_monetary(&self) -> bool {
        matches!(self, ColumnType::Numeric { is_monetary: true, .. })
    }
}

/// Column types of a table, in column order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Classification {
    entries: Vec<(String, ColumnType)>,
}

impl Classification {
    pub fn entries(&self) -> &[(String, ColumnType)] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.entries
            .iter()
            .find(|(column_name, _)| column_name == name)
            .map(|(_, column_type)| *column_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn names<P: Fn(&ColumnType) -> bool>(&self, predicate: P) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, column_type)| predicate(column_type))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn dates(&self) -> Vec<&str> {
        self.names(|column_type| *column_type == ColumnType::Date)
    }

    pub fn numerics(&self) -> Vec<&str> {
        self.names(ColumnType::is_numeric)
    }

    pub fn monetary(&self) -> Vec<&str> {
        self.names(ColumnType::is_monetary)
    }

    /// Groupable columns: categorical and boolean.
    pub fn categoricals(&self) -> Vec<&str> {
        self.names(|column_type| matches!(column_type, ColumnType::Categorical | ColumnType::Boolean))
    }

    pub fn free_texts(&self) -> Vec<&str> {
        self.names(|column_type| *column_type == ColumnType::FreeText)
    }
}

/// Classifies every column of `table`. Pure and deterministic.
pub fn classify(table: &Table, settings: &Settings) -> Classification {
    let entries = table.columns()
        .iter()
        .map(|column| {
            let column_type = classify_column(column, settings);
            debug!("Column '{}' classified as {:?}", column.name, column_type);
            (column.name.to_owned(), column_type)
        })
        .collect();
    Classification { entries }
}

/// Classifies one column from its name and non-missing values.
///
/// Precedence is date, boolean, numeric, then categorical or free text.
pub fn classify_column(column: &Column, settings: &Settings) -> ColumnType {
    let present = column.present().collect::<Vec<_>>();
    if present.is_empty() {
        return ColumnType::Categorical;
    }
    let sample = &present[..present.len().min(settings.sample_size)];

    if is_date(&present, sample, settings) {
        return ColumnType::Date;
    }
    if is_boolean(&present, settings) {
        return ColumnType::Boolean;
    }
    if is_numeric(&present, sample, settings) {
        let name = column.name.to_lowercase();
        let name_has = |tokens: &[String]| tokens.iter().any(|token| name.contains(&token.to_lowercase()));
        let texts = sample.iter().filter_map(|value| value.as_text()).collect::<Vec<_>>();
        let currency_hits = texts
            .iter()
            .filter(|text| locale::has_currency_indicator(text, &settings.currency_indicators))
            .count();
        let currency_ratio = ratio(currency_hits, sample.len());
        return ColumnType::Numeric {
            is_monetary: name_has(&settings.monetary_name_tokens)
                || (currency_hits > 0 && currency_ratio >= settings.monetary_hint_ratio),
            is_quantity: name_has(&settings.quantity_name_tokens),
        };
    }

    let distinct = present
        .iter()
        .map(|value| value.to_string().trim().to_owned())
        .collect::<HashSet<_>>();
    if distinct.len() <= settings.categorical_max_distinct {
        return ColumnType::Categorical;
    }
    let total_length = sample.iter().map(|value| value.to_string().trim().chars().count()).sum::<usize>();
    if total_length as f64 / sample.len() as f64 > settings.long_text_length {
        ColumnType::FreeText
    } else {
        ColumnType::Categorical
    }
}

/// Natively temporal, or a majority of the sample looks like dates and every value parses.
fn is_date(present: &[&Value], sample: &[&Value], settings: &Settings) -> bool {
    if present.iter().all(|value| value.is_temporal()) {
        return true;
    }
    let matches = sample
        .iter()
        .filter(|value| match value {
            Value::Text(text) => dates::looks_like_date(text),
            other => other.is_temporal(),
        })
        .count();
    ratio(matches, sample.len()) > settings.date_match_ratio
        && present.iter().all(|value| dates::value_to_date(value).is_some())
}

fn is_boolean(present: &[&Value], settings: &Settings) -> bool {
    let mut tokens = HashSet::<String>::new();
    for value in present {
        let token = match value {
            Value::Boolean(true) => "TRUE".to_owned(),
            Value::Boolean(false) => "FALSE".to_owned(),
            other => other.to_string().trim().to_uppercase(),
        };
        if !settings.boolean_tokens.iter().any(|allowed| allowed.to_uppercase() == token) {
            return false;
        }
        tokens.insert(token);
        if tokens.len() > settings.boolean_max_distinct {
            return false;
        }
    }
    true
}

fn is_numeric(present: &[&Value], sample: &[&Value], settings: &Settings) -> bool {
    if present.iter().all(|value| value.as_number().is_some()) {
        return true;
    }
    let parsed = sample
        .iter()
        .filter(|value| match value {
            Value::Number(_) => true,
            Value::Text(text) => locale::parse_any(text, &settings.currency_indicators).is_some(),
            _ => false,
        })
        .count();
    ratio(parsed, sample.len()) > settings.numeric_match_ratio
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(
            name,
            values.iter()
                .map(|text| if text.is_empty() { Value::Missing } else { Value::from(*text) })
                .collect(),
        )
    }

    fn classify_text(name: &str, values: &[&str]) -> ColumnType {
        classify_column(&text_column(name, values), &Settings::default())
    }

    #[test]
    fn dates_without_date_keyword() {
        let column_type = classify_text("Vencimento", &["01/02/2024", "15/02/2024", "", "28/02/2024 10:30"]);
        assert_eq!(column_type, ColumnType::Date);
    }

    #[test]
    fn date_pattern_needs_full_column_parse() {
        let column_type = classify_text("Quando", &["01/02/2024", "15/02/2024", "31/02/2024"]);
        assert_ne!(column_type, ColumnType::Date);
    }

    #[test]
    fn native_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let column = Column::new("x", vec![Value::Date(date), Value::Missing, Value::Date(date)]);
        assert_eq!(classify_column(&column, &Settings::default()), ColumnType::Date);
    }

    #[test]
    fn booleans() {
        assert_eq!(classify_text("Ativo", &["Sim", "Não", "sim", " NAO "]), ColumnType::Boolean);
        let column = Column::new("Pago", vec![Value::Boolean(true), Value::Number(0.0)]);
        assert_eq!(classify_column(&column, &Settings::default()), ColumnType::Boolean);
        assert_ne!(classify_text("Status", &["Sim", "Talvez"]), ColumnType::Boolean);
    }

    #[test]
    fn numerics_with_tags() {
        assert_eq!(
            classify_text("Receita", &["R$ 1.234,56", "R$ 99,90", "10,00"]),
            ColumnType::Numeric { is_monetary: true, is_quantity: false }
        );
        assert_eq!(
            classify_text("Coluna", &["$ 10.00", "20.00", "30.00"]),
            ColumnType::Numeric { is_monetary: true, is_quantity: false }
        );
        assert_eq!(
            classify_text("Qtd Vendida", &["1", "2", "3", "15"]),
            ColumnType::Numeric { is_monetary: false, is_quantity: true }
        );
        let column = Column::new("Medida", vec![Value::Number(1.5), Value::Number(2.5)]);
        assert_eq!(
            classify_column(&column, &Settings::default()),
            ColumnType::Numeric { is_monetary: false, is_quantity: false }
        );
    }

    #[test]
    fn mostly_text_is_not_numeric() {
        assert_eq!(classify_text("Codigo", &["A1", "B2", "10", "C3"]), ColumnType::Categorical);
    }

    #[test]
    fn twenty_five_distinct_short_values_are_categorical() {
        let values = (0..50).map(|index| format!("Cliente {}", index % 25)).collect::<Vec<_>>();
        let refs = values.iter().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(classify_text("Cliente", &refs), ColumnType::Categorical);
    }

    #[test]
    fn long_varied_text_is_free_text() {
        let values = (0..40)
            .map(|index| format!("Observação número {index}: cliente solicitou entrega fora do horário comercial"))
            .collect::<Vec<_>>();
        let refs = values.iter().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(classify_text("Obs", &refs), ColumnType::FreeText);
    }

    #[test]
    fn many_short_distinct_values_stay_categorical() {
        let values = (0..40).map(|index| format!("SKU-{index}")).collect::<Vec<_>>();
        let refs = values.iter().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(classify_text("Produto", &refs), ColumnType::Categorical);
    }

    #[test]
    fn classification_is_deterministic() {
        let table = Table::new(vec![
            text_column("DATA", &["01/02/2024", "02/02/2024"]),
            text_column("VALOR", &["1.234,56", "99,90"]),
            text_column("Origin", &["S1", "S1"]),
        ]);
        let first = classify(&table, &Settings::default());
        assert_eq!(first, classify(&table, &Settings::default()));
        assert_eq!(first.dates(), vec!["DATA"]);
        assert_eq!(first.numerics(), vec!["VALOR"]);
        assert_eq!(first.monetary(), vec!["VALOR"]);
        assert_eq!(first.categoricals(), vec!["Origin"]);
        assert!(first.free_texts().is_empty());
    }
}

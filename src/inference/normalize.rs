use crate::inference::classify::Classification;
use crate::inference::classify::ColumnType;
use crate::inference::dates;
use crate::inference::locale::Interpretation;
use crate::settings::Settings;
use crate::table::Column;
use crate::table::Table;
use crate::table::Value;
use serde::Serialize;
use tracing::debug;

/// Outcome of normalizing one column, the input of the `% missing` disclosure.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnDiagnostic {
    pub column: String,
    pub column_type: Option<ColumnType>,
    /// Number convention applied to the column's text values
    pub interpretation: Option<Interpretation>,
    /// Non-missing values before normalization
    pub present: usize,
    /// Values that parsed under the column's type
    pub parsed: usize,
    /// Values that failed to parse and became missing
    pub coerced_to_missing: usize,
}

/// A normalized table with one diagnostic per column.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalization {
    pub table: Table,
    pub diagnostics: Vec<ColumnDiagnostic>,
}

/// Converts date columns to calendar dates and numeric columns to numbers; other
/// columns only get their text trimmed. Unparseable values become missing.
pub fn normalize(table: &Table, classification: &Classification, settings: &Settings) -> Normalization {
    let mut columns = Vec::with_capacity(table.columns().len());
    let mut diagnostics = Vec::with_capacity(table.columns().len());
    for column in table.columns() {
        let column_type = classification.get(&column.name);
        let present = column.present_count();
        let (values, interpretation) = match column_type {
            Some(ColumnType::Date) => (normalize_dates(column), None),
            Some(ColumnType::Numeric { .. }) => normalize_numbers(column, settings),
            _ => (column.values.iter().map(Value::trimmed).collect(), None),
        };

        let parsed = match column_type {
            Some(ColumnType::Date) | Some(ColumnType::Numeric { .. }) => {
                values.iter().filter(|value| !value.is_missing()).count()
            }
            _ => present,
        };
        let diagnostic = ColumnDiagnostic {
            column: column.name.to_owned(),
            column_type,
            interpretation,
            present,
            parsed,
            coerced_to_missing: present.saturating_sub(parsed),
        };
        debug!(
            "Column '{}': {} of {} values parsed, interpretation {:?}",
            diagnostic.column, diagnostic.parsed, diagnostic.present, diagnostic.interpretation,
        );
        diagnostics.push(diagnostic);
        columns.push(Column::new(&column.name, values));
    }
    Normalization {
        table: Table::new(columns),
        diagnostics,
    }
}

fn normalize_dates(column: &Column) -> Vec<Value> {
    column.values
        .iter()
        .map(|value| dates::value_to_date(value).map(Value::Date).unwrap_or(Value::Missing))
        .collect()
}

/// Runs the locale race over the whole column and applies the winner to every value.
/// Natively numeric columns are kept as they are; when neither convention parses
/// anything the column stays as trimmed text.
fn normalize_numbers(column: &Column, settings: &Settings) -> (Vec<Value>, Option<Interpretation>) {
    if column.present().all(|value| value.as_number().is_some()) {
        return (column.values.clone(), None);
    }

    let mut winner = None::<(Interpretation, usize)>;
    for interpretation in Interpretation::ALL {
        let successes = column.present()
            .filter(|value| parse_value(value, interpretation, settings).is_some())
            .count();
        if successes > winner.map(|(_, best)| best).unwrap_or(0) {
            winner = Some((interpretation, successes));
        }
    }

    match winner {
        Some((interpretation, _)) => {
            let values = column.values
                .iter()
                .map(|value| {
                    parse_value(value, interpretation, settings)
                        .map(Value::number)
                        .unwrap_or(Value::Missing)
                })
                .collect();
            (values, Some(interpretation))
        }
        None => (column.values.iter().map(Value::trimmed).collect(), None),
    }
}

fn parse_value(value: &Value, interpretation: Interpretation, settings: &Settings) -> Option<f64> {
    match value {
        Value::Number(number) => Some(*number),
        Value::Text(text) => interpretation.parse(text, &settings.currency_indicators),
        _ => None,
    }
}

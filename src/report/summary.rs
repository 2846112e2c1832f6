use crate::table::Column;
use crate::table::Table;
use serde::Serialize;

/// Descriptive statistics of one numeric column, missing values skipped.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1), zero for a single value
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Coefficient of variation, zero when the mean is zero
    pub cv: f64,
}

impl Summary {
    /// Summarizes the numeric values of `column`, `None` when it has none.
    pub fn of(column: &Column) -> Option<Summary> {
        let mut values = column.values
            .iter()
            .filter_map(|value| value.as_number())
            .collect::<Vec<_>>();
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let total = values.iter().sum::<f64>();
        let mean = total / count as f64;
        let median = if count % 2 == 0 {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        } else {
            values[count / 2]
        };
        let std_dev = if count > 1 {
            let squares = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>();
            (squares / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let cv = if mean == 0.0 { 0.0 } else { std_dev / mean };

        Some(Summary {
            count,
            total,
            mean,
            median,
            std_dev,
            min: values[0],
            max: values[count - 1],
            cv,
        })
    }
}

/// Aggregate scalars of one analyzed upload, as kept in the analysis history.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub file_name: String,
    pub row_count: usize,
    pub total: f64,
    pub mean: f64,
}

impl HistoryRecord {
    /// Builds the record from the clean table and its chosen metric column.
    pub fn new(file_name: &str, table: &Table, metric: &str) -> Option<HistoryRecord> {
        let summary = table.column(metric).and_then(Summary::of)?;
        Some(HistoryRecord {
            file_name: file_name.to_owned(),
            row_count: table.row_count(),
            total: summary.total,
            mean: summary.mean,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn column(values: &[Option<f64>]) -> Column {
        Column::new("Valor", values.iter().map(|value| value.map(Value::Number).unwrap_or(Value::Missing)).collect())
    }

    #[test]
    fn summarizes_numbers() {
        let summary = Summary::of(&column(&[Some(2.0), None, Some(4.0), Some(4.0), Some(6.0)])).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.total, 16.0);
        assert_eq!(summary.mean, 4.0);
        assert_eq!(summary.median, 4.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 6.0);
        assert!((summary.std_dev - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((summary.cv - summary.std_dev / 4.0).abs() < 1e-12);
    }

    #[test]
    fn single_value_and_zero_mean() {
        let summary = Summary::of(&column(&[Some(7.0)])).unwrap();
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.median, 7.0);

        let summary = Summary::of(&column(&[Some(-1.0), Some(1.0)])).unwrap();
        assert_eq!(summary.cv, 0.0);
        assert_eq!(summary.median, 0.0);
    }

    #[test]
    fn no_numbers_no_summary() {
        assert!(Summary::of(&column(&[None, None])).is_none());
        assert!(Summary::of(&Column::new("x", vec![Value::from("10")])).is_none());
    }

    #[test]
    fn history_record() {
        let table = Table::new(vec![column(&[Some(10.0), Some(30.0), None])]);
        let record = HistoryRecord::new("vendas.csv", &table, "Valor").unwrap();
        assert_eq!(record, HistoryRecord {
            file_name: "vendas.csv".to_owned(),
            row_count: 3,
            total: 40.0,
            mean: 20.0,
        });
        assert!(HistoryRecord::new("vendas.csv", &table, "Outra").is_none());
    }
}

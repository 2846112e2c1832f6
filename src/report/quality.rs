use crate::inference::Classification;
use crate::inference::ColumnType;
use crate::table::Table;
use serde::Serialize;

/// Completeness of one column of the clean table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnQuality {
    pub name: String,
    pub column_type: Option<ColumnType>,
    pub present: usize,
    pub missing: usize,
    /// Missing values as a percentage of the row count, 0 for an empty table
    pub missing_percentage: f64,
}

/// Per-column miss rates, disclosed alongside the analysis.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QualityReport {
    pub row_count: usize,
    pub columns: Vec<ColumnQuality>,
}

impl QualityReport {
    pub fn new(table: &Table, classification: &Classification) -> QualityReport {
        let row_count = table.row_count();
        let columns = table.columns()
            .iter()
            .map(|column| {
                let present = column.present_count();
                let missing = row_count - present;
                ColumnQuality {
                    name: column.name.to_owned(),
                    column_type: classification.get(&column.name),
                    present,
                    missing,
                    missing_percentage: if row_count == 0 { 0.0 } else { missing as f64 * 100.0 / row_count as f64 },
                }
            })
            .collect();
        QualityReport { row_count, columns }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnQuality> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::classify;
    use crate::settings::Settings;
    use crate::table::Column;
    use crate::table::Value;

    #[test]
    fn reports_missing_percentages() {
        let table = Table::new(vec![
            Column::new("Valor", vec![Value::Number(1.0), Value::Missing, Value::Number(3.0), Value::Missing]),
            Column::new("Cliente", vec![Value::from("Ana"); 4]),
        ]);
        let classification = classify(&table, &Settings::default());
        let report = QualityReport::new(&table, &classification);

        let valor = report.column("Valor").unwrap();
        assert_eq!(valor.present, 2);
        assert_eq!(valor.missing, 2);
        assert_eq!(valor.missing_percentage, 50.0);
        assert!(valor.column_type.unwrap().is_numeric());
        assert_eq!(report.column("Cliente").unwrap().missing_percentage, 0.0);
    }

    #[test]
    fn empty_table() {
        let report = QualityReport::new(&Table::default(), &Classification::default());
        assert_eq!(report.row_count, 0);
        assert!(report.columns.is_empty());
    }
}

use crate::table::value::Value;
use serde::Serialize;

/// A named column of values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Column {
    /// Column name (from the header row, trimmed)
    pub name: String,
    /// One value per table row
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: &str, values: Vec<Value>) -> Self {
        Column {
            name: name.to_owned(),
            values,
        }
    }

    /// Iterates over non-missing values in row order.
    pub fn present(&self) -> impl Iterator<Item = &Value> + '_ {
        self.values.iter().filter(|value| !value.is_missing())
    }

    /// Counts non-missing values.
    pub fn present_count(&self) -> usize {
        self.present().count()
    }

    /// Returns true if every value is the missing marker.
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(Value::is_missing)
    }
}

/// A table of equally long, uniquely named columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Name of the column recording which sheet each row came from.
    pub const ORIGIN: &'static str = "Origin";

    /// Creates a table, padding shorter columns with missing markers.
    pub fn new(mut columns: Vec<Column>) -> Self {
        let rows = columns.iter().map(|column| column.values.len()).max().unwrap_or(0);
        for column in &mut columns {
            column.values.resize(rows, Value::Missing);
        }
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns whether `name` is the origin tag column.
    pub fn is_origin(name: &str) -> bool {
        name == Self::ORIGIN
    }

    /// Returns the values of one row in column order, `None` past the last row.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.rows {
            return None;
        }
        self.columns.iter().map(|column| column.values.get(index)).collect()
    }

    /// Returns a new table keeping the rows whose flag is true.
    pub(crate) fn select_rows(&self, keep: &[bool]) -> Table {
        let columns = self.columns
            .iter()
            .map(|column| Column {
                name: column.name.to_owned(),
                values: column.values
                    .iter()
                    .zip(keep)
                    .filter(|(_, keep)| **keep)
                    .map(|(value, _)| value.clone())
                    .collect(),
            })
            .collect();
        Table::new(columns)
    }

    /// Returns a new table keeping the columns accepted by the predicate.
    pub(crate) fn select_columns<P>(&self, predicate: P) -> Table
    where
        P: Fn(&Column) -> bool,
    {
        Table {
            columns: self.columns.iter().filter(|column| predicate(column)).cloned().collect(),
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_short_columns() {
        let table = Table::new(vec![
            Column::new("A", vec![Value::from("x"), Value::from("y")]),
            Column::new("B", vec![Value::from(1.0)]),
        ]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("B").unwrap().values[1], Value::Missing);
    }

    #[test]
    fn rows_by_index() {
        let table = Table::new(vec![
            Column::new("A", vec![Value::from("x"), Value::from("y")]),
            Column::new("B", vec![Value::from(1.0), Value::from(2.0)]),
        ]);
        assert_eq!(table.row(1), Some(vec![&Value::from("y"), &Value::Number(2.0)]));
        assert_eq!(table.row(2), None);
        assert_eq!(Table::default().row(0), None);
    }

    #[test]
    fn select_rows_and_columns() {
        let table = Table::new(vec![
            Column::new("A", vec![Value::from("x"), Value::from("y"), Value::from("z")]),
            Column::new("B", vec![Value::Missing; 3]),
        ]);
        let rows = table.select_rows(&[true, false, true]);
        assert_eq!(rows.row_count(), 2);
        assert_eq!(rows.column("A").unwrap().values[1], Value::from("z"));

        let columns = table.select_columns(|column| !column.is_all_missing());
        assert_eq!(columns.column_names(), vec!["A"]);
        assert_eq!(columns.row_count(), 3);
    }
}

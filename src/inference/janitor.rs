use crate::table::Table;
use crate::table::Value;
use regex::Regex;
use std::sync::LazyLock;
use tracing::info;

/// Whole-word `TOTAL` or `SUBTOTAL`, any case.
static TOTAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:sub)?total\b").expect("Hardcode regex pattern")
});

/// Returns true for text cells marking a total or subtotal row.
pub fn is_total_marker(value: &Value) -> bool {
    value.as_text().map(|text| TOTAL_PATTERN.is_match(text.trim())).unwrap_or(false)
}

/// Drops blank rows, total rows and entirely missing columns. Idempotent.
///
/// The origin column is ignored when judging blank rows and is never dropped.
/// A total marker in any column, origin included, drops the row, so rows of a
/// sheet named like `Total 2024` go too.
pub fn clean(table: &Table) -> Table {
    let keep = (0..table.row_count())
        .map(|row| {
            let is_blank = table.columns()
                .iter()
                .filter(|column| !Table::is_origin(&column.name))
                .all(|column| column.values[row].is_missing());
            let is_total = table.columns().iter().any(|column| is_total_marker(&column.values[row]));
            !is_blank && !is_total
        })
        .collect::<Vec<_>>();
    let removed_rows = keep.iter().filter(|keep| !**keep).count();

    let rows = table.select_rows(&keep);
    let cleaned = rows.select_columns(|column| Table::is_origin(&column.name) || !column.is_all_missing());
    if removed_rows > 0 || cleaned.columns().len() < table.columns().len() {
        info!(
            "Removed {} row(s) and {} column(s)",
            removed_rows,
            table.columns().len() - cleaned.columns().len(),
        );
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use pretty_assertions::assert_eq;

    fn column(name: &str, values: &[&str]) -> Column {
        Column::new(
            name,
            values.iter()
                .map(|text| if text.is_empty() { Value::Missing } else { Value::from(*text) })
                .collect(),
        )
    }

    fn sample() -> Table {
        Table::new(vec![
            column("Cliente", &["Ana", "", "TOTAL GERAL", "Totalbank", "Subtotal", "Bia"]),
            column("Valor", &["10", "", "30", "5", "15", "20"]),
            column("Vazia", &["", "", "", "", "", ""]),
            column(Table::ORIGIN, &["S1", "S1", "S1", "S1", "S1", "S1"]),
        ])
    }

    #[test]
    fn removes_blank_and_total_rows() {
        let cleaned = clean(&sample());
        assert_eq!(cleaned.column_names(), vec!["Cliente", "Valor", "Origin"]);
        assert_eq!(
            cleaned.column("Cliente").unwrap().values,
            vec![Value::from("Ana"), Value::from("Totalbank"), Value::from("Bia")]
        );
        let total = cleaned.column("Valor").unwrap().values
            .iter()
            .filter_map(|value| value.as_text())
            .map(|text| text.parse::<f64>().unwrap())
            .sum::<f64>();
        assert_eq!(total, 35.0);
    }

    #[test]
    fn total_markers() {
        for text in ["Total", "grand total", "TOTAL GERAL", "Sub-total", "Subtotal", " total: "] {
            assert!(is_total_marker(&Value::from(text)), "{text}");
        }
        for text in ["Totalbank", "Totais", "Subtotals"] {
            assert!(!is_total_marker(&Value::from(text)), "{text}");
        }
        assert!(!is_total_marker(&Value::Number(1.0)));
    }

    #[test]
    fn clean_is_idempotent() {
        let once = clean(&sample());
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn drops_rows_of_total_sheets() {
        let table = Table::new(vec![
            column("Cliente", &["Ana", "Bia", "Caio"]),
            column("Valor", &["10", "20", "30"]),
            column(Table::ORIGIN, &["Jan", "Total", "Subtotal Fev"]),
        ]);
        let cleaned = clean(&table);
        assert_eq!(cleaned.row_count(), 1);
        assert_eq!(cleaned.column(Table::ORIGIN).unwrap().values, vec![Value::from("Jan")]);
    }

    #[test]
    fn origin_alone_does_not_keep_a_blank_row() {
        let table = Table::new(vec![column("A", &["x", ""]), column(Table::ORIGIN, &["S1", "S1"])]);
        assert_eq!(clean(&table).row_count(), 1);
    }

    #[test]
    fn keeps_origin_of_empty_table() {
        let table = Table::new(vec![column("A", &[""]), column(Table::ORIGIN, &["S1"])]);
        let cleaned = clean(&table);
        assert_eq!(cleaned.column_names(), vec!["Origin"]);
        assert_eq!(cleaned.row_count(), 0);
    }
}

use crate::settings::Settings;
use crate::table::RawGrid;
use tracing::debug;

/// Locates the row of `grid` holding the column labels.
///
/// The densest of the first `header_search_rows` rows wins, first occurrence on
/// ties. When even the densest row has at most one populated cell, the first row
/// whose upper-cased text contains a header keyword is used instead, and row 0
/// when there is none.
pub fn locate(grid: &RawGrid, settings: &Settings) -> usize {
    let window = settings.header_search_rows.min(grid.row_count());

    let mut best_row = 0usize;
    let mut best_count = 0usize;
    for row in 0..window {
        let count = grid.populated(row);
        if count > best_count {
            best_row = row;
            best_count = count;
        }
    }
    if best_count > 1 {
        return best_row;
    }

    let keyword_row = (0..window).find(|&row| {
        let text = grid.rows()[row]
            .iter()
            .map(|value| value.to_string().to_uppercase())
            .collect::<Vec<_>>()
            .join(" ");
        settings.header_keywords.iter().any(|keyword| text.contains(&keyword.to_uppercase()))
    });
    debug!("No multi-column header row, keyword fallback gives {:?}", keyword_row);
    keyword_row.unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_row_above_labels() {
        let grid = RawGrid::from(vec![
            vec!["Relatório Mensal", "", "", "", "", ""],
            vec!["DATA", "CLIENTE", "PRODUTO", "QTD", "VALOR", "STATUS"],
            vec!["01/02/2024", "Ana", "Caneta", "2", "10,00", "Pago"],
        ]);
        assert_eq!(locate(&grid, &Settings::default()), 1);
    }

    #[test]
    fn first_densest_row_wins() {
        let grid = RawGrid::from(vec![
            vec!["a", "b", ""],
            vec!["c", "d", ""],
            vec!["", "", ""],
        ]);
        assert_eq!(locate(&grid, &Settings::default()), 0);
    }

    #[test]
    fn single_column_sheet_uses_keywords() {
        let grid = RawGrid::from(vec![
            vec!["Exportado em março"],
            vec!["Valor"],
            vec!["10"],
        ]);
        assert_eq!(locate(&grid, &Settings::default()), 1);
    }

    #[test]
    fn keywords_match_in_any_case() {
        let grid = RawGrid::from(vec![
            vec!["Exportado"],
            vec!["Valor"],
            vec!["10"],
        ]);
        let settings = Settings::from_json(r#"{"header_keywords": ["valor"]}"#).unwrap();
        assert_eq!(locate(&grid, &settings), 1);
    }

    #[test]
    fn degenerate_grids_give_row_zero() {
        assert_eq!(locate(&RawGrid::default(), &Settings::default()), 0);
        assert_eq!(locate(&RawGrid::from(vec![vec!["only"]]), &Settings::default()), 0);
        assert_eq!(locate(&RawGrid::from(vec![vec![""], vec!["x"]]), &Settings::default()), 0);
    }

    #[test]
    fn search_is_bounded() {
        let mut rows = vec![vec!["title", ""]; 25];
        rows.push(vec!["A", "B"]);
        let settings = Settings::default();
        assert_eq!(locate(&RawGrid::from(rows), &settings), 0);
    }
}

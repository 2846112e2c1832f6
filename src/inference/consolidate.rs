use crate::error::InsightError;
use crate::inference::header;
use crate::settings::Settings;
use crate::table::Column;
use crate::table::RawGrid;
use crate::table::Table;
use crate::table::Value;
use std::collections::HashMap;
use std::collections::HashSet;
use tracing::info;
use tracing::warn;

/// Prefix given to label-less columns by common spreadsheet exporters.
const UNNAMED_PREFIX: &str = "unnamed";

/// Header texts that denote a missing label.
const PLACEHOLDER_NAMES: &[&str] = &["nan", "none"];

/// Columns of one sheet: grid column index and final name.
struct SheetLayout {
    header_index: usize,
    columns: Vec<(usize, String)>,
}

/// Consolidates the sheets of upload `name` into a single table with an origin column.
///
/// Each sheet gets its own header row; columns are unioned by name across sheets,
/// a column absent from a sheet reading as missing for that sheet's rows.
/// Fails with [`InsightError::EmptyResult`] when no sheet has a usable column.
pub fn consolidate(name: &str, sheets: &[(String, RawGrid)], settings: &Settings) -> Result<Table, InsightError> {
    let mut union = Vec::<String>::new();
    let mut parts = Vec::<(HashMap<String, Vec<Value>>, usize)>::new();

    for (sheet_name, grid) in sheets {
        if grid.is_empty() {
            warn!("Skipping empty sheet '{}'", sheet_name);
            continue;
        }
        let layout = match layout(sheet_name, grid, settings) {
            Some(layout) => layout,
            None => {
                warn!("Skipping sheet '{}': no valid column names", sheet_name);
                continue;
            }
        };
        info!("Sheet '{}': header at row {}", sheet_name, layout.header_index);

        let mut values = layout.columns
            .iter()
            .map(|(_, column_name)| (column_name.to_owned(), Vec::new()))
            .collect::<HashMap<String, Vec<Value>>>();
        let mut row_count = 0usize;
        for row in (layout.header_index + 1)..grid.row_count() {
            let is_blank = layout.columns.iter().all(|(col, _)| grid.get(row, *col).is_missing());
            if is_blank {
                continue;
            }
            for (col, column_name) in &layout.columns {
                if let Some(column) = values.get_mut(column_name) {
                    column.push(grid.get(row, *col).clone());
                }
            }
            row_count += 1;
        }
        values.insert(Table::ORIGIN.to_owned(), vec![Value::from(sheet_name.as_str()); row_count]);

        for (_, column_name) in &layout.columns {
            if !union.contains(column_name) {
                union.push(column_name.to_owned());
            }
        }
        parts.push((values, row_count));
    }

    if parts.is_empty() {
        Err(InsightError::EmptyResult { name: name.to_owned() })?
    }

    union.push(Table::ORIGIN.to_owned());
    let columns = union
        .iter()
        .map(|column_name| {
            let mut values = Vec::new();
            for (part, row_count) in &mut parts {
                match part.remove(column_name) {
                    Some(part_values) => values.extend(part_values),
                    None => values.resize(values.len() + *row_count, Value::Missing),
                }
            }
            Column::new(column_name, values)
        })
        .collect::<Vec<_>>();
    let table = Table::new(columns);
    info!("Consolidated {} sheet(s) into {} rows, {} columns", parts.len(), table.row_count(), table.columns().len());
    Ok(table)
}

/// Picks the header row of a sheet and names its valid columns, or `None` when none is valid.
fn layout(sheet_name: &str, grid: &RawGrid, settings: &Settings) -> Option<SheetLayout> {
    let header_index = header::locate(grid, settings);
    let width = grid.rows().get(header_index).map(Vec::len).unwrap_or(0);

    let mut seen = HashSet::<String>::new();
    let mut columns = Vec::new();
    for col in 0..width {
        let label = grid.get(header_index, col).to_string().trim().to_owned();
        if !is_valid_name(&label) {
            continue;
        }
        if Table::is_origin(&label) {
            warn!("Sheet '{}': source column '{}' replaced by the origin tag", sheet_name, label);
            continue;
        }
        let name = unique_name(&label, &seen);
        seen.insert(name.to_owned());
        columns.push((col, name));
    }

    if columns.is_empty() {
        None
    } else {
        Some(SheetLayout { header_index, columns })
    }
}

fn is_valid_name(label: &str) -> bool {
    let lowered = label.to_lowercase();
    !label.is_empty()
        && !PLACEHOLDER_NAMES.contains(&lowered.as_str())
        && !lowered.starts_with(UNNAMED_PREFIX)
}

/// Suffixes `.1`, `.2`, … until the name is unused.
fn unique_name(label: &str, seen: &HashSet<String>) -> String {
    if !seen.contains(label) {
        return label.to_owned();
    }
    (1..)
        .map(|suffix| format!("{label}.{suffix}"))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| label.to_owned())
}

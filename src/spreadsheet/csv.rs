//! Delimited text uploads (.csv, .tsv, .txt)
use crate::error::ReadError;
use crate::helpers::text;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Delimiters tried by the sniffer, in tie-break order.
/// Semicolon leads because decimal-comma exports are semicolon-delimited.
const DELIMITER_CANDIDATES: &[u8] = b";,\t|";

/// Non-empty lines inspected by the sniffer.
const SNIFF_LINES: usize = 20;

const DEFAULT_DELIMITER: u8 = b',';

/// A delimited text upload, decoded eagerly. It reads as a single sheet named after the file stem.
pub(crate) struct CsvSpreadsheet {
    pub(crate) name: String,
    text: String,
    delimiter: u8,
}

impl CsvSpreadsheet {
    pub(crate) fn open(file_name: &str, bytes: &[u8]) -> Result<Self, ReadError> {
        let (text, encoding) = text::decode(bytes)?;
        let delimiter = sniff_delimiter(&text);
        debug!("{}: decoded as {}, delimiter {:?}", file_name, encoding.name(), delimiter as char);
        Ok(CsvSpreadsheet {
            name: file_name.to_owned(),
            text,
            delimiter,
        })
    }

    fn sheet_name(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.to_owned())
    }
}

impl Spreadsheet for CsvSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn load_shared_strings(&mut self) -> Result<Vec<String>, ReadError> {
        Ok(Vec::new())
    }

    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, ReadError> {
        let sheet_name = self.sheet_name();
        if criteria.sheet_limit_reached(0) || !criteria.accept(&sheet_name) {
            return Ok(Vec::new());
        }

        let mut sheet = Sheet::new(&self.name, &sheet_name, criteria.rows_limit);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(self.text.as_bytes());
        for (row, result) in reader.records().enumerate() {
            if sheet.after_row_upper_bound(row) {
                break;
            }
            let record = result?;
            for (col, field) in record.iter().enumerate() {
                if !field.trim().is_empty() {
                    sheet.push(Cell {
                        row,
                        col,
                        kind: CellType::InlineString,
                        value: field.to_owned(),
                    });
                }
            }
        }
        Ok(vec![sheet])
    }
}

/// Picks the field delimiter from the first non-empty lines of `text`.
///
/// For each candidate, the per-line count outside double quotes is computed and
/// its most common non-zero value found; the candidate whose modal count is shared
/// by the most lines wins.
pub(crate) fn sniff_delimiter(text: &str) -> u8 {
    let lines = text.lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .collect::<Vec<_>>();

    let mut best = None::<(u8, usize)>;
    for &candidate in DELIMITER_CANDIDATES {
        let mut frequencies = HashMap::<usize, usize>::new();
        for line in &lines {
            let count = count_outside_quotes(line, candidate);
            if count > 0 {
                *frequencies.entry(count).or_default() += 1;
            }
        }
        let support = frequencies.values().copied().max().unwrap_or(0);
        if support > best.map(|(_, support)| support).unwrap_or(0) {
            best = Some((candidate, support));
        }
    }
    best.map(|(delimiter, _)| delimiter).unwrap_or(DEFAULT_DELIMITER)
}

fn count_outside_quotes(line: &str, delimiter: u8) -> usize {
    let mut quoted = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            quoted = !quoted;
        } else if byte == delimiter && !quoted {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn sniffs_semicolon_despite_decimal_commas() {
        let text = "Relatório\nDATA;CLIENTE;VALOR\n01/02/2024;Ana;R$ 1.234,56\n02/02/2024;Bia;R$ 99,90\n";
        assert_eq!(sniff_delimiter(text), b';');
    }

    #[test]
    fn sniffs_comma_and_ignores_quoted_delimiters() {
        let text = "name,note,value\n\"Silva; Ana\",\"a;b;c\",10\nBia,ok,20\n";
        assert_eq!(sniff_delimiter(text), b',');
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3\n"), b'\t');
        assert_eq!(sniff_delimiter("a|b\n1|2\n"), b'|');
    }

    #[test]
    fn sniff_falls_back_to_comma() {
        assert_eq!(sniff_delimiter("single column\nvalues\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn reads_one_sheet_named_after_stem() {
        let bytes = "A;B\n1;\n;x\n".as_bytes();
        let mut spreadsheet = CsvSpreadsheet::open("vendas 2024.csv", bytes).unwrap();
        let sheets = spreadsheet.read_sheets(&Criteria::default()).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, "vendas 2024");

        let grid = sheets[0].to_grid(&Criteria::default(), &[]).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.get(1, 0), &Value::from("1"));
        assert_eq!(grid.get(1, 1), &Value::Missing);
        assert_eq!(grid.get(2, 1), &Value::from("x"));
    }

    #[test]
    fn rejects_empty_uploads() {
        assert!(CsvSpreadsheet::open("empty.csv", &[]).is_err());
    }
}

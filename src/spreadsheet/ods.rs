use crate::error::ReadError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::excel::WorkbookArchive;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::io::Cursor;
use thiserror::Error;
use zip::ZipArchive;

/// ODS file MIME type identifier
const MIME_TYPE: &[u8] = b"application/vnd.oasis.opendocument.spreadsheet";
const SPREADSHEET: QName = QName(b"office:spreadsheet");
const TABLE: QName = QName(b"table:table");
const TABLE_ROW: QName = QName(b"table:table-row");
const TABLE_CELL: QName = QName(b"table:table-cell");
/// Covered cells of a merged range
const TABLE_COVERED_CELL: QName = QName(b"table:covered-table-cell");
/// Cell comments
const ANNOTATION: QName = QName(b"office:annotation");
const PARAGRAPH: QName = QName(b"text:p");
/// Run of spaces (`text:c` repetitions)
const STRING: QName = QName(b"text:s");

#[derive(Error, Debug)]
pub(crate) enum OdsError {
    #[error("Invalid ODS MIME type")]
    MimeTypeError,

    #[error("Missing sheet name")]
    SheetNameError,
}

/// OpenDocument spreadsheet (.ods) held in memory
pub(crate) struct OdsSpreadsheet {
    pub(crate) name: String,
    zip: WorkbookArchive,
}

impl OdsSpreadsheet {
    /// Opens an ODS document, validating its MIME type and rejecting encrypted content.
    pub(crate) fn open(file_name: &str, bytes: Vec<u8>) -> Result<Self, ReadError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))?;
        check_mime(&mut zip)?;
        if is_password_protected(&mut zip)? {
            Err(SpreadsheetError::SpreadsheetPasswordProtectedError(file_name.to_owned()))?;
        }
        Ok(OdsSpreadsheet {
            name: file_name.to_owned(),
            zip,
        })
    }
}

impl Spreadsheet for OdsSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// ODS stores strings inline, there is no shared string table.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, ReadError> {
        Ok(Vec::new())
    }

    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, ReadError> {
        let mut sheets = Vec::<Sheet>::new();
        let mut sheet_name = String::new();
        let mut reader = self.zip
            .xml_reader("content.xml")?
            .ok_or_else(|| SpreadsheetError::FileError("content.xml".to_owned()))?;
        'sheets: loop {
            let mut found = false;
            match_xml_events!(reader => {
                Event::End(event) if event.name() == SPREADSHEET => break 'sheets,
                Event::Start(event) if event.name() == TABLE => {
                    let table_name = event.get_attribute_value("table:name")?
                        .ok_or(OdsError::SheetNameError)?;
                    sheet_name.clear();
                    sheet_name.push_str(&table_name);
                    if criteria.sheet_limit_reached(sheets.len()) {
                        break 'sheets;
                    } else if criteria.accept(&sheet_name) {
                        found = true;
                        break;
                    }
                }
            });
            if !found {
                break;
            }
            let mut sheet = Sheet::new(&self.name, &sheet_name, criteria.rows_limit);

            let mut row = 0usize;
            let mut col = 0usize;
            let mut row_count = 0usize;
            let mut col_count = 0usize;
            let mut kind = CellType::default();
            let mut value = String::new();
            // inside a string cell's paragraphs
            let mut element_context = false;
            let mut comment_context = false;
            match_xml_events!(reader => {
                Event::End(event) if event.name() == TABLE => break,
                Event::Start(event) if event.name() == TABLE_ROW => {
                    row_count = event.parse_attribute_value("table:number-rows-repeated")?.unwrap_or(1);
                    col = 0;
                }
                Event::End(event) if event.name() == TABLE_ROW => {
                    row += row_count;
                }
                Event::Start(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                    value.clear();
                    col_count = event.parse_attribute_value::<usize>("table:number-columns-repeated")?.unwrap_or(1);
                    let value_type = event.get_attribute_value("office:value-type")?;
                    kind = match value_type.as_deref() {
                        Some("boolean") => CellType::Boolean,
                        Some("date") => CellType::IsoDateTime,
                        Some("time") => CellType::IsoDuration,
                        Some("string") => {
                            let is_error = event.get_attribute_value("calcext:value-type")?
                                .map(|cow| cow == "error")
                                .unwrap_or(false);
                            match (is_error, criteria.error_as_null) {
                                (true, true) => CellType::Empty,
                                (true, false) => CellType::Error,
                                (false, _) => CellType::InlineString,
                            }
                        }
                        Some(_) => CellType::Number,
                        None => CellType::Empty,
                    };

                    let attribute = match value_type.as_deref() {
                        Some("string") => {
                            element_context = kind != CellType::Empty;
                            None
                        }
                        Some("boolean") => Some("office:boolean-value"),
                        Some("date") => Some("office:date-value"),
                        Some("time") => Some("office:time-value"),
                        Some(_) => Some("office:value"),
                        None => None,
                    };
                    if let Some(data) = attribute.map(|name| event.get_attribute_value(name)).transpose()?.flatten() {
                        value.push_str(&data);
                    }
                }
                Event::End(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                    if kind == CellType::Error {
                        Err(SpreadsheetError::CellValueError(
                            sheet.file_name.to_owned(),
                            sheet.name.to_owned(),
                            index_to_reference(row, col),
                            value.to_owned(),
                        ))?
                    }
                    if kind != CellType::Empty && !value.is_empty() {
                        'repeat: for row_offset in 0..row_count {
                            for col_offset in 0..col_count {
                                let row_number = row + row_offset;
                                if sheet.after_row_upper_bound(row_number) {
                                    break 'repeat;
                                }
                                sheet.push(Cell {
                                    row: row_number,
                                    col: col + col_offset,
                                    kind,
                                    value: value.to_owned(),
                                });
                            }
                        }
                    }
                    col += col_count;
                    kind = CellType::Empty;
                    element_context = false;
                    comment_context = false;
                }
                Event::Start(event) if element_context && event.name() == ANNOTATION => comment_context = true,
                Event::End(event) if element_context && comment_context && event.name() == ANNOTATION => comment_context = false,
                Event::Start(event) if element_context && !comment_context && event.name() == PARAGRAPH => {
                    if !value.is_empty() {
                        value.push('\n');
                    }
                }
                Event::Start(event) if element_context && !comment_context && event.name() == STRING => {
                    let count = event.parse_attribute_value("text:c")?.unwrap_or(1);
                    for _ in 0..count {
                        value.push(' ');
                    }
                }
                Event::Text(event) if element_context && !comment_context => value.push_bytes_text(&event)?,
                Event::GeneralRef(event) if element_context && !comment_context => value.push_bytes_ref(&event)?,
            });
            sheets.push(sheet);
        }

        Ok(sheets)
    }
}

/// Validates the `mimetype` part when present.
fn check_mime(zip: &mut WorkbookArchive) -> Result<(), ReadError> {
    if let Some(bytes) = zip.read_bytes("mimetype")? {
        if !bytes.starts_with(MIME_TYPE) {
            Err(OdsError::MimeTypeError)?;
        }
    }
    Ok(())
}

/// Encrypted documents declare `manifest:encryption-data` on their file entries.
fn is_password_protected(zip: &mut WorkbookArchive) -> Result<bool, ReadError> {
    let mut reader = match zip.xml_reader("META-INF/manifest.xml")? {
        Some(reader) => reader,
        None => return Ok(false),
    };
    let mut in_file_entry = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == QName(b"manifest:file-entry") => in_file_entry = true,
        Event::End(event) if event.name() == QName(b"manifest:file-entry") => in_file_entry = false,
        Event::Start(event) if in_file_entry && event.name() == QName(b"manifest:encryption-data") => {
            return Ok(true);
        }
    });
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;
    use chrono::NaiveDate;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;
    use zip::ZipWriter;

    const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:calcext="urn:org:documentfoundation:names:experimental:calc:xmlns:calcext:1.0">
<office:body><office:spreadsheet>
<table:table table:name="Janeiro">
<table:table-row><table:table-cell office:value-type="string"><text:p>DATA</text:p></table:table-cell><table:table-cell office:value-type="string"><text:p>Valor<text:s text:c="2"/>R$</text:p><office:annotation><text:p>nota</text:p></office:annotation></table:table-cell></table:table-row>
<table:table-row table:number-rows-repeated="2"><table:table-cell office:value-type="date" office:date-value="2024-01-15"/><table:table-cell office:value-type="float" office:value="10.5"/></table:table-row>
<table:table-row><table:table-cell table:number-columns-repeated="1024"/></table:table-row>
<table:table-row><table:table-cell office:value-type="string" calcext:value-type="error"><text:p>#DIV/0!</text:p></table:table-cell><table:table-cell office:value-type="boolean" office:boolean-value="true"/></table:table-row>
</table:table>
<table:table table:name="Fevereiro">
<table:table-row><table:table-cell office:value-type="string"><text:p>P&amp;D</text:p></table:table-cell></table:table-row>
</table:table>
</office:spreadsheet></office:body></office:document-content>"#;

    fn document(manifest: Option<&str>) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file("mimetype", options).unwrap();
        writer.write_all(MIME_TYPE).unwrap();
        writer.start_file("content.xml", options).unwrap();
        writer.write_all(CONTENT.as_bytes()).unwrap();
        if let Some(manifest) = manifest {
            writer.start_file("META-INF/manifest.xml", options).unwrap();
            writer.write_all(manifest.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn reads_typed_cells_and_repeated_rows() {
        let mut spreadsheet = OdsSpreadsheet::open("vendas.ods", document(None)).unwrap();
        let sheets = spreadsheet.read_sheets(&Criteria::default()).unwrap();
        assert_eq!(sheets.len(), 2);

        let grid = sheets[0].to_grid(&Criteria::default(), &[]).unwrap();
        assert_eq!(grid.row_count(), 5);
        assert_eq!(grid.get(0, 1), &Value::from("Valor  R$"));
        assert_eq!(grid.get(2, 0), &Value::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
        assert_eq!(grid.get(2, 1), &Value::Number(10.5));
        assert_eq!(grid.get(3, 0), &Value::Missing);
        assert_eq!(grid.get(4, 0), &Value::Missing);
        assert_eq!(grid.get(4, 1), &Value::Boolean(true));

        let grid = sheets[1].to_grid(&Criteria::default(), &[]).unwrap();
        assert_eq!(grid.get(0, 0), &Value::from("P&D"));
    }

    #[test]
    fn filters_sheets() {
        let mut spreadsheet = OdsSpreadsheet::open("vendas.ods", document(None)).unwrap();
        let criteria = Criteria::default().with_sheet_patterns(&["Fev*"]);
        let sheets = spreadsheet.read_sheets(&criteria).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, "Fevereiro");
    }

    #[test]
    fn error_cells_fail_without_error_as_null() {
        let mut spreadsheet = OdsSpreadsheet::open("vendas.ods", document(None)).unwrap();
        let criteria = Criteria { error_as_null: false, ..Criteria::default() };
        assert!(spreadsheet.read_sheets(&criteria).is_err());
    }

    #[test]
    fn rejects_encrypted_documents() {
        let manifest = r#"<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0">
<manifest:file-entry manifest:full-path="content.xml"><manifest:encryption-data manifest:checksum-type="SHA1"/></manifest:file-entry>
</manifest:manifest>"#;
        assert!(OdsSpreadsheet::open("vendas.ods", document(Some(manifest))).is_err());
    }
}

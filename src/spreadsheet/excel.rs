//! Microsoft Office Excel Helpers
use crate::error::ReadError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;
use zip::ZipArchive;

/// XML tag name for relationship elements in Excel files
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Signature of the compound file container used by encrypted and legacy workbooks
const CFB_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// In-memory workbook archive.
pub(crate) type WorkbookArchive = ZipArchive<Cursor<Vec<u8>>>;

/// Opens an Excel workbook held in memory and loads its structure.
///
/// Returns the archive, the number format of each cell style, and the
/// (name, zip path) pair of each worksheet in workbook order.
pub(super) fn open<W, F>(file_name: &str, bytes: Vec<u8>, load_workbook: W, load_number_formats: F) -> Result<(
    WorkbookArchive,
    Vec<CellType>,
    Vec<(String, String)>
), ReadError>
where
    W: Fn(&mut WorkbookArchive) -> Result<(Vec<(String, String)>, bool), ReadError>,
    F: Fn(&mut WorkbookArchive, bool) -> Result<Vec<CellType>, ReadError>,
{
    if is_compound_file(&bytes) {
        Err(SpreadsheetError::SpreadsheetPasswordProtectedError(file_name.to_owned()))?;
    }

    let mut zip = ZipArchive::new(Cursor::new(bytes))?;
    let (sheets, is_1904) = load_workbook(&mut zip)?;
    if sheets.is_empty() {
        Err(SpreadsheetError::SpreadsheetEmptyError(file_name.to_owned()))?
    }

    let number_formats = load_number_formats(&mut zip, is_1904)?;
    Ok((zip, number_formats, sheets))
}

/// Loads the worksheet relationships of a workbook, keyed by relationship id.
pub(super) fn load_relationships(zip: &mut WorkbookArchive, path: &str) -> Result<HashMap<String, String>, ReadError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only process worksheet relationships
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Maps each cell style's format id to a cell type, custom formats first.
pub(super) fn load_number_formats(format_indexes: Vec<String>, custom_formats: HashMap<String, CellType>, is_1904: bool) -> Vec<CellType> {
    format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, is_1904))
                .unwrap_or(CellType::Number)
        })
        .collect()
}

/// Resolves a relationship target to its path inside the archive.
pub(crate) fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(absolute) = path.strip_prefix('/') {
        absolute.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Encrypted OOXML packages and legacy BIFF workbooks are compound files, not zips.
pub(crate) fn is_compound_file(bytes: &[u8]) -> bool {
    bytes.starts_with(CFB_SIGNATURE)
}

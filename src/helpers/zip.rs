//! ZIP archive helpers for the Office Open XML (.xlsx) and OpenDocument (.ods) containers.

use crate::error::ReadError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

/// Part lookup on ZIP archives.
pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Gets a part by name, case-insensitively and path separator agnostic.
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, ReadError>;

    /// Creates an XML reader over a part.
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, ReadError>;

    /// Reads a small part fully into memory.
    fn read_bytes(&mut self, name: &str) -> Result<Option<Vec<u8>>, ReadError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, ReadError> {
        let pattern = name.replace('\\', "/");
        let path = self.file_names()
            .find(|file_name| pattern.eq_ignore_ascii_case(file_name))
            .map(|file_name| file_name.to_owned());
        match path.map(|file_name| self.by_name(&file_name)).transpose() {
            Ok(file) => Ok(file),
            Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, ReadError> {
        Ok(self.file(name)?.map(|file| XmlReader::new(BufReader::new(file))))
    }

    fn read_bytes(&mut self, name: &str) -> Result<Option<Vec<u8>>, ReadError> {
        match self.file(name)? {
            Some(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)?;
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }
}

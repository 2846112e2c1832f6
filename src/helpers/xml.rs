//! XML parsing utilities shared by the XLSX and ODS readers.
//! Provides a pull-reader wrapper plus helper traits for attributes and text content.

use crate::error::ReadError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/// Errors specific to XML parsing operations
#[derive(Error, Debug)]
pub(crate) enum XmlError {
    #[error("Unknown XML entity '&{0};'")]
    EntityError(String),

    #[error("Invalid value '{1}' for attribute '{0}'")]
    AttributeValueError(String, String),
}

/// Pull reader over a workbook part, configured for lenient spreadsheet markup.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        // <c/> and <c></c> must produce the same Start/End pair
        config.expand_empty_elements = true;
        config.trim_text(false);

        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Reads the next event, `None` at end of document.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, ReadError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer)? {
            Event::Eof => Ok(None),
            event => Ok(Some(event)),
        }
    }
}

/// Attribute access on start tags.
pub(crate) trait XmlNodeHelper<'a> {
    /// Gets an unescaped attribute value by qualified name.
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ReadError>;

    /// Parses an attribute value to the specified type.
    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, ReadError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ReadError> {
        match self.try_get_attribute(name)? {
            Some(attribute) => Ok(Some(attribute.unescape_value()?)),
            None => Ok(None),
        }
    }

    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, ReadError> {
        match self.get_attribute_value(name)? {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| XmlError::AttributeValueError(name.to_owned(), value.to_string()).into()),
            None => Ok(None),
        }
    }
}

/// Accumulates text content from text and entity-reference events.
pub(crate) trait XmlTextContextHelper {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), ReadError>;

    /// Appends a resolved entity or character reference (`&amp;`, `&#10;`, `&#x20AC;`).
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), ReadError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), ReadError> {
        self.push_str(&text.xml_content()?);
        Ok(())
    }

    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), ReadError> {
        let raw = bytes.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16)?,
                None => number.parse::<u32>()?,
            };
            if let Some(character) = char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::EntityError(raw.to_string()))?;
        }
        Ok(())
    }
}

/// Loops over the events of an [`XmlReader`], dispatching to the given match arms.
/// Unmatched events are ignored; the loop ends at end of document.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(event) = $reader.next()? {
            match event {
                $($arms)*
                _ => (),
            }
        }
    };
}

//! Byte-to-text decoding for delimited uploads of unknown encoding.

use encoding_rs::Encoding;
use encoding_rs::UTF_8;
use encoding_rs::WINDOWS_1252;
use thiserror::Error;
use tracing::warn;

/// Encodings tried, in order, when the content carries no byte order mark.
const FALLBACK_ENCODINGS: &[&Encoding] = &[UTF_8, WINDOWS_1252];

#[derive(Error, Debug)]
pub(crate) enum TextError {
    #[error("File is empty")]
    EmptyContent,

    #[error("Cannot decode content as any of: {0}")]
    UndecodableContent(String),
}

/// Decodes `bytes` to text, returning the text and the encoding that succeeded.
///
/// A byte order mark wins; otherwise strict decoding is attempted with each
/// fallback encoding in turn.
pub(crate) fn decode(bytes: &[u8]) -> Result<(String, &'static Encoding), TextError> {
    if bytes.is_empty() {
        Err(TextError::EmptyContent)?
    }
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return Ok((text.into_owned(), encoding));
    }
    for (index, encoding) in FALLBACK_ENCODINGS.iter().enumerate() {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            if index > 0 {
                warn!("Content is not valid {}, decoded as {}", FALLBACK_ENCODINGS[0].name(), encoding.name());
            }
            return Ok((text.into_owned(), encoding));
        }
    }
    let names = FALLBACK_ENCODINGS
        .iter()
        .map(|encoding| encoding.name())
        .collect::<Vec<_>>()
        .join(", ");
    Err(TextError::UndecodableContent(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_utf8() {
        let (text, encoding) = decode("Preço;Região".as_bytes()).unwrap();
        assert_eq!(text, "Preço;Região");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn decode_strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"DATA;VALOR");
        let (text, _) = decode(&bytes).unwrap();
        assert_eq!(text, "DATA;VALOR");
    }

    #[test]
    fn decode_falls_back_to_latin() {
        // "Preço" in Windows-1252
        let bytes = [0x50, 0x72, 0x65, 0xE7, 0x6F];
        let (text, encoding) = decode(&bytes).unwrap();
        assert_eq!(text, "Preço");
        assert_eq!(encoding, WINDOWS_1252);
    }

    #[test]
    fn decode_rejects_empty_content() {
        assert!(matches!(decode(&[]), Err(TextError::EmptyContent)));
    }
}

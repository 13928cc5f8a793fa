//! Character string types used in distinguished names and general names.

use std::fmt::{self, Display};

use der::{Node, Tag};
use kensa::decoder::{DecodableFrom, Decoder};

use crate::error::Error;

/// A decoded character string, whatever its ASN.1 string type was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryString {
    tag: Tag,
    value: String,
}

impl DirectoryString {
    /// The string type it was encoded with.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// Decodes `data` according to the string type `tag`.
    pub fn from_tagged(tag: Tag, data: &[u8]) -> Result<Self, Error> {
        let value = match tag {
            Tag::UTF8_STRING => decode_utf8(data)?,
            Tag::PRINTABLE_STRING => decode_printable(data)?,
            Tag::IA5_STRING => decode_ia5(data)?,
            // T.61 is approximated as Latin-1, which is what issuers put in it
            Tag::TELETEX_STRING => data.iter().map(|&b| b as char).collect(),
            Tag::BMP_STRING => decode_bmp(data)?,
            Tag::UNIVERSAL_STRING => decode_universal(data)?,
            actual => {
                return Err(Error::UnexpectedTag {
                    expected: "character string",
                    actual,
                });
            }
        };
        Ok(DirectoryString { tag, value })
    }
}

impl Display for DirectoryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

fn decode_utf8(data: &[u8]) -> Result<String, Error> {
    String::from_utf8(data.to_vec()).map_err(|_| Error::Utf8StringInvalidUtf8)
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b" '()+,-./:=?".contains(&b)
}

fn decode_printable(data: &[u8]) -> Result<String, Error> {
    // Real issuers routinely put '*', '@' or '&' here, so any ASCII is
    // accepted and only 8-bit data is refused.
    if !data.is_ascii() {
        return Err(Error::PrintableStringInvalidEncoding);
    }
    if !data.iter().all(|b| is_printable(*b)) {
        tracing::trace!("PrintableString contains characters outside its alphabet");
    }
    Ok(data.iter().map(|&b| b as char).collect())
}

fn decode_ia5(data: &[u8]) -> Result<String, Error> {
    if !data.is_ascii() {
        return Err(Error::Ia5StringInvalidEncoding);
    }
    Ok(data.iter().map(|&b| b as char).collect())
}

fn decode_bmp(data: &[u8]) -> Result<String, Error> {
    if data.len() % 2 != 0 {
        return Err(Error::BmpStringOddLength(data.len()));
    }
    let units = data
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| Error::BmpStringInvalidCodePoint)
}

fn decode_universal(data: &[u8]) -> Result<String, Error> {
    if data.len() % 4 != 0 {
        return Err(Error::UniversalStringInvalidLength(data.len()));
    }
    data.chunks_exact(4)
        .map(|quad| {
            let n = u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]);
            char::from_u32(n).ok_or(Error::UniversalStringInvalidCodePoint(n))
        })
        .collect()
}

impl<'a> DecodableFrom<Node<'a>> for DirectoryString {}

impl<'a> Decoder<Node<'a>, DirectoryString> for Node<'a> {
    type Error = Error;

    fn decode(&self) -> Result<DirectoryString, Self::Error> {
        DirectoryString::from_tagged(self.tag(), self.value())
    }
}

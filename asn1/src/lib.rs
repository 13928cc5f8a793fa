//! Typed ASN.1 values decoded from [`der::Node`]s.
//!
//! Each type implements `Decoder<Node, T>`, so a node is converted by
//! annotating the target:
//!
//! ```
//! use asn1::ObjectIdentifier;
//! use der::Der;
//! use kensa::decoder::Decoder;
//!
//! let der = Der::parse(&[0x06, 0x03, 0x55, 0x04, 0x03]).unwrap();
//! let oid: ObjectIdentifier = der.root().unwrap().decode().unwrap();
//! assert_eq!("2.5.4.3", oid.to_string());
//! ```

use der::{Node, Tag};
use kensa::decoder::{DecodableFrom, Decoder};

mod bit_string;
pub mod error;
mod integer;
mod oid;
mod string;
mod time;

pub use bit_string::BitString;
use error::Error;
pub use integer::Integer;
pub use oid::ObjectIdentifier;
pub use string::DirectoryString;
pub use time::Time;

/// Fails with [`Error::UnexpectedTag`] unless `node` carries `tag`.
pub fn expect_tag(node: &Node<'_>, tag: Tag, name: &'static str) -> Result<(), Error> {
    if node.tag() == tag {
        Ok(())
    } else {
        Err(Error::UnexpectedTag {
            expected: name,
            actual: node.tag(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boolean(pub bool);

impl TryFrom<&[u8]> for Boolean {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        // DER allows exactly 0x00 and 0xff
        match value {
            [0x00] => Ok(Boolean(false)),
            [0xff] => Ok(Boolean(true)),
            _ => Err(Error::InvalidBoolean),
        }
    }
}

impl From<Boolean> for bool {
    fn from(value: Boolean) -> Self {
        value.0
    }
}

impl<'a> DecodableFrom<Node<'a>> for Boolean {}

impl<'a> Decoder<Node<'a>, Boolean> for Node<'a> {
    type Error = Error;

    fn decode(&self) -> Result<Boolean, Self::Error> {
        expect_tag(self, Tag::BOOLEAN, "BOOLEAN")?;
        Boolean::try_from(self.value())
    }
}

#[cfg(test)]
mod tests {
    use der::{Der, Tag};
    use kensa::decoder::Decoder;
    use rstest::rstest;

    use crate::error::Error;
    use crate::{Boolean, expect_tag};

    #[rstest(input, expected,
        case(vec![0x01, 0x01, 0xff], Ok(Boolean(true))),
        case(vec![0x01, 0x01, 0x00], Ok(Boolean(false))),
        case(vec![0x01, 0x01, 0x01], Err(Error::InvalidBoolean)),
        case(vec![0x01, 0x02, 0x00, 0x00], Err(Error::InvalidBoolean)),
        case(vec![0x01, 0x00], Err(Error::InvalidBoolean)),
        case(vec![0x02, 0x01, 0xff], Err(Error::UnexpectedTag { expected: "BOOLEAN", actual: Tag::INTEGER }))
    )]
    fn test_decode_boolean(input: Vec<u8>, expected: Result<Boolean, Error>) {
        let der = Der::parse(&input).unwrap();
        let result: Result<Boolean, Error> = der.root().unwrap().decode();
        assert_eq!(expected, result);
    }

    #[test]
    fn test_expect_tag() {
        let der = Der::parse(&[0x30, 0x00]).unwrap();
        let node = der.root().unwrap();
        assert!(expect_tag(&node, Tag::SEQUENCE, "SEQUENCE").is_ok());
        assert_eq!(
            Err(Error::UnexpectedTag {
                expected: "SET",
                actual: Tag::SEQUENCE
            }),
            expect_tag(&node, Tag::SET, "SET")
        );
    }
}

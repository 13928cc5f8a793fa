use asn1::{Boolean, Integer};
use der::{Der, Tag};
use kensa::decoder::Decoder;

use super::error::{Error, ExtensionContext, Kind};
use super::{Extension, single_element};
use crate::oid_name::OID_BASIC_CONSTRAINTS;

/*
RFC 5280 Section 4.2.1.9
BasicConstraints ::= SEQUENCE {
    cA                      BOOLEAN DEFAULT FALSE,
    pathLenConstraint       INTEGER (0..MAX) OPTIONAL
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len_constraint: Option<u32>,
}

impl Extension for BasicConstraints {
    const OID: &'static str = OID_BASIC_CONSTRAINTS;

    fn parse(value: &[u8]) -> Result<Self, Error> {
        let der = Der::parse(value)?;
        let node = single_element(&der, Kind::BasicConstraints)?;
        if node.tag() != Tag::SEQUENCE {
            return Err(Error::ExpectedSequence(Kind::BasicConstraints));
        }

        let mut children = node.children().peekable();
        let ca = match children.next_if(|c| c.tag() == Tag::BOOLEAN) {
            Some(c) => {
                let ca: Boolean = c.decode().kind(Kind::BasicConstraints)?;
                ca.into()
            }
            None => false,
        };
        let path_len_constraint = match children.next_if(|c| c.tag() == Tag::INTEGER) {
            Some(c) => {
                let n: Integer = c.decode().kind(Kind::BasicConstraints)?;
                let n = n.to_u64().ok_or(Error::PathLenConstraintOutOfRange)?;
                Some(u32::try_from(n).map_err(|_| Error::PathLenConstraintOutOfRange)?)
            }
            None => None,
        };
        if let Some(extra) = children.next() {
            return Err(Error::TrailingElement {
                kind: Kind::BasicConstraints,
                tag: extra.tag(),
            });
        }

        Ok(BasicConstraints {
            ca,
            path_len_constraint,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::BasicConstraints;
    use crate::extensions::Extension;
    use crate::extensions::error::Error;

    #[rstest]
    #[case::empty(vec![0x30, 0x00], false, None)]
    #[case::ca(vec![0x30, 0x03, 0x01, 0x01, 0xff], true, None)]
    #[case::ca_pathlen(vec![0x30, 0x06, 0x01, 0x01, 0xff, 0x02, 0x01, 0x01], true, Some(1))]
    #[case::explicit_false(vec![0x30, 0x03, 0x01, 0x01, 0x00], false, None)]
    #[case::pathlen_only(vec![0x30, 0x03, 0x02, 0x01, 0x00], false, Some(0))]
    fn test_parse_basic_constraints(
        #[case] input: Vec<u8>,
        #[case] ca: bool,
        #[case] path_len: Option<u32>,
    ) {
        let bc = BasicConstraints::parse(&input).unwrap();
        assert_eq!(ca, bc.ca);
        assert_eq!(path_len, bc.path_len_constraint);
    }

    #[test]
    fn test_parse_basic_constraints_negative_pathlen() {
        let result = BasicConstraints::parse(&[0x30, 0x06, 0x01, 0x01, 0xff, 0x02, 0x01, 0xff]);
        assert!(matches!(result, Err(Error::PathLenConstraintOutOfRange)));
    }

    #[rstest]
    #[case::not_sequence(vec![0x31, 0x00])]
    #[case::trailing(vec![0x30, 0x05, 0x01, 0x01, 0xff, 0x05, 0x00])]
    #[case::bad_boolean(vec![0x30, 0x03, 0x01, 0x01, 0x01])]
    #[case::truncated(vec![0x30, 0x03, 0x01, 0x01])]
    fn test_parse_basic_constraints_error(#[case] input: Vec<u8>) {
        assert!(BasicConstraints::parse(&input).is_err());
    }
}

use asn1::ObjectIdentifier;
use der::{Der, Tag};
use kensa::decoder::Decoder;

use super::error::{Error, ExtensionContext, Kind};
use super::{Extension, single_element};
use crate::oid_name::{OID_EXT_KEY_USAGE, OidName};

/*
RFC 5280 Section 4.2.1.12
ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId

KeyPurposeId ::= OBJECT IDENTIFIER
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    pub purposes: Vec<ObjectIdentifier>,
}

impl ExtendedKeyUsage {
    /// Purpose names, or dotted OIDs for purposes without one.
    pub fn names(&self) -> Vec<String> {
        self.purposes.iter().map(|p| p.resolved_name()).collect()
    }
}

impl Extension for ExtendedKeyUsage {
    const OID: &'static str = OID_EXT_KEY_USAGE;

    fn parse(value: &[u8]) -> Result<Self, Error> {
        let der = Der::parse(value)?;
        let node = single_element(&der, Kind::ExtendedKeyUsage)?;
        if node.tag() != Tag::SEQUENCE {
            return Err(Error::ExpectedSequence(Kind::ExtendedKeyUsage));
        }
        let purposes = node
            .children()
            .map(|c| c.decode().kind(Kind::ExtendedKeyUsage))
            .collect::<Result<Vec<ObjectIdentifier>, Error>>()?;
        if purposes.is_empty() {
            return Err(Error::EmptySequence(Kind::ExtendedKeyUsage));
        }
        Ok(ExtendedKeyUsage { purposes })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ExtendedKeyUsage;
    use crate::extensions::Extension;

    #[rstest(input, expected,
        case(
            vec![0x30, 0x14, 0x06, 0x08, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x01, 0x06, 0x08, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x02],
            vec!["Server Authentication", "Client Authentication"]
        ),
        case(vec![0x30, 0x05, 0x06, 0x03, 0x2a, 0x03, 0x04], vec!["1.2.3.4"]),
        case(vec![0x30, 0x06, 0x06, 0x04, 0x55, 0x1d, 0x25, 0x00], vec!["Any Extended Key Usage"])
    )]
    fn test_parse_extended_key_usage(input: Vec<u8>, expected: Vec<&str>) {
        let eku = ExtendedKeyUsage::parse(&input).unwrap();
        assert_eq!(expected, eku.names());
    }

    #[rstest(input,
        case(vec![0x30, 0x00]),
        case(vec![0x31, 0x05, 0x06, 0x03, 0x2a, 0x03, 0x04]),
        case(vec![0x30, 0x03, 0x02, 0x01, 0x01])
    )]
    fn test_parse_extended_key_usage_error(input: Vec<u8>) {
        assert!(ExtendedKeyUsage::parse(&input).is_err());
    }
}

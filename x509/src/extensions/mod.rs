//! Certificate extensions.
//!
//! Every extension is listed in [`Extensions::entries`]. The ones below are
//! also interpreted; an extension whose value does not parse is logged and
//! left out rather than failing the certificate.
//!
//! - subjectAltName
//! - keyUsage
//! - extKeyUsage
//! - basicConstraints

use asn1::{Boolean, ObjectIdentifier};
use der::{Der, Node, Tag};
use kensa::decoder::Decoder;
use serde::Serialize;

use crate::error::Error as CertificateError;
use crate::oid_name::{
    OID_BASIC_CONSTRAINTS, OID_EXT_KEY_USAGE, OID_KEY_USAGE, OID_SUBJECT_ALT_NAME, OidName,
};

mod basic_constraints;
pub mod error;
mod extended_key_usage;
mod key_usage;
mod subject_alt_name;

pub use basic_constraints::BasicConstraints;
use error::{Error, ExtensionContext, Kind};
pub use extended_key_usage::ExtendedKeyUsage;
pub use key_usage::KeyUsage;
pub use subject_alt_name::{GeneralName, SubjectAltName};

const FIELD: &str = "extensions";

/// An extension type that can be parsed from its DER-encoded extnValue.
pub trait Extension: Sized {
    /// The OID of this extension type as a dotted string (e.g., "2.5.29.19")
    const OID: &'static str;

    fn parse(value: &[u8]) -> Result<Self, Error>;
}

/// The only top-level element of an extension value.
pub(crate) fn single_element(der: &Der, kind: Kind) -> Result<Node<'_>, Error> {
    let mut elements = der.elements();
    let node = elements.next().ok_or(Error::EmptySequence(kind))?;
    if let Some(extra) = elements.next() {
        return Err(Error::TrailingElement {
            kind,
            tag: extra.tag(),
        });
    }
    Ok(node)
}

/*
Extension  ::=  SEQUENCE  {
    extnID      OBJECT IDENTIFIER,
    critical    BOOLEAN DEFAULT FALSE,
    extnValue   OCTET STRING
                -- contains the DER encoding of an ASN.1 value
                -- corresponding to the extension type identified
                -- by extnID
}
*/

/// An extension before type-specific parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawExtension<'a> {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    pub value: &'a [u8],
}

impl<'a> RawExtension<'a> {
    fn from_node(node: &Node<'a>) -> Result<Self, Error> {
        if node.tag() != Tag::SEQUENCE {
            return Err(Error::ExpectedSequence(Kind::Extension));
        }
        let mut children = node.children().peekable();
        let oid_node = children.next().ok_or(Error::EmptySequence(Kind::Extension))?;
        let oid: ObjectIdentifier = oid_node.decode().kind(Kind::Extension)?;
        let critical = match children.next_if(|c| c.tag() == Tag::BOOLEAN) {
            Some(c) => {
                let critical: Boolean = c.decode().kind(Kind::Extension)?;
                critical.into()
            }
            None => false,
        };
        let value = children.next().ok_or(Error::EmptySequence(Kind::Extension))?;
        if value.tag() != Tag::OCTET_STRING {
            return Err(Error::ExpectedOctetString {
                kind: Kind::Extension,
                tag: value.tag(),
            });
        }
        if let Some(extra) = children.next() {
            return Err(Error::TrailingElement {
                kind: Kind::Extension,
                tag: extra.tag(),
            });
        }
        Ok(RawExtension {
            oid,
            critical,
            value: value.value(),
        })
    }

    /// Parses the value as `T`, or `None` (logged) when it does not parse.
    fn parse<T: Extension>(&self) -> Option<T> {
        match T::parse(self.value) {
            Ok(ext) => Some(ext),
            Err(e) => {
                tracing::debug!(oid = T::OID, error = %e, "skipping unparseable extension");
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionEntry {
    pub oid: String,
    pub name: String,
    pub critical: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub san: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_usage: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_key_usage: Option<Vec<String>>,
    #[serde(rename = "isCA", skip_serializing_if = "Option::is_none")]
    pub is_ca: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_len_constraint: Option<u32>,
    pub entries: Vec<ExtensionEntry>,
}

impl Extensions {
    /// Reads the `[3]` wrapper of a TBSCertificate.
    pub(crate) fn from_node(node: &Node<'_>) -> Result<Self, CertificateError> {
        let mut wrapped = node.children();
        let (Some(list), None) = (wrapped.next(), wrapped.next()) else {
            return Err(CertificateError::malformed(FIELD, "expected one SEQUENCE inside [3]"));
        };
        if list.tag() != Tag::SEQUENCE {
            return Err(CertificateError::malformed(
                FIELD,
                format!("expected SEQUENCE, found {}", list.tag()),
            ));
        }

        let mut extensions = Extensions::default();
        for child in list.children() {
            let raw = match RawExtension::from_node(&child) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::debug!(offset = child.offset(), error = %e, "skipping malformed extension");
                    continue;
                }
            };
            extensions.apply(&raw);
        }
        Ok(extensions)
    }

    fn apply(&mut self, raw: &RawExtension<'_>) {
        self.entries.push(ExtensionEntry {
            oid: raw.oid.to_string(),
            name: raw.oid.resolved_name(),
            critical: raw.critical,
        });

        match raw.oid.to_string().as_str() {
            OID_SUBJECT_ALT_NAME => {
                if let Some(san) = raw.parse::<SubjectAltName>() {
                    self.san = Some(san.to_strings());
                }
            }
            OID_KEY_USAGE => {
                if let Some(ku) = raw.parse::<KeyUsage>() {
                    self.key_usage = Some(ku.names());
                }
            }
            OID_EXT_KEY_USAGE => {
                if let Some(eku) = raw.parse::<ExtendedKeyUsage>() {
                    self.ext_key_usage = Some(eku.names());
                }
            }
            OID_BASIC_CONSTRAINTS => {
                if let Some(bc) = raw.parse::<BasicConstraints>() {
                    self.is_ca = Some(bc.ca);
                    self.path_len_constraint = bc.path_len_constraint;
                }
            }
            oid => {
                tracing::debug!(oid, critical = raw.critical, "extension not interpreted");
            }
        }
    }

    pub fn get(&self, oid: &str) -> Option<&ExtensionEntry> {
        self.entries.iter().find(|e| e.oid == oid)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use der::Der;
    use rstest::rstest;

    use super::{Extensions, RawExtension};
    use crate::error::ErrorKind;

    fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
        let mut out = vec![tag, value.len() as u8];
        out.extend_from_slice(value);
        out
    }

    fn extension(oid: &[u8], critical: Option<bool>, value: &[u8]) -> Vec<u8> {
        let mut body = tlv(0x06, oid);
        if let Some(critical) = critical {
            body.extend(tlv(0x01, &[if critical { 0xff } else { 0x00 }]));
        }
        body.extend(tlv(0x04, value));
        tlv(0x30, &body)
    }

    fn wrapped(extensions: &[Vec<u8>]) -> Vec<u8> {
        tlv(0xa3, &tlv(0x30, &extensions.concat()))
    }

    fn decode(input: &[u8]) -> Extensions {
        let der = Der::parse(input).unwrap();
        Extensions::from_node(&der.root().unwrap()).unwrap()
    }

    const SAN: &[u8] = &[0x55, 0x1d, 0x11];
    const KEY_USAGE: &[u8] = &[0x55, 0x1d, 0x0f];
    const BASIC_CONSTRAINTS: &[u8] = &[0x55, 0x1d, 0x13];
    const SKI: &[u8] = &[0x55, 0x1d, 0x0e];
    const UNKNOWN: &[u8] = &[0x2b, 0x06, 0x01, 0x04, 0x01, 0x82, 0x37, 0x15, 0x07];

    #[test]
    fn test_extensions() {
        let input = wrapped(&[
            extension(BASIC_CONSTRAINTS, Some(true), &[0x30, 0x06, 0x01, 0x01, 0xff, 0x02, 0x01, 0x00]),
            extension(KEY_USAGE, Some(true), &[0x03, 0x02, 0x01, 0x06]),
            extension(SAN, None, &tlv(0x30, &tlv(0x82, b"ca.example.com"))),
            extension(SKI, Some(false), &tlv(0x04, &[0x01, 0x02])),
            extension(UNKNOWN, None, &[0x02, 0x01, 0x00]),
        ]);
        let exts = decode(&input);

        assert_eq!(Some(true), exts.is_ca);
        assert_eq!(Some(0), exts.path_len_constraint);
        assert_eq!(Some(vec!["Certificate Sign".to_string(), "CRL Sign".to_string()]), exts.key_usage);
        assert_eq!(Some(vec!["ca.example.com".to_string()]), exts.san);
        assert_eq!(None, exts.ext_key_usage);

        assert_eq!(5, exts.entries.len());
        let names = exts.entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(
            vec![
                "basicConstraints",
                "keyUsage",
                "subjectAltName",
                "subjectKeyIdentifier",
                "1.3.6.1.4.1.311.21.7"
            ],
            names
        );
        assert!(exts.get("2.5.29.19").unwrap().critical);
        assert!(!exts.get("2.5.29.14").unwrap().critical);
    }

    #[test]
    fn test_unparseable_extension_is_skipped() {
        let input = wrapped(&[
            // basicConstraints whose value is not a SEQUENCE
            extension(BASIC_CONSTRAINTS, Some(true), &[0x02, 0x01, 0x00]),
            // SAN whose value is truncated
            extension(SAN, None, &[0x30, 0x05, 0x82]),
            // not an Extension at all
            tlv(0x02, &[0x00]),
        ]);
        let exts = decode(&input);
        assert_eq!(None, exts.is_ca);
        assert_eq!(None, exts.san);
        assert_eq!(2, exts.entries.len());
    }

    #[rstest]
    #[case::empty_wrapper(tlv(0xa3, &[]))]
    #[case::not_sequence(tlv(0xa3, &tlv(0x31, &[])))]
    #[case::two_sequences(tlv(0xa3, &[tlv(0x30, &[]), tlv(0x30, &[])].concat()))]
    fn test_extensions_malformed(#[case] input: Vec<u8>) {
        let der = Der::parse(&input).unwrap();
        let e = Extensions::from_node(&der.root().unwrap()).unwrap_err();
        assert_eq!(ErrorKind::MalformedCertificate, e.kind());
    }

    #[rstest]
    #[case::missing_value(tlv(0x30, &tlv(0x06, SAN)))]
    #[case::value_not_octet_string(tlv(0x30, &[tlv(0x06, SAN), tlv(0x03, &[0x00])].concat()))]
    #[case::trailing(tlv(0x30, &[tlv(0x06, SAN), tlv(0x04, &[]), tlv(0x05, &[])].concat()))]
    #[case::bad_critical(tlv(0x30, &[tlv(0x06, SAN), tlv(0x01, &[0x01]), tlv(0x04, &[])].concat()))]
    fn test_raw_extension_error(#[case] input: Vec<u8>) {
        let der = Der::parse(&input).unwrap();
        assert!(RawExtension::from_node(&der.root().unwrap()).is_err());
    }

    #[test]
    fn test_extensions_serialize() {
        let input = wrapped(&[extension(BASIC_CONSTRAINTS, Some(true), &[0x30, 0x00])]);
        let json = serde_json::to_string(&decode(&input)).unwrap();
        assert_eq!(
            r#"{"isCA":false,"entries":[{"oid":"2.5.29.19","name":"basicConstraints","critical":true}]}"#,
            json
        );
    }
}

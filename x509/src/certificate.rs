use std::iter::Peekable;

use asn1::Integer;
use chrono::{DateTime, Utc};
use der::{Children, Class, Node, Tag};
use kensa::decoder::Decoder;
use pem::{Label, Pem};
use serde::Serialize;

use crate::error::{Error, FieldContext};
use crate::extensions::Extensions;
use crate::fingerprint::Fingerprints;
use crate::key_info::{KeyInfo, algorithm_identifier};
use crate::name::Name;
use crate::oid_name::OidName;
use crate::validity::Validity;

/*
https://datatracker.ietf.org/doc/html/rfc5280#section-4.1

Certificate  ::=  SEQUENCE  {
    tbsCertificate       TBSCertificate,
    signatureAlgorithm   AlgorithmIdentifier,
    signatureValue       BIT STRING
}

TBSCertificate  ::=  SEQUENCE  {
     version         [0]  EXPLICIT Version DEFAULT v1,
     serialNumber         CertificateSerialNumber,
     signature            AlgorithmIdentifier,
     issuer               Name,
     validity             Validity,
     subject              Name,
     subjectPublicKeyInfo SubjectPublicKeyInfo,
     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
     extensions      [3]  EXPLICIT Extensions OPTIONAL
}

Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }
 */

const VERSION: Tag = Tag::context(0, true);
const EXTENSIONS: Tag = Tag::context(3, true);

/// Everything extracted from one certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    pub subject: Name,
    pub issuer: Name,
    pub validity: Validity,
    /// Uppercase colon-separated hex of the INTEGER content octets.
    pub serial_number: String,
    /// 1-based.
    pub version: u8,
    pub signature_algorithm: String,
    pub key_info: KeyInfo,
    pub extensions: Extensions,
    pub fingerprints: Fingerprints,
    /// PEM text of the certificate.
    pub raw: String,
}

impl CertificateInfo {
    /// Subject and issuer decode to the same attributes.
    ///
    /// This compares names only; the signature is not checked.
    pub fn is_self_signed(&self) -> bool {
        self.subject == self.issuer
    }
}

// Walks TBSCertificate children in order, asserting the tag of each field.
struct Cursor<'a> {
    children: Peekable<Children<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(node: &Node<'a>) -> Self {
        Cursor {
            children: node.children().peekable(),
        }
    }

    fn next_if_tag(&mut self, tag: Tag) -> Option<Node<'a>> {
        self.children.next_if(|c| c.tag() == tag)
    }

    fn next_if_context(&mut self, number: u8) -> Option<Node<'a>> {
        self.children
            .next_if(|c| c.tag().class() == Class::ContextSpecific && c.tag().number() == number)
    }

    fn expect(&mut self, tag: Tag, field: &'static str) -> Result<Node<'a>, Error> {
        match self.children.next() {
            Some(node) if node.tag() == tag => {
                tracing::trace!(field, offset = node.offset(), length = node.length(), "read field");
                Ok(node)
            }
            Some(node) => Err(Error::malformed(
                field,
                format!("expected {}, found {} at offset {}", tag, node.tag(), node.offset()),
            )),
            None => Err(Error::malformed(field, "missing")),
        }
    }

    fn finish(mut self) -> Result<(), Error> {
        match self.children.next() {
            Some(node) => Err(Error::malformed(
                "tbsCertificate",
                format!("unexpected {} at offset {}", node.tag(), node.offset()),
            )),
            None => Ok(()),
        }
    }
}

fn version(cursor: &mut Cursor<'_>) -> Result<u8, Error> {
    let Some(wrapper) = cursor.next_if_tag(VERSION) else {
        return Ok(1);
    };
    let inner = wrapper
        .child(0)
        .ok_or_else(|| Error::malformed("version", "empty [0] wrapper"))?;
    let version: Integer = inner.decode().field("version")?;
    match version.to_u64() {
        Some(v @ 0..=2) => Ok(v as u8 + 1),
        _ => Err(Error::malformed("version", format!("unknown version {}", version))),
    }
}

fn serial_number(node: &Node<'_>) -> Result<String, Error> {
    if node.value().is_empty() {
        return Err(Error::malformed("serialNumber", "empty INTEGER"));
    }
    Ok(node
        .value()
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":"))
}

fn name(node: &Node<'_>, field: &'static str) -> Result<Name, Error> {
    let decoded: Result<Name, Error> = node.decode();
    decoded.map_err(|e| e.in_field(field))
}

/// Builds a [`CertificateInfo`] from the root node of a parsed certificate.
///
/// `der` is the full encoding the node was parsed from; it is hashed for the
/// fingerprints. `now` is the reference instant for the validity fields.
pub fn extract(root: Node<'_>, der: &[u8], now: DateTime<Utc>) -> Result<CertificateInfo, Error> {
    if root.tag() != Tag::SEQUENCE {
        return Err(Error::malformed(
            "certificate",
            format!("expected SEQUENCE, found {}", root.tag()),
        ));
    }
    let mut parts = root.children();
    let (Some(tbs), Some(signature_algorithm), Some(signature_value), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::malformed(
            "certificate",
            "expected tbsCertificate, signatureAlgorithm and signatureValue",
        ));
    };
    if tbs.tag() != Tag::SEQUENCE {
        return Err(Error::malformed(
            "tbsCertificate",
            format!("expected SEQUENCE, found {}", tbs.tag()),
        ));
    }
    algorithm_identifier(&signature_algorithm, "signatureAlgorithm")?;
    if signature_value.tag() != Tag::BIT_STRING {
        return Err(Error::malformed(
            "signatureValue",
            format!("expected BIT STRING, found {}", signature_value.tag()),
        ));
    }

    let mut cursor = Cursor::new(&tbs);
    let version = version(&mut cursor)?;
    let serial_number = serial_number(&cursor.expect(Tag::INTEGER, "serialNumber")?)?;
    let (signature, _) =
        algorithm_identifier(&cursor.expect(Tag::SEQUENCE, "signature")?, "signature")?;
    let issuer = name(&cursor.expect(Tag::SEQUENCE, "issuer")?, "issuer")?;
    let validity = Validity::from_node(&cursor.expect(Tag::SEQUENCE, "validity")?, now)?;
    let subject = name(&cursor.expect(Tag::SEQUENCE, "subject")?, "subject")?;
    let key_info = KeyInfo::from_node(&cursor.expect(Tag::SEQUENCE, "subjectPublicKeyInfo")?)?;

    for number in [1, 2] {
        if let Some(unique_id) = cursor.next_if_context(number) {
            tracing::trace!(slot = number, length = unique_id.length(), "skipping unique identifier");
        }
    }
    let extensions = match cursor.next_if_tag(EXTENSIONS) {
        Some(node) => Extensions::from_node(&node)?,
        None => Extensions::default(),
    };
    cursor.finish()?;

    Ok(CertificateInfo {
        subject,
        issuer,
        validity,
        serial_number,
        version,
        signature_algorithm: signature.resolved_name(),
        key_info,
        extensions,
        fingerprints: Fingerprints::of(der),
        raw: Pem::from_bytes(Label::Certificate, der).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use der::Der;
    use rstest::rstest;

    use super::{CertificateInfo, extract};
    use crate::error::{Error, ErrorKind};

    fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
        let mut out = vec![tag];
        match value.len() {
            n if n < 0x80 => out.push(n as u8),
            n if n < 0x100 => out.extend_from_slice(&[0x81, n as u8]),
            n => {
                out.push(0x82);
                out.extend_from_slice(&(n as u16).to_be_bytes());
            }
        }
        out.extend_from_slice(value);
        out
    }

    fn name(cn: &str) -> Vec<u8> {
        let atv = [tlv(0x06, &[0x55, 0x04, 0x03]), tlv(0x0c, cn.as_bytes())].concat();
        tlv(0x30, &tlv(0x31, &tlv(0x30, &atv)))
    }

    fn sha256_with_rsa() -> Vec<u8> {
        let oid = [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b];
        tlv(0x30, &[tlv(0x06, &oid), tlv(0x05, &[])].concat())
    }

    fn validity(not_before: &[u8], not_after: &[u8]) -> Vec<u8> {
        tlv(0x30, &[tlv(0x17, not_before), tlv(0x17, not_after)].concat())
    }

    fn ec_p256_key() -> Vec<u8> {
        let ec = [0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
        let p256 = [0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];
        let algorithm = tlv(0x30, &[tlv(0x06, &ec), tlv(0x06, &p256)].concat());
        tlv(0x30, &[algorithm, tlv(0x03, &[0x00, 0x04, 0x01, 0x02])].concat())
    }

    // version, serial, signature, issuer, validity, subject, spki
    fn v1_fields() -> Vec<Vec<u8>> {
        vec![
            tlv(0x02, &[0x01, 0x9f]),
            sha256_with_rsa(),
            name("issuer"),
            validity(b"240101000000Z", b"340101000000Z"),
            name("subject"),
            ec_p256_key(),
        ]
    }

    fn certificate(fields: &[Vec<u8>]) -> Vec<u8> {
        let tbs = tlv(0x30, &fields.concat());
        tlv(0x30, &[tbs, sha256_with_rsa(), tlv(0x03, &[0x00, 0x01])].concat())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn run(input: &[u8]) -> Result<CertificateInfo, Error> {
        let der = Der::parse(input).unwrap();
        extract(der.root().unwrap(), input, now())
    }

    #[test]
    fn test_extract_v1() {
        let info = run(&certificate(&v1_fields())).unwrap();
        assert_eq!(1, info.version);
        assert_eq!("01:9F", info.serial_number);
        assert_eq!("SHA256withRSA", info.signature_algorithm);
        assert_eq!(Some("issuer"), info.issuer.get("CN"));
        assert_eq!(Some("subject"), info.subject.get("CN"));
        assert!(!info.is_self_signed());
        assert_eq!("EC", info.key_info.algorithm);
        assert_eq!(Some(256), info.key_info.key_size);
        assert_eq!(Some("P-256".to_string()), info.key_info.curve);
        assert!(info.extensions.is_empty());
        assert!(!info.validity.is_expired);
        assert!(info.raw.starts_with("-----BEGIN CERTIFICATE-----"));
    }

    #[test]
    fn test_extract_v3_with_unique_ids() {
        let mut fields = vec![tlv(0xa0, &tlv(0x02, &[0x02]))];
        fields.extend(v1_fields());
        fields.push(tlv(0x81, &[0x00, 0xff]));
        fields.push(tlv(0x82, &[0x00, 0xff]));
        fields.push(tlv(0xa3, &tlv(0x30, &[])));
        let info = run(&certificate(&fields)).unwrap();
        assert_eq!(3, info.version);
        assert!(info.extensions.entries.is_empty());
    }

    #[rstest]
    #[case::version_out_of_range(0, Some(tlv(0xa0, &tlv(0x02, &[0x05]))), "version")]
    #[case::empty_version(0, Some(tlv(0xa0, &[])), "version")]
    #[case::serial_wrong_tag(0, Some(tlv(0x04, &[0x01])), "serialNumber")]
    #[case::empty_serial(0, Some(tlv(0x02, &[])), "serialNumber")]
    #[case::signature_wrong_tag(1, Some(tlv(0x05, &[])), "signature")]
    #[case::issuer_not_name(2, Some(tlv(0x30, &tlv(0x30, &[]))), "issuer")]
    #[case::validity_one_time(3, Some(tlv(0x30, &tlv(0x17, b"240101000000Z"))), "validity")]
    #[case::subject_missing(4, None, "subject")]
    fn test_extract_malformed_field(
        #[case] index: usize,
        #[case] replacement: Option<Vec<u8>>,
        #[case] field: &str,
    ) {
        let mut fields = v1_fields();
        match replacement {
            Some(r) => fields[index] = r,
            None => fields.truncate(index),
        }
        match run(&certificate(&fields)) {
            Err(Error::MalformedCertificate { field: f, .. }) => assert_eq!(field, f),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_extract_version_wrapper_needs_integer() {
        let mut fields = vec![tlv(0xa0, &tlv(0x04, &[0x02]))];
        fields.extend(v1_fields());
        let e = run(&certificate(&fields)).unwrap_err();
        assert_eq!(ErrorKind::MalformedCertificate, e.kind());
    }

    #[test]
    fn test_extract_trailing_field() {
        let mut fields = v1_fields();
        fields.push(tlv(0x05, &[]));
        match run(&certificate(&fields)) {
            Err(Error::MalformedCertificate { field, .. }) => assert_eq!("tbsCertificate", field),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    #[case::offset(b"2401010000+0100".as_slice(), "notBefore")]
    #[case::garbage(b"24010100000Z".as_slice(), "notBefore")]
    fn test_extract_unsupported_time(#[case] not_before: &[u8], #[case] field: &str) {
        let mut fields = v1_fields();
        fields[3] = validity(not_before, b"340101000000Z");
        match run(&certificate(&fields)) {
            Err(Error::UnsupportedTimeFormat { field: f, .. }) => assert_eq!(field, f),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    #[case::not_sequence(tlv(0x31, &[]))]
    #[case::two_parts(tlv(0x30, &[tlv(0x30, &[]), sha256_with_rsa()].concat()))]
    #[case::signature_not_bit_string(
        tlv(0x30, &[tlv(0x30, &v1_fields().concat()), sha256_with_rsa(), tlv(0x04, &[])].concat())
    )]
    #[case::four_parts(
        tlv(0x30, &[tlv(0x30, &v1_fields().concat()), sha256_with_rsa(), tlv(0x03, &[0x00]), tlv(0x05, &[])].concat())
    )]
    fn test_extract_malformed_certificate(#[case] input: Vec<u8>) {
        let e = run(&input).unwrap_err();
        assert_eq!(ErrorKind::MalformedCertificate, e.kind());
    }
}

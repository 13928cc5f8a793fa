use std::fmt;

use asn1::{DirectoryString, ObjectIdentifier};
use der::{Node, Tag};
use kensa::decoder::{DecodableFrom, Decoder};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, FieldContext};
use crate::oid_name::OidName;

/*
https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.2.4

Name ::= CHOICE { -- only one possibility for now --
    rdnSequence  RDNSequence }

RDNSequence ::= SEQUENCE OF RelativeDistinguishedName

RelativeDistinguishedName ::= SET SIZE (1..MAX) OF AttributeTypeAndValue

AttributeTypeAndValue ::= SEQUENCE {
    type     AttributeType,
    value    AttributeValue }
 */

/// A distinguished name flattened to attribute name → value.
///
/// Attributes keep the order in which they first appear. When an attribute
/// occurs more than once the last value wins, which also means multi-valued
/// RDNs collapse to a single value per attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name {
    attributes: Vec<(String, String)>,
}

impl Name {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Name {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut name = Name::default();
        for (k, v) in iter {
            name.insert(k, v);
        }
        name
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", s)
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// Values that are not a known string type are shown as '#' and the hex of
// their full encoding, as RFC 4514 does.
fn attribute_value(node: &Node<'_>) -> String {
    let decoded: Result<DirectoryString, _> = node.decode();
    match decoded {
        Ok(s) => s.into_string(),
        Err(e) => {
            tracing::debug!(tag = %node.tag(), error = %e, "attribute value shown as hex");
            let hex = node
                .raw()
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<String>();
            format!("#{}", hex)
        }
    }
}

impl<'a> DecodableFrom<Node<'a>> for Name {}

impl<'a> Decoder<Node<'a>, Name> for Node<'a> {
    type Error = Error;

    /// Decodes an RDNSequence. Errors are reported against the field
    /// `name`; callers relabel them with [`Error::in_field`].
    fn decode(&self) -> Result<Name, Self::Error> {
        if self.tag() != Tag::SEQUENCE {
            return Err(Error::malformed("name", format!("expected SEQUENCE, found {}", self.tag())));
        }

        let mut name = Name::default();
        for rdn in self.children() {
            if rdn.tag() != Tag::SET {
                return Err(Error::malformed("name", format!("expected SET, found {}", rdn.tag())));
            }
            for atv in rdn.children() {
                if atv.tag() != Tag::SEQUENCE {
                    return Err(Error::malformed(
                        "name",
                        format!("expected AttributeTypeAndValue, found {}", atv.tag()),
                    ));
                }
                let (Some(attr_type), Some(attr_value)) = (atv.child(0), atv.child(1)) else {
                    return Err(Error::malformed("name", "AttributeTypeAndValue needs a type and a value"));
                };
                let oid: ObjectIdentifier = attr_type.decode().field("name")?;
                name.insert(oid.resolved_name(), attribute_value(&attr_value));
            }
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use der::Der;
    use kensa::decoder::Decoder;
    use rstest::rstest;

    use super::Name;
    use crate::error::ErrorKind;

    fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
        let mut out = vec![tag, value.len() as u8];
        out.extend_from_slice(value);
        out
    }

    fn atv(oid: &[u8], value_tag: u8, value: &[u8]) -> Vec<u8> {
        let mut inner = tlv(0x06, oid);
        inner.extend(tlv(value_tag, value));
        tlv(0x30, &inner)
    }

    fn rdn_sequence(rdns: &[Vec<u8>]) -> Vec<u8> {
        let body = rdns.iter().flat_map(|atv| tlv(0x31, atv)).collect::<Vec<_>>();
        tlv(0x30, &body)
    }

    const CN: &[u8] = &[0x55, 0x04, 0x03];
    const O: &[u8] = &[0x55, 0x04, 0x0a];
    const C: &[u8] = &[0x55, 0x04, 0x06];
    const UNKNOWN: &[u8] = &[0x2a, 0x03, 0x04];

    fn decode(input: &[u8]) -> Result<Name, crate::error::Error> {
        let der = Der::parse(input).unwrap();
        der.root().unwrap().decode()
    }

    #[test]
    fn test_decode_name() {
        let input = rdn_sequence(&[
            atv(C, 0x13, b"JP"),
            atv(O, 0x0c, b"Kensa"),
            atv(CN, 0x0c, b"test.example.com"),
        ]);
        let name = decode(&input).unwrap();
        assert_eq!(Some("JP"), name.get("C"));
        assert_eq!(Some("Kensa"), name.get("O"));
        assert_eq!(Some("test.example.com"), name.get("CN"));
        assert_eq!("C=JP, O=Kensa, CN=test.example.com", name.to_string());
    }

    #[test]
    fn test_decode_name_last_occurrence_wins() {
        let input = rdn_sequence(&[
            atv(CN, 0x0c, b"first"),
            atv(O, 0x0c, b"Org"),
            atv(CN, 0x0c, b"second"),
        ]);
        let name = decode(&input).unwrap();
        assert_eq!(2, name.len());
        assert_eq!(Some("second"), name.get("CN"));
        assert_eq!("CN=second, O=Org", name.to_string());
    }

    #[test]
    fn test_decode_name_unknown_oid_and_value() {
        let input = rdn_sequence(&[atv(UNKNOWN, 0x04, &[0xde, 0xad])]);
        let name = decode(&input).unwrap();
        assert_eq!(Some("#0402dead"), name.get("1.2.3.4"));
    }

    #[test]
    fn test_decode_name_empty() {
        let name = decode(&[0x30, 0x00]).unwrap();
        assert!(name.is_empty());
        assert_eq!("", name.to_string());
    }

    #[rstest]
    #[case::not_sequence(tlv(0x31, &[]))]
    #[case::rdn_not_set(tlv(0x30, &tlv(0x30, &[])))]
    #[case::atv_missing_value(tlv(0x30, &tlv(0x31, &tlv(0x30, &tlv(0x06, CN)))))]
    #[case::atv_type_not_oid(tlv(0x30, &tlv(0x31, &tlv(0x30, &[0x02, 0x01, 0x00, 0x0c, 0x00]))))]
    fn test_decode_name_malformed(#[case] input: Vec<u8>) {
        let e = decode(&input).unwrap_err();
        assert_eq!(ErrorKind::MalformedCertificate, e.kind());
    }

    #[test]
    fn test_name_serialize() {
        let name: Name = [("CN", "a"), ("O", "b")].into_iter().collect();
        assert_eq!(r#"{"CN":"a","O":"b"}"#, serde_json::to_string(&name).unwrap());
    }
}

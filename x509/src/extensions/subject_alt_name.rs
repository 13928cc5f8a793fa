use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use asn1::{DirectoryString, ObjectIdentifier};
use der::{Class, Der, Node, Tag};
use kensa::decoder::{DecodableFrom, Decoder};

use super::error::{Error, ExtensionContext, Kind};
use super::{Extension, single_element};
use crate::name::Name;
use crate::oid_name::OID_SUBJECT_ALT_NAME;

/*
RFC 5280 Section 4.2.1.6
SubjectAltName ::= GeneralNames

GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName

GeneralName ::= CHOICE {
    otherName                       [0]     OtherName,
    rfc822Name                      [1]     IA5String,
    dNSName                         [2]     IA5String,
    x400Address                     [3]     ORAddress,
    directoryName                   [4]     Name,
    ediPartyName                    [5]     EDIPartyName,
    uniformResourceIdentifier       [6]     IA5String,
    iPAddress                       [7]     OCTET STRING,
    registeredID                    [8]     OBJECT IDENTIFIER }
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralName {
    Rfc822Name(String),
    DnsName(String),
    DirectoryName(Name),
    Uri(String),
    IpAddress(IpAddr),
    RegisteredId(ObjectIdentifier),
    /// otherName, x400Address and ediPartyName, kept only as their slot.
    Unsupported(u8),
}

impl GeneralName {
    /// Display form used in the SAN list; `None` for unsupported forms.
    pub fn to_san_string(&self) -> Option<String> {
        match self {
            GeneralName::Rfc822Name(s) | GeneralName::DnsName(s) | GeneralName::Uri(s) => {
                Some(s.clone())
            }
            GeneralName::DirectoryName(name) => Some(name.to_string()),
            GeneralName::IpAddress(ip) => Some(ip.to_string()),
            GeneralName::RegisteredId(oid) => Some(oid.to_string()),
            GeneralName::Unsupported(_) => None,
        }
    }
}

fn ia5(node: &Node<'_>) -> Result<String, Error> {
    let s = DirectoryString::from_tagged(Tag::IA5_STRING, node.value()).kind(Kind::GeneralName)?;
    Ok(s.into_string())
}

impl<'a> DecodableFrom<Node<'a>> for GeneralName {}

impl<'a> Decoder<Node<'a>, GeneralName> for Node<'a> {
    type Error = Error;

    fn decode(&self) -> Result<GeneralName, Self::Error> {
        let tag = self.tag();
        if tag.class() != Class::ContextSpecific {
            return Err(Error::UnexpectedTag {
                kind: Kind::GeneralName,
                tag,
            });
        }
        let name = match (tag.number(), tag.is_constructed()) {
            (1, false) => GeneralName::Rfc822Name(ia5(self)?),
            (2, false) => GeneralName::DnsName(ia5(self)?),
            (4, true) => {
                // EXPLICIT: the Name sits inside the [4] wrapper
                let inner = self
                    .child(0)
                    .ok_or(Error::EmptySequence(Kind::GeneralName))?;
                let name: Name = inner.decode()?;
                GeneralName::DirectoryName(name)
            }
            (6, false) => GeneralName::Uri(ia5(self)?),
            (7, false) => {
                let ip = match self.value() {
                    [a, b, c, d] => IpAddr::V4(Ipv4Addr::new(*a, *b, *c, *d)),
                    bytes if bytes.len() == 16 => {
                        let mut octets = [0u8; 16];
                        octets.copy_from_slice(bytes);
                        IpAddr::V6(Ipv6Addr::from(octets))
                    }
                    bytes => return Err(Error::InvalidIpAddressLength(bytes.len())),
                };
                GeneralName::IpAddress(ip)
            }
            (8, false) => {
                let oid = ObjectIdentifier::try_from(self.value()).kind(Kind::GeneralName)?;
                GeneralName::RegisteredId(oid)
            }
            (n, _) => GeneralName::Unsupported(n),
        };
        Ok(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAltName {
    pub names: Vec<GeneralName>,
}

impl SubjectAltName {
    /// Display strings of every supported name, in encoding order.
    pub fn to_strings(&self) -> Vec<String> {
        self.names
            .iter()
            .filter_map(GeneralName::to_san_string)
            .collect()
    }
}

impl Extension for SubjectAltName {
    const OID: &'static str = OID_SUBJECT_ALT_NAME;

    fn parse(value: &[u8]) -> Result<Self, Error> {
        let der = Der::parse(value)?;
        let node = single_element(&der, Kind::SubjectAltName)?;
        if node.tag() != Tag::SEQUENCE {
            return Err(Error::ExpectedSequence(Kind::SubjectAltName));
        }

        let mut names = Vec::new();
        for child in node.children() {
            // one bad entry does not hide the others
            let decoded: Result<GeneralName, Error> = child.decode();
            match decoded {
                Ok(name) => names.push(name),
                Err(e) => tracing::debug!(tag = %child.tag(), error = %e, "skipping GeneralName"),
            }
        }
        Ok(SubjectAltName { names })
    }
}

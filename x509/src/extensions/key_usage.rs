use asn1::BitString;
use der::Der;
use kensa::decoder::Decoder;

use super::error::{Error, ExtensionContext, Kind};
use super::{Extension, single_element};
use crate::oid_name::OID_KEY_USAGE;

/*
RFC 5280 Section 4.2.1.3
KeyUsage ::= BIT STRING {
    digitalSignature        (0),
    nonRepudiation          (1), -- renamed to contentCommitment
    keyEncipherment         (2),
    dataEncipherment        (3),
    keyAgreement            (4),
    keyCertSign             (5),
    cRLSign                 (6),
    encipherOnly            (7),
    decipherOnly            (8)
}
*/

const KEY_USAGE_NAMES: [&str; 9] = [
    "Digital Signature",
    "Content Commitment",
    "Key Encipherment",
    "Data Encipherment",
    "Key Agreement",
    "Certificate Sign",
    "CRL Sign",
    "Encipher Only",
    "Decipher Only",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyUsage {
    bits: BitString,
}

impl KeyUsage {
    /// Names of the asserted bits, in bit order. Bits beyond decipherOnly
    /// are not defined and are ignored.
    pub fn names(&self) -> Vec<String> {
        KEY_USAGE_NAMES
            .iter()
            .enumerate()
            .filter(|(bit, _)| self.bits.is_set(*bit))
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

impl Extension for KeyUsage {
    const OID: &'static str = OID_KEY_USAGE;

    fn parse(value: &[u8]) -> Result<Self, Error> {
        let der = Der::parse(value)?;
        let node = single_element(&der, Kind::KeyUsage)?;
        let bits: BitString = node.decode().kind(Kind::KeyUsage)?;
        Ok(KeyUsage { bits })
    }
}

use std::fmt::{self, Display};
use std::str::FromStr;

use der::{Node, Tag};
use kensa::decoder::{DecodableFrom, Decoder};
use kensa::encoder::{EncodableTo, Encoder};

use crate::error::Error;
use crate::expect_tag;

/// An OBJECT IDENTIFIER as its list of arcs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut in_arc = false;
        for &b in value {
            if !in_arc && b == 0x80 {
                // DER forbids leading 0x80 padding in an arc
                return Err(Error::ObjectIdentifierNonMinimal);
            }
            if val > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierArcOverflow);
            }
            val = (val << 7) | (b & 0x7f) as u64;
            if b & 0x80 == 0 {
                // continuation bit clear: the arc ends here
                subidentifiers.push(val);
                val = 0;
                in_arc = false;
            } else {
                in_arc = true;
            }
        }
        if in_arc {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first subidentifier packs two arcs as 40 * a + b.
        let first = subidentifiers[0];
        let (a, b) = match first {
            0..40 => (0, first),
            40..80 => (1, first - 40),
            _ => (2, first - 80),
        };
        let mut inner = Vec::with_capacity(subidentifiers.len() + 1);
        inner.push(a);
        inner.push(b);
        inner.extend_from_slice(&subidentifiers[1..]);
        Ok(ObjectIdentifier { inner })
    }
}

impl TryFrom<Vec<u8>> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

fn push_base128(out: &mut Vec<u8>, mut value: u64) {
    let mut encoded = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        encoded.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(encoded.iter().rev());
}

impl EncodableTo<ObjectIdentifier> for Vec<u8> {}

impl Encoder<ObjectIdentifier, Vec<u8>> for ObjectIdentifier {
    type Error = Error;

    /// Encodes the content octets (without tag and length).
    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let (a, b) = match self.inner.as_slice() {
            [a, b, ..] => (*a, *b),
            _ => return Err(Error::ObjectIdentifierTooFewComponents),
        };
        let first = (a * 40)
            .checked_add(b)
            .ok_or(Error::ObjectIdentifierArcOverflow)?;

        let mut result = Vec::new();
        push_base128(&mut result, first);
        for arc in &self.inner[2..] {
            push_base128(&mut result, *arc);
        }
        Ok(result)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .split('.')
            .map(|arc| arc.parse::<u64>().map_err(Error::ObjectIdentifierInvalidComponent))
            .collect::<Result<Vec<u64>, Error>>()?;
        match inner.as_slice() {
            [a, b, ..] if *a > 2 || (*a < 2 && *b >= 40) => {
                Err(Error::ObjectIdentifierInvalidRoot(*a, *b))
            }
            [_, _, ..] => Ok(ObjectIdentifier { inner }),
            _ => Err(Error::ObjectIdentifierTooFewComponents),
        }
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl<'a> DecodableFrom<Node<'a>> for ObjectIdentifier {}

impl<'a> Decoder<Node<'a>, ObjectIdentifier> for Node<'a> {
    type Error = Error;

    fn decode(&self) -> Result<ObjectIdentifier, Self::Error> {
        expect_tag(self, Tag::OBJECT_IDENTIFIER, "OBJECT IDENTIFIER")?;
        ObjectIdentifier::try_from(self.value())
    }
}

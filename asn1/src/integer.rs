use std::fmt::{self, Display};

use der::{Node, Tag};
use kensa::decoder::{DecodableFrom, Decoder};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::error::Error;
use crate::expect_tag;

// ASN.1 INTEGER is arbitrary sized and may be negative.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }

    /// Bit length of the magnitude, ignoring sign.
    pub fn bits(&self) -> u64 {
        self.inner.bits()
    }
}

impl TryFrom<&[u8]> for Integer {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::IntegerNoData);
        }
        Ok(Integer {
            inner: BigInt::from_signed_bytes_be(value),
        })
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl<'a> DecodableFrom<Node<'a>> for Integer {}

impl<'a> Decoder<Node<'a>, Integer> for Node<'a> {
    type Error = Error;

    fn decode(&self) -> Result<Integer, Self::Error> {
        expect_tag(self, Tag::INTEGER, "INTEGER")?;
        Integer::try_from(self.value())
    }
}

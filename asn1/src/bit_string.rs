use std::fmt::{self, Display};

use der::{Node, Tag};
use kensa::decoder::{DecodableFrom, Decoder};

use crate::error::Error;
use crate::expect_tag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the total number of bits (excluding unused bits)
    pub fn bit_len(&self) -> usize {
        if self.data.is_empty() {
            0
        } else {
            self.data.len() * 8 - self.unused as usize
        }
    }

    /// Whether bit `n` is set, counting from the most significant bit of
    /// the first byte as in named-bit lists.
    pub fn is_set(&self, n: usize) -> bool {
        if n >= self.bit_len() {
            return false;
        }
        self.data[n / 8] & (0x80 >> (n % 8)) != 0
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value.split_first() {
            Some((&unused, data)) => {
                if unused > 7 || (data.is_empty() && unused != 0) {
                    return Err(Error::BitStringUnusedBitsOutOfRange(unused));
                }
                Ok(BitString {
                    unused,
                    data: data.to_vec(),
                })
            }
            None => Err(Error::BitStringNoData),
        }
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = (0..self.bit_len())
            .map(|n| if self.is_set(n) { '1' } else { '0' })
            .collect::<String>();
        write!(f, "{}", bits)
    }
}

impl<'a> DecodableFrom<Node<'a>> for BitString {}

impl<'a> Decoder<Node<'a>, BitString> for Node<'a> {
    type Error = Error;

    fn decode(&self) -> Result<BitString, Self::Error> {
        expect_tag(self, Tag::BIT_STRING, "BIT STRING")?;
        BitString::try_from(self.value())
    }
}

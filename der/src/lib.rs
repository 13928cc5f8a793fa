//! DER tag-length-value parsing.
//!
//! A buffer is split into a tree of nodes stored in a flat arena. Each node
//! records where its header and value live in the original buffer, and
//! constructed nodes keep the index range of their direct children, which is
//! always contiguous in the arena.
//!
//! ```
//! use der::{Der, Tag};
//!
//! // SEQUENCE { INTEGER 7, NULL }
//! let der = Der::parse(&[0x30, 0x05, 0x02, 0x01, 0x07, 0x05, 0x00]).unwrap();
//! let root = der.root().unwrap();
//! assert_eq!(Tag::SEQUENCE, root.tag());
//! assert_eq!(2, root.children().len());
//! ```

use std::fmt;
use std::ops::Range;

use kensa::decoder::{DecodableFrom, Decoder};
use nom::{IResult, Parser};

pub mod error;
mod tag;

use error::Error;
pub use tag::{Class, TAG_CONSTRUCTED, Tag};

/// Default cap on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Default cap on input size (1 MiB).
pub const DEFAULT_MAX_INPUT_LEN: usize = 1 << 20;

// Lengths wider than u64 cannot describe a real buffer.
const MAX_LENGTH_OCTETS: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_depth: usize,
    pub max_input_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    tag: Tag,
    offset: usize,
    header_len: usize,
    length: usize,
    children: Option<Range<usize>>,
}

impl Entry {
    fn value_start(&self) -> usize {
        self.offset + self.header_len
    }

    fn value_end(&self) -> usize {
        self.value_start() + self.length
    }
}

/// A parsed DER buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    data: Vec<u8>,
    entries: Vec<Entry>,
    roots: Range<usize>,
}

impl Der {
    pub fn parse(data: &[u8]) -> Result<Der, Error> {
        Self::parse_with_limits(data, Limits::default())
    }

    pub fn parse_with_limits(data: &[u8], limits: Limits) -> Result<Der, Error> {
        if data.len() > limits.max_input_len {
            return Err(Error::InputTooLarge {
                size: data.len(),
                limit: limits.max_input_len,
            });
        }

        let mut entries = Vec::new();
        let roots = parse_siblings(data, &mut entries, 0..data.len(), 0, &limits)?;
        Ok(Der {
            data: data.to_vec(),
            entries,
            roots,
        })
    }

    /// The buffer the tree was parsed from.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Top-level elements in buffer order.
    pub fn elements(&self) -> Children<'_> {
        Children {
            der: self,
            range: self.roots.clone(),
        }
    }

    /// The first top-level element.
    pub fn root(&self) -> Option<Node<'_>> {
        self.elements().next()
    }

    /// Number of nodes in the whole tree.
    pub fn node_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for Der {
    /// Indented dump in the style of `openssl asn1parse`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn dump(node: Node<'_>, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let kind = if node.is_constructed() { "cons" } else { "prim" };
            writeln!(
                f,
                "{:5}:d={:<2} hl={} l={:4} {}: {}{}",
                node.offset(),
                depth,
                node.header_len(),
                node.length(),
                kind,
                "  ".repeat(depth),
                node.tag()
            )?;
            for child in node.children() {
                dump(child, depth + 1, f)?;
            }
            Ok(())
        }

        for node in self.elements() {
            dump(node, 0, f)?;
        }
        Ok(())
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        Der::parse(self)
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        Der::parse(self)
    }
}

/// A borrowed view of one node in a [`Der`] tree.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    der: &'a Der,
    index: usize,
}

impl<'a> Node<'a> {
    fn entry(&self) -> &'a Entry {
        &self.der.entries[self.index]
    }

    pub fn tag(&self) -> Tag {
        self.entry().tag
    }

    /// Offset of the identifier octet in the original buffer.
    pub fn offset(&self) -> usize {
        self.entry().offset
    }

    pub fn header_len(&self) -> usize {
        self.entry().header_len
    }

    pub fn length(&self) -> usize {
        self.entry().length
    }

    pub fn is_constructed(&self) -> bool {
        self.entry().children.is_some()
    }

    /// Content octets.
    pub fn value(&self) -> &'a [u8] {
        let entry = self.entry();
        &self.der.data[entry.value_start()..entry.value_end()]
    }

    /// Header and content octets, exactly as they appear in the buffer.
    pub fn raw(&self) -> &'a [u8] {
        let entry = self.entry();
        &self.der.data[entry.offset..entry.value_end()]
    }

    /// Direct children. Empty for primitive nodes.
    pub fn children(&self) -> Children<'a> {
        Children {
            der: self.der,
            range: self.entry().children.clone().unwrap_or(0..0),
        }
    }

    pub fn child(&self, n: usize) -> Option<Node<'a>> {
        self.children().nth(n)
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("tag", &self.tag())
            .field("offset", &self.offset())
            .field("length", &self.length())
            .field("children", &self.children().len())
            .finish()
    }
}

pub struct Children<'a> {
    der: &'a Der,
    range: Range<usize>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(|index| Node {
            der: self.der,
            index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}

struct Header {
    tag: Tag,
    header_len: usize,
    length: usize,
}

/// Parses every element in `span`, pushing the siblings first so that they
/// occupy a contiguous index range, then descends into constructed ones.
fn parse_siblings(
    data: &[u8],
    entries: &mut Vec<Entry>,
    span: Range<usize>,
    depth: usize,
    limits: &Limits,
) -> Result<Range<usize>, Error> {
    if depth > limits.max_depth {
        tracing::debug!(offset = span.start, limit = limits.max_depth, "DER nesting limit reached");
        return Err(Error::MaxDepthExceeded {
            offset: span.start,
            limit: limits.max_depth,
        });
    }

    let first = entries.len();
    let mut offset = span.start;
    while offset < span.end {
        let header = read_header(&data[offset..span.end], offset)?;
        let available = span.end - offset - header.header_len;
        if header.length > available {
            return Err(Error::Truncated {
                offset,
                needed: header.length,
                available,
            });
        }
        let entry = Entry {
            tag: header.tag,
            offset,
            header_len: header.header_len,
            length: header.length,
            children: None,
        };
        offset = entry.value_end();
        entries.push(entry);
    }

    let siblings = first..entries.len();
    for index in siblings.clone() {
        if entries[index].tag.is_constructed() {
            let value = entries[index].value_start()..entries[index].value_end();
            let children = parse_siblings(data, entries, value, depth + 1, limits)?;
            entries[index].children = Some(children);
        }
    }
    Ok(siblings)
}

fn read_header(input: &[u8], offset: usize) -> Result<Header, Error> {
    let truncated = |needed: usize, available: usize| Error::Truncated {
        offset,
        needed,
        available,
    };

    let (rest, tag) = parse_tag(input).map_err(|_| truncated(1, 0))?;
    if tag.is_high_tag_number() {
        return Err(Error::HighTagNumber { offset });
    }
    let (rest, first) = parse_u8(rest).map_err(|_| truncated(1, 0))?;

    let (rest, length) = if first & 0x80 == 0 {
        // short form: 0-127
        (rest, first as u64)
    } else {
        // long form
        // First 1 bit is a marker for long form.
        // Other bits represent bytes length of the length field.
        let count = first & 0x7f;
        if count == 0 {
            return Err(Error::IndefiniteLength { offset });
        }
        if count > MAX_LENGTH_OCTETS {
            return Err(Error::InvalidLength { offset });
        }
        let available = rest.len();
        let (rest, bs) = take_bytes(rest, count as usize)
            .map_err(|_| truncated(count as usize, available))?;
        let length = bs.iter().fold(0u64, |n, &b| (n << 8) | b as u64);
        (rest, length)
    };

    let length = usize::try_from(length).map_err(|_| Error::InvalidLength { offset })?;
    Ok(Header {
        tag,
        header_len: input.len() - rest.len(),
        length,
    })
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag> {
    let (input, n) = parse_u8(input)?;
    Ok((input, Tag::from(n)))
}

fn parse_u8(input: &[u8]) -> IResult<&[u8], u8> {
    nom::number::complete::be_u8(input)
}

fn take_bytes(input: &[u8], count: usize) -> IResult<&[u8], &[u8]> {
    nom::bytes::complete::take(count).parse(input)
}

use std::fmt;

pub const TAG_CONSTRUCTED: u8 = 0x20;
const TAG_CLASS_MASK: u8 = 0xc0;
const TAG_NUMBER_MASK: u8 = 0x1f;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

/// A single-byte DER identifier octet.
///
/// Only low tag numbers (0-30) are representable, which covers everything
/// an X.509 certificate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u8);

impl Tag {
    pub const BOOLEAN: Tag = Tag(0x01);
    pub const INTEGER: Tag = Tag(0x02);
    pub const BIT_STRING: Tag = Tag(0x03);
    pub const OCTET_STRING: Tag = Tag(0x04);
    pub const NULL: Tag = Tag(0x05);
    pub const OBJECT_IDENTIFIER: Tag = Tag(0x06);
    pub const UTF8_STRING: Tag = Tag(0x0c);
    pub const PRINTABLE_STRING: Tag = Tag(0x13);
    pub const TELETEX_STRING: Tag = Tag(0x14);
    pub const IA5_STRING: Tag = Tag(0x16);
    pub const UTC_TIME: Tag = Tag(0x17);
    pub const GENERALIZED_TIME: Tag = Tag(0x18);
    pub const UNIVERSAL_STRING: Tag = Tag(0x1c);
    pub const BMP_STRING: Tag = Tag(0x1e);
    pub const SEQUENCE: Tag = Tag(0x30);
    pub const SET: Tag = Tag(0x31);

    pub const fn new(byte: u8) -> Self {
        Tag(byte)
    }

    /// Context-specific tag `[slot]`, e.g. `Tag::context(0, true)` is `0xa0`.
    pub const fn context(slot: u8, constructed: bool) -> Self {
        let constructed = if constructed { TAG_CONSTRUCTED } else { 0 };
        Tag(0x80 | constructed | (slot & TAG_NUMBER_MASK))
    }

    pub fn byte(&self) -> u8 {
        self.0
    }

    pub fn is_constructed(&self) -> bool {
        self.0 & TAG_CONSTRUCTED == TAG_CONSTRUCTED
    }

    pub fn class(&self) -> Class {
        match self.0 & TAG_CLASS_MASK {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }

    pub fn number(&self) -> u8 {
        self.0 & TAG_NUMBER_MASK
    }

    pub(crate) fn is_high_tag_number(&self) -> bool {
        self.number() == TAG_NUMBER_MASK
    }
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        Tag(value)
    }
}

impl From<Tag> for u8 {
    fn from(value: Tag) -> Self {
        value.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class() {
            Class::Universal => {
                let name = match *self {
                    Tag::BOOLEAN => "BOOLEAN",
                    Tag::INTEGER => "INTEGER",
                    Tag::BIT_STRING => "BIT STRING",
                    Tag::OCTET_STRING => "OCTET STRING",
                    Tag::NULL => "NULL",
                    Tag::OBJECT_IDENTIFIER => "OBJECT",
                    Tag::UTF8_STRING => "UTF8STRING",
                    Tag::PRINTABLE_STRING => "PRINTABLESTRING",
                    Tag::TELETEX_STRING => "T61STRING",
                    Tag::IA5_STRING => "IA5STRING",
                    Tag::UTC_TIME => "UTCTIME",
                    Tag::GENERALIZED_TIME => "GENERALIZEDTIME",
                    Tag::UNIVERSAL_STRING => "UNIVERSALSTRING",
                    Tag::BMP_STRING => "BMPSTRING",
                    Tag::SEQUENCE => "SEQUENCE",
                    Tag::SET => "SET",
                    _ => return write!(f, "UNIVERSAL {}", self.number()),
                };
                write!(f, "{}", name)
            }
            Class::Application => write!(f, "[APPLICATION {}]", self.number()),
            Class::ContextSpecific => write!(f, "cont [ {} ]", self.number()),
            Class::Private => write!(f, "[PRIVATE {}]", self.number()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Class, Tag};

    #[rstest(
        byte,
        class,
        number,
        constructed,
        case(0x02, Class::Universal, 2, false),
        case(0x30, Class::Universal, 16, true),
        case(0x31, Class::Universal, 17, true),
        case(0xa0, Class::ContextSpecific, 0, true),
        case(0xa3, Class::ContextSpecific, 3, true),
        case(0x82, Class::ContextSpecific, 2, false),
        case(0x61, Class::Application, 1, true),
        case(0xc4, Class::Private, 4, false)
    )]
    fn test_tag_bits(byte: u8, class: Class, number: u8, constructed: bool) {
        let tag = Tag::from(byte);
        assert_eq!(class, tag.class());
        assert_eq!(number, tag.number());
        assert_eq!(constructed, tag.is_constructed());
    }

    #[rstest]
    #[case::version(Tag::context(0, true), 0xa0)]
    #[case::extensions(Tag::context(3, true), 0xa3)]
    #[case::dns_name(Tag::context(2, false), 0x82)]
    fn test_context_tag(#[case] tag: Tag, #[case] expected: u8) {
        assert_eq!(expected, tag.byte());
    }

    #[rstest]
    #[case(Tag::SEQUENCE, "SEQUENCE")]
    #[case(Tag::context(3, true), "cont [ 3 ]")]
    #[case(Tag::new(0x09), "UNIVERSAL 9")]
    fn test_tag_display(#[case] tag: Tag, #[case] expected: &str) {
        assert_eq!(expected, tag.to_string());
    }
}

//! Error types for decoding typed ASN.1 values out of DER nodes.

use std::num::ParseIntError;

use der::Tag;
use thiserror::Error;

/// Errors that can occur while decoding ASN.1 values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("expected {expected}, found {actual}")]
    UnexpectedTag { expected: &'static str, actual: Tag },

    // Boolean errors
    #[error("BOOLEAN: invalid encoding")]
    InvalidBoolean,

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: non-minimal arc encoding")]
    ObjectIdentifierNonMinimal,
    #[error("OBJECT IDENTIFIER: arc does not fit in 64 bits")]
    ObjectIdentifierArcOverflow,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: invalid leading arcs {0}.{1}")]
    ObjectIdentifierInvalidRoot(u64, u64),
    #[error("OBJECT IDENTIFIER: invalid component: {0}")]
    ObjectIdentifierInvalidComponent(ParseIntError),

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),

    // String type errors
    #[error("UTF8String: invalid UTF-8")]
    Utf8StringInvalidUtf8,
    #[error("PrintableString: invalid encoding")]
    PrintableStringInvalidEncoding,
    #[error("IA5String: invalid encoding")]
    Ia5StringInvalidEncoding,
    #[error("BMPString: odd byte length {0}")]
    BmpStringOddLength(usize),
    #[error("BMPString: unpaired surrogate")]
    BmpStringInvalidCodePoint,
    #[error("UniversalString: byte length {0} is not a multiple of 4")]
    UniversalStringInvalidLength(usize),
    #[error("UniversalString: invalid code point 0x{0:08X}")]
    UniversalStringInvalidCodePoint(u32),

    // Time errors
    #[error("UTCTime: invalid format")]
    UtcTimeInvalidFormat,
    #[error("GeneralizedTime: invalid format")]
    GeneralizedTimeInvalidFormat,
    #[error("time zone offsets are not supported")]
    UnsupportedTimeZone,
}

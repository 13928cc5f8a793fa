use thiserror::Error;

/// Errors raised while splitting a buffer into DER TLV nodes.
///
/// Every variant carries the byte offset of the element whose header or
/// value could not be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("truncated at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("invalid length encoding at offset {offset}")]
    InvalidLength { offset: usize },
    #[error("indefinite length at offset {offset} is not allowed in DER")]
    IndefiniteLength { offset: usize },
    #[error("multi-byte tag number at offset {offset} is not supported")]
    HighTagNumber { offset: usize },
    #[error("nesting deeper than {limit} levels at offset {offset}")]
    MaxDepthExceeded { offset: usize, limit: usize },
    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },
}

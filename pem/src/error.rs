use base64::DecodeError;
use thiserror::Error;

/// Errors that can occur when locating or decoding PEM data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No opening boundary marker (e.g., `-----BEGIN CERTIFICATE-----`)
    #[error("missing a pre encapsulation boundary")]
    MissingPreEncapsulationBoundary,

    /// An opened block is never closed
    #[error("missing a post encapsulation boundary for {0}")]
    MissingPostEncapsulationBoundary(String),

    /// Nothing but whitespace between the boundary markers
    #[error("missing PEM data")]
    MissingData,

    /// The BEGIN and END labels do not match (e.g., BEGIN CERTIFICATE, END PRIVATE KEY)
    #[error("label doesn't match: BEGIN {begin}, END {end}")]
    LabelMissMatch { begin: String, end: String },

    /// The boundary pattern could not be built
    #[error("invalid encapsulation boundary")]
    InvalidEncapsulationBoundary,

    /// Failed to decode base64 data
    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),
}

//! Extension-specific error types

use thiserror::Error;

/// Context for where an extension error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Extension,
    BasicConstraints,
    KeyUsage,
    ExtendedKeyUsage,
    SubjectAltName,
    GeneralName,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extension => write!(f, "Extension"),
            Self::BasicConstraints => write!(f, "BasicConstraints"),
            Self::KeyUsage => write!(f, "KeyUsage"),
            Self::ExtendedKeyUsage => write!(f, "ExtendedKeyUsage"),
            Self::SubjectAltName => write!(f, "SubjectAltName"),
            Self::GeneralName => write!(f, "GeneralName"),
        }
    }
}

/// Extension parsing errors. They never abort an analysis: the extension
/// is logged and skipped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: expected SEQUENCE")]
    ExpectedSequence(Kind),

    #[error("{0}: empty sequence")]
    EmptySequence(Kind),

    #[error("{kind}: unexpected trailing element {tag}")]
    TrailingElement { kind: Kind, tag: der::Tag },

    #[error("{kind}: unexpected tag {tag}")]
    UnexpectedTag { kind: Kind, tag: der::Tag },

    #[error("{kind}: expected OCTET STRING, found {tag}")]
    ExpectedOctetString { kind: Kind, tag: der::Tag },

    #[error("BasicConstraints: pathLenConstraint out of range for u32")]
    PathLenConstraintOutOfRange,

    #[error("GeneralName: iPAddress must be 4 or 16 bytes, got {0}")]
    InvalidIpAddressLength(usize),

    #[error("GeneralName: invalid directoryName: {0}")]
    DirectoryName(#[from] crate::error::Error),

    #[error("invalid DER in extension value: {0}")]
    Der(#[from] der::error::Error),

    #[error("{kind}: {source}")]
    Asn1 {
        kind: Kind,
        source: asn1::error::Error,
    },
}

pub(crate) trait ExtensionContext<T> {
    fn kind(self, kind: Kind) -> Result<T, Error>;
}

impl<T> ExtensionContext<T> for Result<T, asn1::error::Error> {
    fn kind(self, kind: Kind) -> Result<T, Error> {
        self.map_err(|source| Error::Asn1 { kind, source })
    }
}

use std::fmt;

use thiserror::Error;

/// Errors returned by certificate analysis.
///
/// Every failure of a lower layer is folded into one of these five cases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid PEM: {0}")]
    InvalidPem(pem::error::Error),
    #[error("invalid base64 in PEM body: {0}")]
    InvalidBase64(pem::error::Error),
    #[error("truncated ASN.1: {0}")]
    TruncatedAsn1(der::error::Error),
    #[error("malformed certificate: {field}: {reason}")]
    MalformedCertificate { field: &'static str, reason: String },
    #[error("unsupported time format in {field}: {source}")]
    UnsupportedTimeFormat {
        field: &'static str,
        source: asn1::error::Error,
    },
}

/// The case of an [`Error`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPem,
    InvalidBase64,
    TruncatedAsn1,
    MalformedCertificate,
    UnsupportedTimeFormat,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidPem => "InvalidPem",
            ErrorKind::InvalidBase64 => "InvalidBase64",
            ErrorKind::TruncatedAsn1 => "TruncatedAsn1",
            ErrorKind::MalformedCertificate => "MalformedCertificate",
            ErrorKind::UnsupportedTimeFormat => "UnsupportedTimeFormat",
        };
        write!(f, "{}", s)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidPem(_) => ErrorKind::InvalidPem,
            Error::InvalidBase64(_) => ErrorKind::InvalidBase64,
            Error::TruncatedAsn1(_) => ErrorKind::TruncatedAsn1,
            Error::MalformedCertificate { .. } => ErrorKind::MalformedCertificate,
            Error::UnsupportedTimeFormat { .. } => ErrorKind::UnsupportedTimeFormat,
        }
    }

    pub(crate) fn malformed(field: &'static str, reason: impl ToString) -> Self {
        Error::MalformedCertificate {
            field,
            reason: reason.to_string(),
        }
    }

    /// Moves a field-level error onto `field`, keeping its reason.
    pub(crate) fn in_field(self, field: &'static str) -> Self {
        match self {
            Error::MalformedCertificate { reason, .. } => Error::MalformedCertificate { field, reason },
            Error::UnsupportedTimeFormat { source, .. } => {
                Error::UnsupportedTimeFormat { field, source }
            }
            other => other,
        }
    }
}

impl From<pem::error::Error> for Error {
    fn from(e: pem::error::Error) -> Self {
        match e {
            pem::error::Error::Base64Decode(_) => Error::InvalidBase64(e),
            _ => Error::InvalidPem(e),
        }
    }
}

impl From<der::error::Error> for Error {
    fn from(e: der::error::Error) -> Self {
        Error::TruncatedAsn1(e)
    }
}

/// Attaches the certificate field being decoded to an ASN.1 error.
pub(crate) trait FieldContext<T> {
    fn field(self, field: &'static str) -> Result<T, Error>;
}

impl<T> FieldContext<T> for Result<T, asn1::error::Error> {
    fn field(self, field: &'static str) -> Result<T, Error> {
        self.map_err(|e| match e {
            asn1::error::Error::UtcTimeInvalidFormat
            | asn1::error::Error::GeneralizedTimeInvalidFormat
            | asn1::error::Error::UnsupportedTimeZone => {
                Error::UnsupportedTimeFormat { field, source: e }
            }
            other => Error::malformed(field, other),
        })
    }
}

//! X.509 certificate analysis.
//!
//! [`analyze`] takes PEM text and returns a [`CertificateInfo`]: names,
//! validity, key, extensions and fingerprints. The pipeline is
//! PEM → DER bytes → [`der::Der`] node tree → [`extract`].
//!
//! ```no_run
//! let text = std::fs::read_to_string("cert.pem").unwrap();
//! let info = x509::analyze(&text).unwrap();
//! println!("{} expires in {} days", info.subject, info.validity.days_remaining);
//! ```

use chrono::{DateTime, Utc};
use der::{Der, Limits};
use kensa::decoder::Decoder;
use pem::Pem;

mod certificate;
pub mod error;
pub mod extensions;
mod fingerprint;
mod key_info;
mod name;
pub mod oid_name;
mod validity;

pub use certificate::{CertificateInfo, extract};
use error::Error;
pub use fingerprint::{FingerprintAlgorithm, Fingerprints, fingerprint};
pub use key_info::KeyInfo;
pub use name::Name;
pub use oid_name::{OidName, resolve_oid_name};
pub use validity::Validity;

/// Certificate analysis with configurable parser limits and clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer {
    limits: Limits,
    now: Option<DateTime<Utc>>,
}

impl Analyzer {
    /// Evaluates validity against `now` instead of the system clock.
    pub fn at(now: DateTime<Utc>) -> Self {
        Analyzer {
            now: Some(now),
            ..Default::default()
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Analyzes the first certificate block in `text`.
    ///
    /// Text around the block and blocks with other labels are ignored.
    /// `raw` in the result is `text` itself.
    pub fn analyze(&self, text: &str) -> Result<CertificateInfo, Error> {
        let pem = Pem::find_certificate(text)?;
        let der: Vec<u8> = pem.decode()?;
        let mut info = self.analyze_der(&der)?;
        info.raw = text.to_string();
        Ok(info)
    }

    /// Analyzes a DER-encoded certificate. `raw` in the result is the
    /// re-armored PEM.
    pub fn analyze_der(&self, der: &[u8]) -> Result<CertificateInfo, Error> {
        let parsed = Der::parse_with_limits(der, self.limits)?;
        let mut elements = parsed.elements();
        let (Some(root), None) = (elements.next(), elements.next()) else {
            return Err(Error::malformed(
                "certificate",
                "expected exactly one top-level element",
            ));
        };
        let now = self.now.unwrap_or_else(Utc::now);
        tracing::debug!(size = der.len(), nodes = parsed.node_count(), "parsed certificate");
        extract(root, der, now)
    }
}

/// Analyzes PEM text with default limits against the current time.
pub fn analyze(text: &str) -> Result<CertificateInfo, Error> {
    Analyzer::default().analyze(text)
}

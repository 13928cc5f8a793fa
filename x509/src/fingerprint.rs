use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintAlgorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl std::fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FingerprintAlgorithm::Sha1 => write!(f, "SHA1"),
            FingerprintAlgorithm::Sha256 => write!(f, "SHA256"),
            FingerprintAlgorithm::Sha512 => write!(f, "SHA512"),
        }
    }
}

fn format_digest(digest: &[u8]) -> String {
    digest
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Digest of `der` as uppercase, colon-separated hex pairs.
///
/// The input is the whole certificate encoding; no sub-structure is hashed.
pub fn fingerprint(der: &[u8], alg: FingerprintAlgorithm) -> String {
    match alg {
        FingerprintAlgorithm::Sha1 => format_digest(&Sha1::digest(der)),
        FingerprintAlgorithm::Sha256 => format_digest(&Sha256::digest(der)),
        FingerprintAlgorithm::Sha512 => format_digest(&Sha512::digest(der)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprints {
    pub sha256: String,
    pub sha1: String,
}

impl Fingerprints {
    pub fn of(der: &[u8]) -> Self {
        Fingerprints {
            sha256: fingerprint(der, FingerprintAlgorithm::Sha256),
            sha1: fingerprint(der, FingerprintAlgorithm::Sha1),
        }
    }
}

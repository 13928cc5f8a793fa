//! # kensa
//!
//! Conversion traits shared by every layer of the kensa certificate analyzer.
//!
//! The analyzer is a pipeline of small, typed steps:
//! ```text
//! &str → Pem → Vec<u8> → Der → typed ASN.1 values → CertificateInfo
//! ```
//!
//! Each step is expressed as an implementation of [`decoder::Decoder`], so a
//! call site reads as a chain of `decode()` calls whose target type is picked
//! by annotation:
//!
//! ```ignore
//! use kensa::decoder::Decoder;
//!
//! let pem: pem::Pem = text.decode()?;
//! let bytes: Vec<u8> = pem.decode()?;
//! let der: der::Der = bytes.decode()?;
//! ```
//!
//! The reverse direction (used for OID and PEM re-encoding) goes through
//! [`encoder::Encoder`].

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;

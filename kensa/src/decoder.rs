//! Decoder trait for typed conversions between pipeline stages.
//!
//! A conversion from `T` to `D` needs two impls:
//!
//! 1. `DecodableFrom<T> for D` - marks the pair as valid
//! 2. `Decoder<T, D> for T` - performs the conversion
//!
//! The marker keeps the set of conversions explicit: a stage can only be
//! decoded into the types that opted in.
//!
//! ```no_run
//! use kensa::decoder::{DecodableFrom, Decoder};
//!
//! struct Armored(String);
//! struct Raw(Vec<u8>);
//!
//! #[derive(Debug)]
//! struct ArmorError;
//!
//! impl DecodableFrom<Armored> for Raw {}
//!
//! impl Decoder<Armored, Raw> for Armored {
//!     type Error = ArmorError;
//!
//!     fn decode(&self) -> Result<Raw, Self::Error> {
//!         Ok(Raw(self.0.as_bytes().to_vec()))
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into `D`.
///
/// Several `Decoder` impls usually exist on the same source type, one per
/// target, so callers select the target with a type annotation.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is not a valid encoding of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait: `Self` can be decoded from `T`.
pub trait DecodableFrom<T> {}

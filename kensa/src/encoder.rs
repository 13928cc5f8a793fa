//! Encoder trait, the reverse of [`crate::decoder::Decoder`].

/// Converts `self` (of type `T`) into its encoded form `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait: `Self` is a valid encoding target for `T`.
pub trait EncodableTo<T> {}

//! Serialization of published messages.
//!
//! This module contains the `Serializer` trait which is used to implement
//! encoding of Rust data structures into wire payloads.

use super::ImageTransportError;

/// Trait for serializing Rust data structures.
///
/// This trait is used by the transport encoders to produce payloads which
/// the matching subscriber plugin is able to decode.
///
/// To implement this trait, you must provide a `serialize` method that
/// takes a `&T` and returns a `Result<Vec<u8>, ImageTransportError>`.
pub trait Serializer<T>: Send + Sync {
    /// Serialize a `&T` into a `Result<Vec<u8>, ImageTransportError>`.
    ///
    /// # Errors
    ///
    /// This method should return [`ImageTransportError::Serialization`] if
    /// the serialization fails.
    fn serialize(&self, object: &T) -> Result<Vec<u8>, ImageTransportError>;
}

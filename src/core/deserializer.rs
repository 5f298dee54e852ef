//! Deserialization of received messages.
//!
//! This module contains the `Deserializer` trait which is used to implement
//! decoding of wire payloads into Rust data structures.

use super::ImageTransportError;

/// Trait for deserializing Rust data structures.
///
/// This trait is used by the [`transport`] plugins to decode payloads received
/// from the messaging host.
///
/// To implement this trait, you must provide a `deserialize` method that
/// takes a `&[u8]` and returns a `Result<T, ImageTransportError>`.
///
/// # Examples
/// ```
/// use image_transport::core::{Deserializer, Image, ImageTransportError};
///
/// struct MyDeserializer;
///
/// impl Deserializer<Image> for MyDeserializer {
///    fn deserialize(&self, bytes: &[u8]) -> Result<Image, ImageTransportError> {
///         // ...
///         # unimplemented!()
///    }
/// }
/// ```
///
/// [`transport`]: ../transport/index.html
pub trait Deserializer<T>: Send + Sync {
    /// Deserialize a `&[u8]` into a `Result<T, ImageTransportError>`.
    fn deserialize(&self, bytes: &[u8]) -> Result<T, ImageTransportError>;
}

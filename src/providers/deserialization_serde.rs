//! Serde implementation for [`Deserializer`] trait.
//!
//! This module provides a `serde` deserializer for JSON encoded payloads.
//!
//! # Examples
//! ```
//! use image_transport::core::{Deserializer, Image};
//! use image_transport::providers::deserialization_serde::DeserializerSerde;
//!
//! let payload = serde_json::to_vec(&Image::default()).unwrap();
//! let image: Image = DeserializerSerde.deserialize(&payload).unwrap();
//!
//! assert_eq!(image, Image::default());
//! ```
//!
//! [`Deserializer`]: crate::core::Deserializer

use crate::core::{Deserializer, ImageTransportError};

/// Serde implementation for [`Deserializer`] trait.
///
/// This struct implements the [`Deserializer`] trait for the [`serde`] crate.
/// It is used by the bundled transport plugins to decode received payloads.
///
/// [`Deserializer`]: crate::core::Deserializer
/// [`serde`]: https://crates.io/crates/serde
#[derive(Debug, Clone, Copy, Default)]
pub struct DeserializerSerde;

impl<T> Deserializer<T> for DeserializerSerde
where
    T: for<'de> serde::Deserialize<'de>,
{
    fn deserialize(&self, bytes: &[u8]) -> Result<T, ImageTransportError> {
        serde_json::from_slice(bytes).map_err(|e| ImageTransportError::Deserialization {
            details: e.to_string(),
        })
    }
}

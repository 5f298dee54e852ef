//! Serde implementation for [`Serializer`] trait.
//!
//! This module provides a `serde` serializer which produces JSON payloads.
//!
//! # Examples
//! ```
//! use image_transport::core::Serializer;
//! use image_transport::providers::serialization_serde::SerializerSerde;
//!
//! #[derive(serde::Serialize)]
//! struct Foo {
//!    bar: String,
//! }
//!
//! let foo = Foo { bar: "baz".to_string() };
//! assert_eq!(SerializerSerde.serialize(&foo).unwrap(), b"{\"bar\":\"baz\"}".to_vec());
//! ```
//!
//! [`Serializer`]: crate::core::Serializer

use crate::core::{ImageTransportError, Serializer};

/// Serde implementation for [`Serializer`] trait.
///
/// [`Serializer`]: crate::core::Serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializerSerde;

impl<T> Serializer<T> for SerializerSerde
where
    T: serde::Serialize,
{
    fn serialize(&self, object: &T) -> Result<Vec<u8>, ImageTransportError> {
        serde_json::to_vec(object).map_err(|e| ImageTransportError::Serialization {
            details: e.to_string(),
        })
    }
}

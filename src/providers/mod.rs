//! # Providers module
//!
//! This module contains the codec providers used by the bundled transport
//! plugins.
//! It is intended to be used by the [`image_transport`] crate.
//!
//! [`image_transport`]: ../index.html

#[cfg(feature = "serde")]
pub mod serialization_serde;

#[cfg(feature = "serde")]
pub mod deserialization_serde;

//! # Image transport developer experience
//!
//! This module provides the user facing handles of the image transport
//! crate.
//! It is intended to be used by the [`image_transport`] crate.
//!
//! [`image_transport`]: ../index.html

#[doc(inline)]
pub use image_subscriber::{ImageSubscriber, DEFAULT_TRANSPORT, TRANSPORT_PARAM};
pub mod image_subscriber;

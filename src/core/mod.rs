//! # Image transport core
//!
//! Core functionality of the image transport crate.
//!
//! This module contains the message types, the error type and the contracts
//! between subscription handles, transport plugins and the messaging host.
//! It is intended to be used by the [`image_transport`] crate.
//!
//! [`image_transport`]: ../index.html

#[doc(inline)]
pub use error::ImageTransportError;
pub mod error;

#[doc(inline)]
pub use image::{CompressedImage, Header, Image, ImageConstPtr, Time};
pub mod image;

#[doc(inline)]
pub use transport_hints::{Protocol, TransportHints, TransportHintsBuilder};
pub mod transport_hints;

#[doc(inline)]
pub use tracked_object::TrackedObject;
pub mod tracked_object;

#[doc(inline)]
pub use node_handle::{NodeHandle, SubscribeOptions, TopicSubscription, WireCallback, WireMessage};
pub mod node_handle;

#[doc(inline)]
pub use deserializer::Deserializer;
pub mod deserializer;

#[doc(inline)]
pub use serializer::Serializer;
pub mod serializer;

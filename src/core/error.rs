//! # Error types
//!
//! This module contains the error types for the [`image_transport`] crate.
//!
//! [`image_transport`]: ../index.html

use snafu::Snafu;

/// Image transport error type
///
/// This type is used to represent errors that can occur while establishing
/// image subscriptions or decoding received messages.
/// It is used as the error type for the [`Result`] type.
///
/// # Examples
/// ```
/// use image_transport::core::ImageTransportError;
///
/// fn foo() -> Result<(), ImageTransportError> {
///   Ok(())
/// }
///
/// foo().map_err(|e| match e {
///   ImageTransportError::InvalidTopic { .. } => println!("Invalid topic"),
///   ImageTransportError::PluginNotFound { .. } => println!("Unknown transport"),
///   _ => println!("Other error"),
/// });
/// ```
///
/// [`Result`]: https://doc.rust-lang.org/std/result/enum.Result.html
#[derive(Snafu, Debug, Clone, PartialEq, Eq)]
pub enum ImageTransportError {
    /// this error is returned when the topic name can't be used
    #[snafu(display("Invalid topic error: {details}"))]
    InvalidTopic {
        ///docs
        details: String,
    },

    /// this error is returned when there is no plugin for requested transport
    #[snafu(display("Plugin not found error: {details}"))]
    PluginNotFound {
        ///docs
        details: String,
    },

    /// this error is returned when a transport name is registered twice
    #[snafu(display("Plugin already registered error: {details}"))]
    PluginAlreadyRegistered {
        ///docs
        details: String,
    },

    /// this error is returned when the host refuses the subscription
    #[snafu(display("Subscribe error: {details}"))]
    Subscribe {
        ///docs
        details: String,
    },

    /// this error is returned when a message can't be encoded
    #[snafu(display("Serialization error: {details}"))]
    Serialization {
        ///docs
        details: String,
    },

    /// this error is returned when the received payload can't be decoded
    #[snafu(display("Deserialization error: {details}"))]
    Deserialization {
        ///docs
        details: String,
    },

    /// this error is returned when the compressed payload can't be inflated
    #[snafu(display("Decompression error: {details}"))]
    Decompression {
        ///docs
        details: String,
    },

    /// this error is returned when transport hints are inconsistent
    #[snafu(display("Transport hints error: {details}"))]
    TransportHints {
        ///docs
        details: String,
    },
}

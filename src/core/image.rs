//! # Image messages
//!
//! This module contains the image-like message types delivered to subscriber
//! callbacks and the [`CompressedImage`] envelope used by the `compressed`
//! transport.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shared, immutable image passed to subscriber callbacks.
pub type ImageConstPtr = Arc<Image>;

/// Point in time at which an image has been captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Time {
    /// Seconds part.
    pub sec: u32,

    /// Nanoseconds part.
    pub nsec: u32,
}

impl Time {
    /// Create time stamp from seconds and nanoseconds.
    pub fn new(sec: u32, nsec: u32) -> Self {
        Self { sec, nsec }
    }
}

/// Standard metadata shared by image messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// Sequence number assigned by the publisher.
    pub seq: u32,

    /// Acquisition time.
    pub stamp: Time,

    /// Frame this image is associated with.
    pub frame_id: String,
}

/// Uncompressed image.
///
/// Pixel data is stored row by row, `step` bytes per row, so `data` holds
/// `step * height` bytes for well-formed images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Image {
    /// Image metadata.
    pub header: Header,

    /// Number of rows.
    pub height: u32,

    /// Number of columns.
    pub width: u32,

    /// Pixel encoding (e.g. `rgb8`, `mono16`).
    pub encoding: String,

    /// Whether multi-byte pixel values are big endian.
    pub is_bigendian: bool,

    /// Full row length in bytes.
    pub step: u32,

    /// Pixel data.
    pub data: Vec<u8>,
}

impl Image {
    /// Create image with provided dimensions and pixel data.
    pub fn new<S>(
        header: Header,
        height: u32,
        width: u32,
        encoding: S,
        step: u32,
        data: Vec<u8>,
    ) -> Self
    where
        S: Into<String>,
    {
        Self {
            header,
            height,
            width,
            encoding: encoding.into(),
            is_bigendian: false,
            step,
            data,
        }
    }

    /// Pixel data size in bytes implied by `step` and `height`.
    pub fn declared_size(&self) -> u64 {
        u64::from(self.step) * u64::from(self.height)
    }
}

/// Compressed image envelope.
///
/// Carries the metadata of the original [`Image`] (with empty `data`) and the
/// compressed pixel buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressedImage {
    /// Original image without pixel data.
    pub image: Image,

    /// Compression format of `data` (e.g. `gzip`).
    pub format: String,

    /// Compressed pixel data.
    pub data: Vec<u8>,
}

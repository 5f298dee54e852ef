//! # Compressed transport
//!
//! Images are published on `<base topic>/compressed` as a [`CompressedImage`]
//! which carries the original image metadata and gzip compressed pixels.

use std::io::Read;

use bytes::Bytes;
use flate2::{
    read::{GzDecoder, GzEncoder},
    Compression,
};

use crate::{
    core::{CompressedImage, Deserializer, Image, ImageTransportError, Serializer},
    providers::{deserialization_serde::DeserializerSerde, serialization_serde::SerializerSerde},
    transport::DecodingSubscriber,
};

/// Name of the compressed transport.
pub const TRANSPORT_NAME: &str = "compressed";

/// Compression format understood by the transport.
pub const FORMAT: &str = "gzip";

/// Default gzip compression level.
pub const DEFAULT_LEVEL: u32 = 6;

/// Decodes [`CompressedImage`] payloads into inflated [`Image`]s.
#[derive(Debug, Clone, Default)]
pub struct CompressedImageDeserializer<D = DeserializerSerde> {
    deserializer: D,
}

impl<D> CompressedImageDeserializer<D> {
    /// Create decoder which reads envelopes with `deserializer`.
    pub fn new(deserializer: D) -> Self {
        Self { deserializer }
    }
}

impl<D> Deserializer<Image> for CompressedImageDeserializer<D>
where
    D: Deserializer<CompressedImage>,
{
    fn deserialize(&self, bytes: &[u8]) -> Result<Image, ImageTransportError> {
        decompress(self.deserializer.deserialize(bytes)?)
    }
}

/// Compressed transport subscriber.
pub fn subscriber() -> DecodingSubscriber {
    DecodingSubscriber::new(
        TRANSPORT_NAME,
        Some(TRANSPORT_NAME),
        CompressedImageDeserializer::<DeserializerSerde>::default(),
    )
}

/// Compress pixel data of `image`.
///
/// `level` is clamped to the `1..=9` range.
pub fn compress(image: &Image, level: u32) -> Result<CompressedImage, ImageTransportError> {
    let mut encoder = GzEncoder::new(&image.data[..], Compression::new(level.clamp(1, 9)));
    let mut data = Vec::new();
    encoder
        .read_to_end(&mut data)
        .map_err(|e| ImageTransportError::Serialization {
            details: format!("gzip compress: {e}"),
        })?;

    Ok(CompressedImage {
        image: Image {
            header: image.header.clone(),
            height: image.height,
            width: image.width,
            encoding: image.encoding.clone(),
            is_bigendian: image.is_bigendian,
            step: image.step,
            data: Vec::new(),
        },
        format: FORMAT.into(),
        data,
    })
}

/// Restore original image from `compressed` envelope.
///
/// Inflated pixel data must be exactly `step * height` bytes long, as stated
/// by the envelope metadata. Inflation stops as soon as that size is
/// exceeded.
pub fn decompress(compressed: CompressedImage) -> Result<Image, ImageTransportError> {
    if !compressed.format.eq_ignore_ascii_case(FORMAT) {
        return Err(ImageTransportError::Decompression {
            details: format!("unsupported format '{}'", compressed.format),
        });
    }

    let expected = compressed.image.declared_size();
    let mut decoder = GzDecoder::new(&compressed.data[..]).take(expected.saturating_add(1));
    let mut data = Vec::new();
    decoder
        .read_to_end(&mut data)
        .map_err(|e| ImageTransportError::Decompression {
            details: format!("gzip decompress: {e}"),
        })?;

    let inflated = data.len() as u64;
    if inflated > expected {
        return Err(ImageTransportError::Decompression {
            details: format!("inflated data exceeds step * height = {expected} bytes"),
        });
    } else if inflated < expected {
        return Err(ImageTransportError::Decompression {
            details: format!(
                "inflated {inflated} bytes, expected step * height = {expected} bytes"
            ),
        });
    }

    let mut image = compressed.image;
    image.data = data;

    Ok(image)
}

/// Encode `image` the way [`subscriber`] expects it on the wire.
pub fn encode(image: &Image, level: u32) -> Result<Bytes, ImageTransportError> {
    SerializerSerde
        .serialize(&compress(image, level)?)
        .map(Bytes::from)
}

#[cfg(test)]
mod it_should {
    use super::*;
    use crate::{
        core::{Header, Time},
        transport::SubscriberPlugin,
    };

    fn image() -> Image {
        Image::new(
            Header {
                seq: 3,
                stamp: Time::new(10, 20),
                frame_id: "camera".into(),
            },
            2,
            4,
            "mono8",
            4,
            vec![0, 0, 0, 0, 255, 255, 255, 255],
        )
    }

    #[test]
    fn restore_compressed_image() {
        let compressed = compress(&image(), DEFAULT_LEVEL).unwrap();

        assert_eq!(compressed.format, FORMAT);
        assert!(compressed.image.data.is_empty());
        assert_eq!(decompress(compressed).unwrap(), image());
    }

    #[test]
    fn decode_wire_payload() {
        let payload = encode(&image(), 1).unwrap();
        let decoded = CompressedImageDeserializer::<DeserializerSerde>::default()
            .deserialize(&payload)
            .unwrap();

        assert_eq!(decoded, image());
    }

    #[test]
    fn reject_unsupported_format() {
        let mut compressed = compress(&image(), DEFAULT_LEVEL).unwrap();
        compressed.format = "png".into();

        assert!(matches!(
            decompress(compressed),
            Err(ImageTransportError::Decompression { .. })
        ));
    }

    #[test]
    fn reject_corrupted_data() {
        let mut compressed = compress(&image(), DEFAULT_LEVEL).unwrap();
        compressed.data = vec![1, 2, 3];

        assert!(decompress(compressed).is_err());
    }

    #[test]
    fn reject_data_larger_than_declared() {
        let mut large = image();
        large.height = 1024;
        large.step = 1024;
        large.data = vec![0; 1024 * 1024];
        let mut compressed = compress(&large, DEFAULT_LEVEL).unwrap();
        compressed.image.height = 1;
        compressed.image.step = 1;

        match decompress(compressed) {
            Err(ImageTransportError::Decompression { details }) => {
                assert!(details.contains("expected step * height = 1"))
            }
            _ => panic!("Unexpected result"),
        }
    }

    #[test]
    fn reject_data_smaller_than_declared() {
        let mut compressed = compress(&image(), DEFAULT_LEVEL).unwrap();
        compressed.image.height = 3;

        assert!(matches!(
            decompress(compressed),
            Err(ImageTransportError::Decompression { .. })
        ));
    }

    #[test]
    fn use_suffixed_topic() {
        let plugin = subscriber();

        assert_eq!(plugin.transport_name(), TRANSPORT_NAME);
        assert_eq!(plugin.topic_suffix(), Some("compressed"));
    }
}

//! # Raw transport
//!
//! Images are published unmodified on the base topic.

use crate::{
    core::{Deserializer, Image},
    transport::DecodingSubscriber,
};

#[cfg(feature = "serde")]
use crate::{
    core::{ImageTransportError, Serializer},
    providers::{deserialization_serde::DeserializerSerde, serialization_serde::SerializerSerde},
};
#[cfg(feature = "serde")]
use bytes::Bytes;

/// Name of the raw transport.
pub const TRANSPORT_NAME: &str = "raw";

/// Raw transport subscriber decoding JSON payloads.
#[cfg(feature = "serde")]
pub fn subscriber() -> DecodingSubscriber {
    subscriber_with_deserializer(DeserializerSerde)
}

/// Raw transport subscriber decoding payloads with `deserializer`.
pub fn subscriber_with_deserializer<D>(deserializer: D) -> DecodingSubscriber
where
    D: Deserializer<Image> + 'static,
{
    DecodingSubscriber::new(TRANSPORT_NAME, None, deserializer)
}

/// Encode `image` the way [`subscriber`] expects it on the wire.
#[cfg(feature = "serde")]
pub fn encode(image: &Image) -> Result<Bytes, ImageTransportError> {
    SerializerSerde.serialize(image).map(Bytes::from)
}

#[cfg(all(test, feature = "serde"))]
mod it_should {
    use super::*;
    use crate::{core::Header, transport::SubscriberPlugin};

    #[test]
    fn decode_encoded_image() {
        let image = Image::new(Header::default(), 1, 2, "mono8", 2, vec![7, 9]);
        let payload = encode(&image).unwrap();

        let decoded: Image = DeserializerSerde.deserialize(&payload).unwrap();

        assert_eq!(decoded, image);
    }

    #[test]
    fn use_base_topic() {
        let plugin = subscriber();

        assert_eq!(plugin.transport_name(), TRANSPORT_NAME);
        assert!(plugin.topic_suffix().is_none());
        assert!(plugin.topic().is_none());
    }
}

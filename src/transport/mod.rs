//! # Transport module
//!
//! This module contains the [`SubscriberPlugin`] trait implemented by every
//! image transport, the [`DecodingSubscriber`] used by the bundled transports
//! and the [`PluginLoader`] registry used to pick a transport by name.
//!
//! You can implement [`SubscriberPlugin`] for your own transports and make
//! them available to [`ImageSubscriber`] by registering a factory in a
//! [`PluginLoader`].
//!
//! [`ImageSubscriber`]: crate::ImageSubscriber

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use log::{debug, warn};

use crate::core::{
    Deserializer, Image, ImageConstPtr, ImageTransportError, NodeHandle, SubscribeOptions,
    TopicSubscription, TrackedObject, TransportHints, WireCallback, WireMessage,
};

#[doc(inline)]
pub use loader::{PluginFactory, PluginLoader};
pub mod loader;

pub mod raw;

#[cfg(feature = "compressed")]
pub mod compressed;

/// User callback invoked with every decoded image.
pub type ImageCallback = Arc<dyn Fn(ImageConstPtr) + Send + Sync>;

/// Image transport subscriber plugin.
///
/// Plugin knows which wire topic carries the transport-specific
/// representation of a base image topic and how to turn received payloads
/// back into [`Image`] messages.
pub trait SubscriberPlugin: Send + Sync {
    /// Name under which the transport is known (`raw`, `compressed`, ...).
    fn transport_name(&self) -> &str;

    /// Suffix appended to the base topic to get the wire topic.
    ///
    /// `None` means the transport publishes on the base topic itself.
    fn topic_suffix(&self) -> Option<&str> {
        None
    }

    /// Subscribe to the transport-specific topic derived from `base_topic`.
    ///
    /// `base_topic` is resolved with [`NodeHandle::resolve_name`] before the
    /// transport suffix is appended.
    ///
    /// Previous registration of the plugin (if any) is cancelled first.
    ///
    /// # Errors
    /// Returns errors reported by the messaging host.
    fn subscribe(
        &mut self,
        nh: &dyn NodeHandle,
        base_topic: &str,
        queue_size: u32,
        callback: ImageCallback,
        tracked_object: Option<TrackedObject>,
        transport_hints: &TransportHints,
    ) -> Result<(), ImageTransportError>;

    /// Fully qualified wire topic, if subscribed.
    fn topic(&self) -> Option<String>;

    /// Number of publishers on the wire topic.
    fn num_publishers(&self) -> usize;

    /// Cancel host registration.
    fn shutdown(&mut self);
}

/// Wire topic used by transport with `suffix` for `base_topic`.
pub fn transport_topic(base_topic: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) if !suffix.is_empty() => {
            format!("{}/{suffix}", base_topic.trim_end_matches('/'))
        }
        _ => base_topic.into(),
    }
}

/// Subscriber plugin which decodes every payload with a [`Deserializer`].
///
/// Payloads which can't be decoded are logged and dropped, the user callback
/// is called only with successfully decoded images.
pub struct DecodingSubscriber {
    transport_name: String,
    topic_suffix: Option<String>,
    deserializer: Arc<dyn Deserializer<Image>>,
    subscription: Option<Box<dyn TopicSubscription>>,
}

impl DecodingSubscriber {
    /// Create plugin for `transport_name` transport.
    pub fn new<S, D>(transport_name: S, topic_suffix: Option<&str>, deserializer: D) -> Self
    where
        S: Into<String>,
        D: Deserializer<Image> + 'static,
    {
        Self {
            transport_name: transport_name.into(),
            topic_suffix: topic_suffix.map(Into::into),
            deserializer: Arc::new(deserializer),
            subscription: None,
        }
    }

    fn wire_callback(&self, callback: ImageCallback) -> WireCallback {
        let deserializer = self.deserializer.clone();
        let transport_name = self.transport_name.clone();

        Arc::new(move |message: &WireMessage| {
            match deserializer.deserialize(&message.payload) {
                Ok(image) => callback(Arc::new(image)),
                Err(err) => warn!(
                    "Dropping {transport_name} message received on {}: {err}",
                    message.topic
                ),
            }
        })
    }
}

impl SubscriberPlugin for DecodingSubscriber {
    fn transport_name(&self) -> &str {
        &self.transport_name
    }

    fn topic_suffix(&self) -> Option<&str> {
        self.topic_suffix.as_deref()
    }

    fn subscribe(
        &mut self,
        nh: &dyn NodeHandle,
        base_topic: &str,
        queue_size: u32,
        callback: ImageCallback,
        tracked_object: Option<TrackedObject>,
        transport_hints: &TransportHints,
    ) -> Result<(), ImageTransportError> {
        self.shutdown();

        let topic = transport_topic(&nh.resolve_name(base_topic), self.topic_suffix());
        let subscription = nh.subscribe(SubscribeOptions {
            topic,
            queue_size,
            callback: self.wire_callback(callback),
            tracked_object,
            transport_hints: transport_hints.clone(),
        })?;

        debug!(
            "Subscribed {} transport to {}",
            self.transport_name,
            subscription.topic()
        );
        self.subscription = Some(subscription);

        Ok(())
    }

    fn topic(&self) -> Option<String> {
        self.subscription
            .as_ref()
            .map(|subscription| subscription.topic().into())
    }

    fn num_publishers(&self) -> usize {
        self.subscription
            .as_ref()
            .map_or(0, |subscription| subscription.num_publishers())
    }

    fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            debug!(
                "Shutting down {} transport on {}",
                self.transport_name,
                subscription.topic()
            );
            subscription.shutdown();
        }
    }
}

impl Drop for DecodingSubscriber {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Debug for DecodingSubscriber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "DecodingSubscriber {{ transport: {}, topic: {:?} }}",
            self.transport_name,
            self.topic()
        )
    }
}

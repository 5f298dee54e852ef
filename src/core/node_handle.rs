//! # Node handle module
//!
//! This module contains the [`NodeHandle`] trait, which represents the
//! messaging host able to register topic subscriptions, and the
//! [`TopicSubscription`] trait for the registrations it hands out.
//!
//! You can implement these traits on top of your own middleware, or use
//! [`LocalNode`] for in-process messaging.
//!
//! [`LocalNode`]: crate::node::LocalNode

use std::{
    fmt::{Debug, Formatter, Result},
    sync::Arc,
};

use bytes::Bytes;

use crate::core::{ImageTransportError, TrackedObject, TransportHints};

/// Callback invoked by the host for each message received on the topic.
pub type WireCallback = Arc<dyn Fn(&WireMessage) + Send + Sync>;

/// Message as it has been received from the messaging host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    /// Topic on which the message has been received.
    pub topic: String,

    /// Encoded message.
    pub payload: Bytes,
}

/// Parameters of a topic subscription request.
#[derive(Clone)]
pub struct SubscribeOptions {
    /// Topic which should be subscribed.
    pub topic: String,

    /// Maximum number of buffered and not yet delivered messages.
    ///
    /// `0` lets the host pick its default.
    pub queue_size: u32,

    /// Message handler.
    pub callback: WireCallback,

    /// Object which should be alive for `callback` to be called.
    pub tracked_object: Option<TrackedObject>,

    /// Subscriber transport preferences.
    pub transport_hints: TransportHints,
}

impl Debug for SubscribeOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "SubscribeOptions {{ topic: {}, queue_size: {}, tracked_object: {:?}, \
            transport_hints: {:?} }}",
            self.topic, self.queue_size, self.tracked_object, self.transport_hints
        )
    }
}

/// Messaging host trait.
///
/// Types which implement this trait register topic subscriptions and deliver
/// received messages to the provided callbacks. Which thread runs callbacks,
/// and when, is up to the implementation.
///
/// # Examples
/// ```
/// use image_transport::core::{
///     ImageTransportError, NodeHandle, SubscribeOptions, TopicSubscription,
/// };
///
/// struct NullSubscription(String);
///
/// impl TopicSubscription for NullSubscription {
///     fn topic(&self) -> &str {
///         &self.0
///     }
///
///     fn num_publishers(&self) -> usize {
///         0
///     }
///
///     fn shutdown(&self) {}
/// }
///
/// struct NullNode;
///
/// impl NodeHandle for NullNode {
///     fn subscribe(
///         &self,
///         options: SubscribeOptions,
///     ) -> Result<Box<dyn TopicSubscription>, ImageTransportError> {
///         Ok(Box::new(NullSubscription(options.topic)))
///     }
///
///     fn param(&self, _key: &str) -> Option<String> {
///         None
///     }
/// }
/// ```
pub trait NodeHandle: Send + Sync {
    /// Register subscription described by `options`.
    ///
    /// # Errors
    /// Should return an [`ImageTransportError::Subscribe`] if the host can't
    /// register subscription.
    fn subscribe(
        &self,
        options: SubscribeOptions,
    ) -> std::result::Result<Box<dyn TopicSubscription>, ImageTransportError>;

    /// Value of host parameter with `key` name.
    fn param(&self, key: &str) -> Option<String>;

    /// Fully qualified name for `name`.
    fn resolve_name(&self, name: &str) -> String {
        name.into()
    }
}

/// Active topic registration.
///
/// Registration is cancelled by [`TopicSubscription::shutdown`]; calling it
/// more than once has no effect.
pub trait TopicSubscription: Send + Sync {
    /// Fully qualified name of subscribed topic.
    fn topic(&self) -> &str;

    /// Number of publishers currently advertising the topic.
    fn num_publishers(&self) -> usize;

    /// Stop delivering messages to the registration callback.
    fn shutdown(&self);
}

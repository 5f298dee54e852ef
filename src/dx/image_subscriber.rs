//! # Image subscriber module
//!
//! This module contains the [`ImageSubscriber`] handle, which manages a
//! subscription callback on a topic that can be interpreted as an image
//! topic, whatever transport is used to carry the images.

use std::{
    any::Any,
    cmp::Ordering,
    fmt::{Debug, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    sync::Arc,
};

use log::debug;
use spin::Mutex;
use uuid::Uuid;

use crate::{
    core::{ImageConstPtr, ImageTransportError, NodeHandle, TrackedObject, TransportHints},
    transport::{PluginLoader, SubscriberPlugin},
};

/// Host parameter which names the transport to use when transport hints
/// don't name one.
pub const TRANSPORT_PARAM: &str = "image_transport";

/// Transport used when neither transport hints nor host parameters name one.
pub const DEFAULT_TRANSPORT: &str = "raw";

/// Image topic subscription handle.
///
/// `ImageSubscriber` is the client-side counterpart of an image publisher.
/// It picks the transport plugin able to interpret the topic and hands
/// decoded images to the user callback, so the transport actually used stays
/// hidden.
///
/// Handles are cheap to clone: clones share the same underlying subscription.
/// Once all clones of a specific `ImageSubscriber` are dropped or shut down,
/// the subscription callback stops being called and the topic is
/// unsubscribed.
///
/// # Example
///
/// ```
/// use image_transport::{node::LocalNode, transport::raw, Image, ImageSubscriber};
///
/// let node = LocalNode::new("/");
/// let publisher = node.advertise("camera/image");
///
/// let mut subscriber = ImageSubscriber::new();
/// subscriber
///     .subscribe(&node, "camera/image", 1, |image| println!("{}", image.width), None, None)
///     .unwrap();
///
/// publisher.publish(raw::encode(&Image::default()).unwrap());
/// assert_eq!(node.spin_once(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ImageSubscriber {
    inner: Option<Arc<ImageSubscriberRef>>,
}

/// Image subscription state.
///
/// This struct contains the actual subscription state. It is shared by all
/// clones of the [`ImageSubscriber`] which created it and shuts the transport
/// plugin down when the last of them goes away.
///
/// Not intended to be used directly. Use [`ImageSubscriber`] instead.
pub(crate) struct ImageSubscriberRef {
    /// Unique subscription identifier.
    id: String,

    /// Topic exactly as it has been passed to `subscribe`.
    topic: String,

    /// Requested queue size.
    queue_size: u32,

    /// Name of transport used by subscription.
    transport: String,

    /// Transport plugin which holds host registration.
    plugin: Mutex<Box<dyn SubscriberPlugin>>,
}

impl ImageSubscriber {
    /// Create handle which is not bound to any topic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an image topic.
    ///
    /// Canonical form to which all other `subscribe_*` methods reduce.
    /// `callback` is called once per received image for as long as at least
    /// one clone of the handle keeps subscription alive and, if provided,
    /// `tracked_object` still exists.
    ///
    /// Transport is chosen by `transport_hints` or, if they don't name one,
    /// by the [`TRANSPORT_PARAM`] host parameter, falling back to
    /// [`DEFAULT_TRANSPORT`]. A `queue_size` of `0` lets the transport use
    /// its default queue size.
    ///
    /// Previous subscription held by this handle (if any) is released first,
    /// so the handle is unbound if subscription fails.
    ///
    /// # Errors
    /// * [`ImageTransportError::InvalidTopic`] for empty or whitespace-only
    ///   topic names.
    /// * [`ImageTransportError::PluginNotFound`] for unknown transports.
    /// * any error reported by the messaging host.
    pub fn subscribe<F>(
        &mut self,
        nh: &dyn NodeHandle,
        topic: &str,
        queue_size: u32,
        callback: F,
        tracked_object: Option<TrackedObject>,
        transport_hints: Option<TransportHints>,
    ) -> Result<(), ImageTransportError>
    where
        F: Fn(ImageConstPtr) + Send + Sync + 'static,
    {
        self.subscribe_with_loader(
            &PluginLoader::default(),
            nh,
            topic,
            queue_size,
            callback,
            tracked_object,
            transport_hints,
        )
    }

    /// Subscribe to an image topic using transports known to `loader`.
    ///
    /// Same as [`ImageSubscriber::subscribe`], but lets the caller supply
    /// custom transport plugins.
    #[allow(clippy::too_many_arguments)]
    pub fn subscribe_with_loader<F>(
        &mut self,
        loader: &PluginLoader,
        nh: &dyn NodeHandle,
        topic: &str,
        queue_size: u32,
        callback: F,
        tracked_object: Option<TrackedObject>,
        transport_hints: Option<TransportHints>,
    ) -> Result<(), ImageTransportError>
    where
        F: Fn(ImageConstPtr) + Send + Sync + 'static,
    {
        self.shutdown();

        if topic.trim().is_empty() {
            return Err(ImageTransportError::InvalidTopic {
                details: "Topic name can't be empty".into(),
            });
        }

        let transport_hints = transport_hints.unwrap_or_default();
        let transport = select_transport(nh, &transport_hints);
        let mut plugin = loader.create(&transport)?;

        plugin.subscribe(
            nh,
            topic,
            queue_size,
            Arc::new(callback),
            tracked_object,
            &transport_hints,
        )?;

        let inner = ImageSubscriberRef {
            id: Uuid::new_v4().to_string(),
            topic: topic.into(),
            queue_size,
            transport,
            plugin: Mutex::new(plugin),
        };
        debug!(
            "Image subscription {} to {} over {} transport (queue size: {})",
            inner.id, inner.topic, inner.transport, inner.queue_size
        );
        self.inner = Some(Arc::new(inner));

        Ok(())
    }

    /// Subscribe to an image topic with a plain function.
    pub fn subscribe_fn(
        &mut self,
        nh: &dyn NodeHandle,
        topic: &str,
        queue_size: u32,
        callback: fn(ImageConstPtr),
        transport_hints: Option<TransportHints>,
    ) -> Result<(), ImageTransportError> {
        self.subscribe(nh, topic, queue_size, callback, None, transport_hints)
    }

    /// Subscribe to an image topic with a method of `owner`.
    ///
    /// Subscription keeps `owner` alive for as long as it is active.
    pub fn subscribe_with_owner<T>(
        &mut self,
        nh: &dyn NodeHandle,
        topic: &str,
        queue_size: u32,
        method: fn(&T, ImageConstPtr),
        owner: Arc<T>,
        transport_hints: Option<TransportHints>,
    ) -> Result<(), ImageTransportError>
    where
        T: Send + Sync + 'static,
    {
        self.subscribe(
            nh,
            topic,
            queue_size,
            move |image| method(&owner, image),
            None,
            transport_hints,
        )
    }

    /// Subscribe to an image topic with a method of tracked `owner`.
    ///
    /// Subscription doesn't extend lifetime of `owner`: it is passed along as
    /// tracked object and `method` isn't called anymore once `owner` is
    /// dropped.
    pub fn subscribe_with_tracked_owner<T>(
        &mut self,
        nh: &dyn NodeHandle,
        topic: &str,
        queue_size: u32,
        method: fn(&T, ImageConstPtr),
        owner: &Arc<T>,
        transport_hints: Option<TransportHints>,
    ) -> Result<(), ImageTransportError>
    where
        T: Any + Send + Sync,
    {
        let weak_owner = Arc::downgrade(owner);

        self.subscribe(
            nh,
            topic,
            queue_size,
            move |image| {
                if let Some(owner) = weak_owner.upgrade() {
                    method(&owner, image)
                }
            },
            Some(TrackedObject::new(owner)),
            transport_hints,
        )
    }

    /// Topic exactly as it has been passed to `subscribe`.
    ///
    /// `None` if the handle isn't bound.
    pub fn topic(&self) -> Option<&str> {
        self.inner.as_ref().map(|inner| inner.topic.as_str())
    }

    /// Name of the transport used to receive images.
    pub fn transport(&self) -> Option<&str> {
        self.inner.as_ref().map(|inner| inner.transport.as_str())
    }

    /// Fully qualified transport-specific topic.
    pub fn transport_topic(&self) -> Option<String> {
        self.inner
            .as_ref()
            .and_then(|inner| inner.plugin.lock().topic())
    }

    /// Number of publishers on the transport-specific topic.
    pub fn num_publishers(&self) -> usize {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.plugin.lock().num_publishers())
    }

    /// Release subscription held by this handle.
    ///
    /// Handle becomes unbound. Subscription is cancelled only if no other
    /// clone of this handle keeps it alive.
    pub fn shutdown(&mut self) {
        if let Some(inner) = self.inner.take() {
            debug!(
                "Releasing image subscription {} to {} ({} other handle(s) left)",
                inner.id,
                inner.topic,
                Arc::strong_count(&inner) - 1
            );
        }
    }

    /// Whether the handle is bound to an active subscription.
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    /// Identity of shared subscription state (`0` for unbound handles).
    fn identity(&self) -> usize {
        self.inner
            .as_ref()
            .map_or(0, |inner| Arc::as_ptr(inner) as usize)
    }
}

impl From<&ImageSubscriber> for bool {
    fn from(value: &ImageSubscriber) -> Self {
        value.is_valid()
    }
}

impl PartialEq for ImageSubscriber {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ImageSubscriber {}

impl PartialOrd for ImageSubscriber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ImageSubscriber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl Hash for ImageSubscriber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl Debug for ImageSubscriber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.inner {
            Some(inner) => write!(
                f,
                "ImageSubscriber {{ topic: {}, transport: {}, queue_size: {} }}",
                inner.topic, inner.transport, inner.queue_size
            ),
            None => write!(f, "ImageSubscriber {{ unbound }}"),
        }
    }
}

impl Debug for ImageSubscriberRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "ImageSubscriberRef {{ id: {}, topic: {}, transport: {} }}",
            self.id, self.topic, self.transport
        )
    }
}

impl Drop for ImageSubscriberRef {
    fn drop(&mut self) {
        debug!(
            "Unsubscribing image subscription {} from {}",
            self.id, self.topic
        );
        self.plugin.get_mut().shutdown();
    }
}

/// Name of transport which should be used for subscription.
fn select_transport(nh: &dyn NodeHandle, transport_hints: &TransportHints) -> String {
    transport_hints
        .transport
        .clone()
        .or_else(|| nh.param(TRANSPORT_PARAM))
        .unwrap_or_else(|| DEFAULT_TRANSPORT.into())
}

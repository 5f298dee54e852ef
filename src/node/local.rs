//! # Local node
//!
//! This module contains [`LocalNode`], an in-process messaging host which
//! implements [`NodeHandle`] on top of per-subscription message queues.
//!
//! Messages are queued when published and delivered on the thread which
//! calls [`LocalNode::spin_once`].

use std::{
    collections::VecDeque,
    fmt::{Debug, Formatter, Result as FmtResult},
    ops::Deref,
    sync::{Arc, Weak},
};

use bytes::Bytes;
use hashbrown::HashMap;
use log::debug;
use spin::{Mutex, RwLock};
use uuid::Uuid;

use crate::core::{
    ImageTransportError, NodeHandle, SubscribeOptions, TopicSubscription, TrackedObject,
    WireCallback, WireMessage,
};

/// Queue size used for subscriptions which requested a queue size of `0`.
pub const DEFAULT_QUEUE_SIZE: usize = 100;

/// In-process messaging host.
///
/// Clones share the same topics, parameters and registrations.
///
/// # Example
///
/// ```
/// use image_transport::node::LocalNode;
///
/// let node = LocalNode::new("/robot");
/// node.set_param("image_transport", "compressed");
///
/// assert_eq!(node.resolve("camera/image"), "/robot/camera/image");
/// assert_eq!(node.resolve("/tf"), "/tf");
/// ```
#[derive(Clone)]
pub struct LocalNode {
    inner: Arc<LocalNodeRef>,
}

/// Local node state.
///
/// Not intended to be used directly. Use [`LocalNode`] instead.
pub struct LocalNodeRef {
    /// Namespace used to resolve relative topic names.
    pub namespace: String,

    /// Node parameters.
    params: RwLock<HashMap<String, String>>,

    /// Active registrations by resolved topic name.
    registrations: RwLock<HashMap<String, Vec<Arc<Registration>>>>,

    /// Number of advertised publishers by resolved topic name.
    publishers: RwLock<HashMap<String, usize>>,
}

/// Single topic registration with its own bounded message queue.
struct Registration {
    id: String,
    topic: String,
    capacity: usize,
    queue: Mutex<VecDeque<Bytes>>,
    callback: WireCallback,
    tracked_object: Option<TrackedObject>,
    is_active: RwLock<bool>,
}

/// [`TopicSubscription`] handed out by [`LocalNode`].
pub struct LocalSubscription {
    registration: Arc<Registration>,
    node: Weak<LocalNodeRef>,
}

/// Topic publisher created by [`LocalNode::advertise`].
///
/// Topic stays advertised until the publisher is dropped.
pub struct LocalPublisher {
    topic: String,
    node: LocalNode,
}

impl LocalNode {
    /// Create node in `namespace`.
    pub fn new<S>(namespace: S) -> Self
    where
        S: Into<String>,
    {
        let namespace = namespace.into();
        let namespace = format!("/{}", namespace.trim_matches('/'));

        Self {
            inner: Arc::new(LocalNodeRef {
                namespace,
                params: Default::default(),
                registrations: Default::default(),
                publishers: Default::default(),
            }),
        }
    }

    /// Set `key` parameter to `value`.
    pub fn set_param<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params.write().insert(key.into(), value.into());
    }

    /// Resolve `name` against node namespace.
    ///
    /// Absolute names are returned as is.
    pub fn resolve(&self, name: &str) -> String {
        if name.starts_with('/') {
            name.into()
        } else if self.namespace == "/" {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.namespace)
        }
    }

    /// Advertise `topic` and return its publisher.
    pub fn advertise(&self, topic: &str) -> LocalPublisher {
        let topic = self.resolve(topic);
        *self.publishers.write().entry(topic.clone()).or_insert(0) += 1;
        debug!("Advertised {topic}");

        LocalPublisher {
            topic,
            node: self.clone(),
        }
    }

    /// Number of active registrations on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registrations
            .read()
            .get(&self.resolve(topic))
            .map_or(0, Vec::len)
    }

    /// Deliver all queued messages.
    ///
    /// Callbacks run on the calling thread. Messages for registrations whose
    /// tracked object has been dropped are discarded.
    ///
    /// # Returns
    ///
    /// Number of callbacks which have been called.
    pub fn spin_once(&self) -> usize {
        let registrations: Vec<Arc<Registration>> = self
            .registrations
            .read()
            .values()
            .flat_map(|registrations| registrations.iter().cloned())
            .collect();

        registrations
            .iter()
            .map(|registration| registration.deliver())
            .sum()
    }
}

impl LocalNodeRef {
    fn publish(&self, topic: &str, payload: Bytes) -> usize {
        let registrations = self.registrations.read();
        let Some(registrations) = registrations.get(topic) else {
            return 0;
        };

        registrations
            .iter()
            .filter(|registration| registration.push(payload.clone()))
            .count()
    }

    fn publisher_count(&self, topic: &str) -> usize {
        self.publishers.read().get(topic).copied().unwrap_or(0)
    }

    fn unregister(&self, registration: &Registration) {
        let mut registrations_slot = self.registrations.write();
        if let Some(registrations) = registrations_slot.get_mut(&registration.topic) {
            registrations.retain(|active| active.id != registration.id);
            if registrations.is_empty() {
                registrations_slot.remove(&registration.topic);
            }
        }
    }
}

impl Registration {
    /// Queue `payload` for delivery.
    ///
    /// The oldest message is dropped when the queue is full.
    fn push(&self, payload: Bytes) -> bool {
        if !*self.is_active.read() {
            return false;
        }

        let mut queue_slot = self.queue.lock();
        if queue_slot.len() == self.capacity {
            queue_slot.pop_front();
            debug!("Queue of {} subscription is full, dropped oldest message", self.topic);
        }
        queue_slot.push_back(payload);

        true
    }

    fn deliver(&self) -> usize {
        let messages: Vec<Bytes> = self.queue.lock().drain(..).collect();
        let mut delivered = 0;

        for payload in messages {
            if !*self.is_active.read() {
                break;
            }

            // Keep tracked object alive while callback runs.
            let _guard = match &self.tracked_object {
                Some(tracked_object) => match tracked_object.upgrade() {
                    Some(object) => Some(object),
                    None => {
                        debug!("Tracked object of {} subscription is gone", self.topic);
                        continue;
                    }
                },
                None => None,
            };

            (self.callback)(&WireMessage {
                topic: self.topic.clone(),
                payload,
            });
            delivered += 1;
        }

        delivered
    }

    fn deactivate(&self) -> bool {
        let mut is_active = self.is_active.write();
        let was_active = *is_active;
        *is_active = false;
        self.queue.lock().clear();

        was_active
    }
}

impl NodeHandle for LocalNode {
    fn subscribe(
        &self,
        options: SubscribeOptions,
    ) -> Result<Box<dyn TopicSubscription>, ImageTransportError> {
        let topic = self.resolve(&options.topic);
        if topic.ends_with('/') {
            return Err(ImageTransportError::Subscribe {
                details: format!("'{topic}' is not a valid topic name"),
            });
        }

        let capacity = match options.queue_size {
            0 => DEFAULT_QUEUE_SIZE,
            size => size as usize,
        };
        let registration = Arc::new(Registration {
            id: Uuid::new_v4().to_string(),
            topic: topic.clone(),
            capacity,
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            callback: options.callback,
            tracked_object: options.tracked_object,
            is_active: RwLock::new(true),
        });

        self.registrations
            .write()
            .entry(topic.clone())
            .or_default()
            .push(registration.clone());
        debug!(
            "Registered subscription {} on {topic} (queue size: {capacity}, hints: {:?})",
            registration.id, options.transport_hints
        );

        Ok(Box::new(LocalSubscription {
            registration,
            node: Arc::downgrade(&self.inner),
        }))
    }

    fn param(&self, key: &str) -> Option<String> {
        self.params.read().get(key).cloned()
    }

    fn resolve_name(&self, name: &str) -> String {
        self.resolve(name)
    }
}

impl TopicSubscription for LocalSubscription {
    fn topic(&self) -> &str {
        &self.registration.topic
    }

    fn num_publishers(&self) -> usize {
        self.node
            .upgrade()
            .map_or(0, |node| node.publisher_count(&self.registration.topic))
    }

    fn shutdown(&self) {
        if !self.registration.deactivate() {
            return;
        }

        if let Some(node) = self.node.upgrade() {
            node.unregister(&self.registration);
        }
        debug!(
            "Unregistered subscription {} on {}",
            self.registration.id, self.registration.topic
        );
    }
}

impl Drop for LocalSubscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl LocalPublisher {
    /// Resolved topic name.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Queue `payload` for every registration on the topic.
    ///
    /// # Returns
    ///
    /// Number of registrations which accepted the message.
    pub fn publish<P>(&self, payload: P) -> usize
    where
        P: Into<Bytes>,
    {
        self.node.publish(&self.topic, payload.into())
    }
}

impl Drop for LocalPublisher {
    fn drop(&mut self) {
        let mut publishers_slot = self.node.publishers.write();
        if let Some(count) = publishers_slot.get_mut(&self.topic) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                publishers_slot.remove(&self.topic);
            }
        }
    }
}

impl Deref for LocalNode {
    type Target = LocalNodeRef;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Debug for LocalNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "LocalNode {{ namespace: {}, topics: {:?} }}",
            self.namespace,
            self.registrations.read().keys().collect::<Vec<_>>()
        )
    }
}

impl Debug for LocalSubscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "LocalSubscription {{ id: {}, topic: {} }}",
            self.registration.id, self.registration.topic
        )
    }
}

impl Debug for LocalPublisher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "LocalPublisher {{ topic: {} }}", self.topic)
    }
}

#[cfg(test)]
mod it_should {
    use super::*;
    use crate::core::TransportHints;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_case::test_case;

    fn options(topic: &str, queue_size: u32, callback: WireCallback) -> SubscribeOptions {
        SubscribeOptions {
            topic: topic.into(),
            queue_size,
            callback,
            tracked_object: None,
            transport_hints: TransportHints::default(),
        }
    }

    fn collecting_callback() -> (WireCallback, Arc<Mutex<Vec<Bytes>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_slot = received.clone();
        let callback: WireCallback = Arc::new(move |message: &WireMessage| {
            received_slot.lock().push(message.payload.clone())
        });

        (callback, received)
    }

    #[test_case("/", "image" => "/image"; "relative in root namespace")]
    #[test_case("robot", "image" => "/robot/image"; "relative in namespace")]
    #[test_case("/robot/", "camera/image" => "/robot/camera/image"; "namespace with slashes")]
    #[test_case("/robot", "/image" => "/image"; "absolute name")]
    fn resolve_names(namespace: &str, name: &str) -> String {
        LocalNode::new(namespace).resolve(name)
    }

    #[test]
    fn deliver_queued_messages_in_order() {
        let node = LocalNode::new("/");
        let (callback, received) = collecting_callback();
        let _subscription = node.subscribe(options("data", 10, callback)).unwrap();
        let publisher = node.advertise("data");

        assert_eq!(publisher.publish("first"), 1);
        assert_eq!(publisher.publish("second"), 1);
        assert_eq!(node.spin_once(), 2);

        assert_eq!(
            *received.lock(),
            vec![Bytes::from("first"), Bytes::from("second")]
        );
        assert_eq!(node.spin_once(), 0);
    }

    #[test]
    fn drop_oldest_messages_when_queue_is_full() {
        let node = LocalNode::new("/");
        let (callback, received) = collecting_callback();
        let _subscription = node.subscribe(options("data", 2, callback)).unwrap();
        let publisher = node.advertise("data");

        publisher.publish("1");
        publisher.publish("2");
        publisher.publish("3");
        node.spin_once();

        assert_eq!(*received.lock(), vec![Bytes::from("2"), Bytes::from("3")]);
    }

    #[test]
    fn use_default_queue_size_for_zero() {
        let node = LocalNode::new("/");
        let (callback, received) = collecting_callback();
        let _subscription = node.subscribe(options("data", 0, callback)).unwrap();
        let publisher = node.advertise("data");

        (0..DEFAULT_QUEUE_SIZE + 5).for_each(|index| {
            publisher.publish(index.to_string());
        });
        node.spin_once();

        assert_eq!(received.lock().len(), DEFAULT_QUEUE_SIZE);
    }

    #[test]
    fn stop_delivery_after_shutdown() {
        let node = LocalNode::new("/");
        let (callback, received) = collecting_callback();
        let subscription = node.subscribe(options("data", 10, callback)).unwrap();
        let publisher = node.advertise("data");

        publisher.publish("queued");
        subscription.shutdown();
        subscription.shutdown();

        assert_eq!(publisher.publish("late"), 0);
        assert_eq!(node.spin_once(), 0);
        assert!(received.lock().is_empty());
        assert_eq!(node.subscriber_count("data"), 0);
    }

    #[test]
    fn unregister_dropped_subscription() {
        let node = LocalNode::new("/");
        let (callback, _) = collecting_callback();
        let subscription = node.subscribe(options("data", 1, callback)).unwrap();
        assert_eq!(node.subscriber_count("/data"), 1);

        drop(subscription);

        assert_eq!(node.subscriber_count("/data"), 0);
    }

    #[test]
    fn skip_callbacks_of_dropped_tracked_object() {
        let node = LocalNode::new("/");
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_slot = calls.clone();
        let owner = Arc::new(());
        let mut options = options(
            "data",
            10,
            Arc::new(move |_: &WireMessage| {
                calls_slot.fetch_add(1, Ordering::SeqCst);
            }),
        );
        options.tracked_object = Some(TrackedObject::new(&owner));
        let _subscription = node.subscribe(options).unwrap();
        let publisher = node.advertise("data");

        publisher.publish("alive");
        assert_eq!(node.spin_once(), 1);

        drop(owner);
        publisher.publish("gone");
        assert_eq!(node.spin_once(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn count_advertised_publishers() {
        let node = LocalNode::new("/ns");
        let (callback, _) = collecting_callback();
        let subscription = node.subscribe(options("data", 1, callback)).unwrap();
        assert_eq!(subscription.topic(), "/ns/data");
        assert_eq!(subscription.num_publishers(), 0);

        let first = node.advertise("data");
        let second = node.advertise("/ns/data");
        assert_eq!(subscription.num_publishers(), 2);

        drop(first);
        assert_eq!(subscription.num_publishers(), 1);
        drop(second);
        assert_eq!(subscription.num_publishers(), 0);
    }

    #[test]
    fn reject_topic_with_trailing_slash() {
        let node = LocalNode::new("/");
        let (callback, _) = collecting_callback();

        assert!(matches!(
            node.subscribe(options("camera/", 1, callback)),
            Err(ImageTransportError::Subscribe { .. })
        ));
    }

    #[test]
    fn share_state_between_clones() {
        let node = LocalNode::new("/");
        let clone = node.clone();
        clone.set_param("image_transport", "compressed");

        assert_eq!(node.param("image_transport").as_deref(), Some("compressed"));
    }
}

//! # Image transport
//!
//! Transport agnostic subscriptions to image topics.
//!
//! [`ImageSubscriber`] subscribes to a topic published through a topic based
//! messaging host and hands every received image to a user callback. Which
//! wire representation is actually used (`raw`, `compressed` or any custom
//! transport registered in a [`PluginLoader`]) is hidden behind the handle.
//!
//! The messaging host is abstracted by the [`NodeHandle`] trait. The crate
//! ships [`LocalNode`], an in-process host which delivers messages from
//! [`LocalNode::spin_once`].
//!
//! ## Features
//!
//! * `serde` (default) - JSON codecs for the bundled transports.
//! * `compressed` (default) - gzip `compressed` transport.
//!
//! ## Example
//!
//! ```
//! use image_transport::{
//!     node::LocalNode,
//!     transport::compressed,
//!     Image, ImageSubscriber, TransportHintsBuilder,
//! };
//!
//! # fn main() -> Result<(), image_transport::ImageTransportError> {
//! let node = LocalNode::new("/robot");
//! let publisher = node.advertise("camera/image/compressed");
//!
//! let hints = TransportHintsBuilder::default()
//!     .transport("compressed")
//!     .build()?;
//!
//! let mut subscriber = ImageSubscriber::new();
//! subscriber.subscribe(
//!     &node,
//!     "camera/image",
//!     5,
//!     |image| println!("received {}x{} image", image.width, image.height),
//!     None,
//!     Some(hints),
//! )?;
//!
//! let image = Image {
//!     width: 2,
//!     height: 1,
//!     step: 2,
//!     encoding: "mono8".into(),
//!     data: vec![0, 255],
//!     ..Default::default()
//! };
//! publisher.publish(compressed::encode(&image, compressed::DEFAULT_LEVEL)?);
//!
//! assert_eq!(node.spin_once(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! [`PluginLoader`]: crate::transport::PluginLoader
//! [`NodeHandle`]: crate::core::NodeHandle
//! [`LocalNode`]: crate::node::LocalNode
//! [`LocalNode::spin_once`]: crate::node::LocalNode::spin_once

#![deny(missing_docs)]

#[doc(inline)]
pub use dx::ImageSubscriber;
pub mod dx;

#[doc(inline)]
pub use crate::core::{
    Image, ImageConstPtr, ImageTransportError, NodeHandle, TrackedObject, TransportHints,
    TransportHintsBuilder,
};
pub mod core;

pub mod node;
pub mod providers;
pub mod transport;

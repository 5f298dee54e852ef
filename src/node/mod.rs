//! # Node module
//!
//! Messaging hosts bundled with the crate.

#[doc(inline)]
pub use local::{LocalNode, LocalPublisher, LocalSubscription, DEFAULT_QUEUE_SIZE};
pub mod local;

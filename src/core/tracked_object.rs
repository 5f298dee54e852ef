//! # Tracked object
//!
//! This module contains [`TrackedObject`], a weak reference to an object which
//! gates whether a subscription callback may still be invoked.

use std::{
    any::Any,
    fmt::{Debug, Formatter, Result},
    sync::{Arc, Weak},
};

/// Lifetime tracker for subscription callbacks.
///
/// The host checks the tracked object before each callback invocation and
/// skips delivery once the object has been dropped. The strong reference
/// returned by [`TrackedObject::upgrade`] should be held for the duration of
/// the invocation.
#[derive(Clone)]
pub struct TrackedObject {
    object: Weak<dyn Any + Send + Sync>,
}

impl TrackedObject {
    /// Track lifetime of `object` without extending it.
    pub fn new<T>(object: &Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        let object: Arc<dyn Any + Send + Sync> = object.clone();
        Self {
            object: Arc::downgrade(&object),
        }
    }

    /// Whether the tracked object still exists.
    pub fn is_alive(&self) -> bool {
        self.object.strong_count() > 0
    }

    /// Strong reference on the tracked object, if it still exists.
    pub fn upgrade(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.object.upgrade()
    }
}

impl Debug for TrackedObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "TrackedObject {{ alive: {} }}", self.is_alive())
    }
}

#[cfg(test)]
mod it_should {
    use super::*;

    #[test]
    fn not_extend_object_lifetime() {
        let object = Arc::new(String::from("owner"));
        let tracked = TrackedObject::new(&object);

        assert!(tracked.is_alive());
        assert!(tracked.upgrade().is_some());

        drop(object);

        assert!(!tracked.is_alive());
        assert!(tracked.upgrade().is_none());
    }
}

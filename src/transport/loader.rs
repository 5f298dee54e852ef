//! # Plugin loader
//!
//! This module contains [`PluginLoader`], the registry of known image
//! transports which creates [`SubscriberPlugin`] instances by transport name.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use hashbrown::HashMap;
use log::debug;
use spin::RwLock;

use crate::{core::ImageTransportError, transport::SubscriberPlugin};

/// Factory which creates fresh plugin instances.
pub type PluginFactory = Arc<dyn Fn() -> Box<dyn SubscriberPlugin> + Send + Sync>;

/// Registry of image transport plugins.
///
/// Clones share the same registry, so transports registered through one clone
/// are visible to all of them.
///
/// # Example
///
/// ```
/// use image_transport::transport::{raw, PluginLoader};
///
/// let loader = PluginLoader::empty();
/// loader
///     .register("raw-copy", || Box::new(raw::subscriber()))
///     .unwrap();
///
/// assert_eq!(loader.transports(), vec!["raw-copy".to_string()]);
/// ```
#[derive(Clone)]
pub struct PluginLoader {
    factories: Arc<RwLock<HashMap<String, PluginFactory>>>,
}

impl PluginLoader {
    /// Create registry without any transports.
    pub fn empty() -> Self {
        Self {
            factories: Default::default(),
        }
    }

    /// Register plugin factory for `name` transport.
    ///
    /// # Errors
    /// Returns [`ImageTransportError::PluginAlreadyRegistered`] if there is
    /// already a factory for `name`.
    pub fn register<S, F>(&self, name: S, factory: F) -> Result<(), ImageTransportError>
    where
        S: Into<String>,
        F: Fn() -> Box<dyn SubscriberPlugin> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut factories_slot = self.factories.write();

        if factories_slot.contains_key(&name) {
            return Err(ImageTransportError::PluginAlreadyRegistered { details: name });
        }

        debug!("Registered '{name}' image transport");
        factories_slot.insert(name, Arc::new(factory));

        Ok(())
    }

    /// Create plugin instance for `name` transport.
    ///
    /// # Errors
    /// Returns [`ImageTransportError::PluginNotFound`] for unknown transports.
    pub fn create(&self, name: &str) -> Result<Box<dyn SubscriberPlugin>, ImageTransportError> {
        let factory = self.factories.read().get(name).cloned();

        factory
            .map(|factory| factory())
            .ok_or_else(|| ImageTransportError::PluginNotFound {
                details: format!(
                    "no plugin for '{name}' transport, known transports: [{}]",
                    self.transports().join(", ")
                ),
            })
    }

    /// Whether there is a plugin for `name` transport.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Sorted names of registered transports.
    pub fn transports(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for PluginLoader {
    /// Registry with the bundled transports.
    fn default() -> Self {
        let loader = Self::empty();

        #[cfg(feature = "serde")]
        loader.factories.write().insert(
            super::raw::TRANSPORT_NAME.into(),
            Arc::new(|| Box::new(super::raw::subscriber()) as Box<dyn SubscriberPlugin>),
        );

        #[cfg(feature = "compressed")]
        loader.factories.write().insert(
            super::compressed::TRANSPORT_NAME.into(),
            Arc::new(|| Box::new(super::compressed::subscriber()) as Box<dyn SubscriberPlugin>),
        );

        loader
    }
}

impl Debug for PluginLoader {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "PluginLoader {{ transports: {:?} }}", self.transports())
    }
}

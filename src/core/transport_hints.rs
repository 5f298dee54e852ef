//! # Transport hints
//!
//! This module contains [`TransportHints`], which describe the subscriber's
//! transport preferences passed along to the messaging host and to the image
//! transport plugin selection.

use derive_builder::Builder;

use crate::core::ImageTransportError;

/// Low-level protocols which can carry topic data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Reliable, connection oriented stream.
    Tcp,

    /// Unreliable datagrams.
    Udp,
}

/// Subscriber transport preferences.
///
/// Hints are suggestions: the host is free to ignore protocols it doesn't
/// support. The preferred image `transport` is mandatory though, subscription
/// fails if no plugin is registered for it.
///
/// # Example
///
/// ```
/// use image_transport::core::{Protocol, TransportHintsBuilder};
///
/// let hints = TransportHintsBuilder::default()
///     .transport("compressed")
///     .protocols(vec![Protocol::Udp, Protocol::Tcp])
///     .tcp_no_delay(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(hints.transport.as_deref(), Some("compressed"));
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(
    pattern = "owned",
    build_fn(private, name = "build_internal", validate = "Self::validate")
)]
pub struct TransportHints {
    /// Name of the preferred image transport (`raw`, `compressed`, ...).
    #[builder(setter(into, strip_option), default = "None")]
    pub transport: Option<String>,

    /// Protocols in order of preference.
    #[builder(default = "vec![Protocol::Tcp]")]
    pub protocols: Vec<Protocol>,

    /// Whether Nagle's algorithm should be disabled for TCP connections.
    #[builder(default = "false")]
    pub tcp_no_delay: bool,

    /// Largest datagram which can be used with UDP.
    #[builder(setter(strip_option), default = "None")]
    pub max_datagram_size: Option<u32>,
}

impl TransportHintsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(0)) = self.max_datagram_size {
            return Err("Maximum datagram size can't be zero".into());
        }

        if let Some(Some(transport)) = &self.transport {
            if transport.trim().is_empty() {
                return Err("Preferred transport name can't be empty".into());
            }
        }

        if let Some(protocols) = &self.protocols {
            if protocols.is_empty() {
                return Err("At least one protocol should be provided".into());
            }
        }

        Ok(())
    }

    /// Construct transport hints.
    pub fn build(self) -> Result<TransportHints, ImageTransportError> {
        self.build_internal()
            .map_err(|err| ImageTransportError::TransportHints {
                details: err.to_string(),
            })
    }
}

impl Default for TransportHints {
    fn default() -> Self {
        Self {
            transport: None,
            protocols: vec![Protocol::Tcp],
            tcp_no_delay: false,
            max_datagram_size: None,
        }
    }
}

#[cfg(test)]
mod it_should {
    use super::*;

    #[test]
    fn build_defaults_matching_default_hints() {
        let hints = TransportHintsBuilder::default().build().unwrap();

        assert_eq!(hints, TransportHints::default());
        assert_eq!(hints.protocols, vec![Protocol::Tcp]);
    }

    #[test]
    fn not_build_with_zero_datagram_size() {
        let result = TransportHintsBuilder::default()
            .max_datagram_size(0)
            .build();

        assert!(matches!(
            result,
            Err(ImageTransportError::TransportHints { .. })
        ));
    }

    #[test]
    fn not_build_with_empty_transport_name() {
        let result = TransportHintsBuilder::default().transport("  ").build();

        assert!(result.is_err());
    }

    #[test]
    fn not_build_without_protocols() {
        let result = TransportHintsBuilder::default().protocols(vec![]).build();

        assert!(result.is_err());
    }
}

//! Push-messaging transport abstraction
//!
//! The transport itself is an external collaborator. Views only see the
//! [`PushTransport`] trait for outbound messages and receive inbound
//! messages from whatever feeds the client loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Outbound event carrying the workout control payload
pub const SYSTEM_CONTROL: &str = "system_control";

/// Outbound event asking the server to restart one or all sensors
pub const RESTART_SENSORS: &str = "restart_sensors";

/// Outbound event asking the server to delete one or all sensors
pub const DELETE_SENSORS: &str = "delete_sensors";

/// A named message received from the push channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl InboundMessage {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// A named message sent over the push channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub event: String,
    pub data: serde_json::Value,
}

impl OutboundMessage {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Outbound half of the push-messaging transport
///
/// `emit` hands over the whole payload in one call so that a batching
/// transport never interleaves partial messages.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait PushTransport: Send + Sync {
    async fn emit(&self, message: OutboundMessage) -> crate::Result<()>;
}

/// Transport that forwards outbound messages into an in-process channel
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

/// Create a channel transport and the receiver that observes its messages
pub fn channel() -> (ChannelTransport, mpsc::UnboundedReceiver<OutboundMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelTransport { tx }, rx)
}

#[async_trait]
impl PushTransport for ChannelTransport {
    async fn emit(&self, message: OutboundMessage) -> crate::Result<()> {
        tracing::debug!("emit '{}': {}", message.event, message.data);
        self.tx.send(message).map_err(|e| {
            crate::DashboardError::Transport(format!(
                "outbound channel closed, dropped '{}'",
                e.0.event
            ))
        })
    }
}

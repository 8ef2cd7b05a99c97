//! Event subscription router: channel name -> handler

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::transport::InboundMessage;

/// Transport connected
pub const CONNECT: &str = "connect";

/// Transport failed to connect; payload `{message}`
pub const CONNECT_ERROR: &str = "connect_error";

/// Broadcast channel carrying status for every sensor
pub const SENSORS_STATUS_ALL: &str = "sensors_status_all";

/// Workout counter updates
pub const COUNTER: &str = "counter";

/// Prefix of page identifiers for sensors, e.g. `sensor-7`
pub const SENSOR_PAGE_PREFIX: &str = "sensor-";

/// Which status channel a view listens to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscription {
    /// One sensor, channel `sensor_status_<id>`
    Entity(String),
    /// All sensors on `sensors_status_all`
    Broadcast,
}

impl Subscription {
    pub fn channel(&self) -> String {
        match self {
            Subscription::Entity(id) => format!("sensor_status_{}", id),
            Subscription::Broadcast => SENSORS_STATUS_ALL.to_string(),
        }
    }
}

/// Resolve the entity id from a page identifier (`sensor-7` -> `7`)
pub fn resolve_entity_id(page_id: &str) -> String {
    page_id
        .strip_prefix(SENSOR_PAGE_PREFIX)
        .unwrap_or(page_id)
        .to_string()
}

type Handler<V> = Box<dyn Fn(&mut V, &Value) + Send + Sync>;

/// Maps channel names to handlers that update a view of type `V`
pub struct EventRouter<V> {
    handlers: HashMap<String, Handler<V>>,
}

impl<V> EventRouter<V> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for a channel, replacing any previous one
    pub fn on<F>(&mut self, channel: impl Into<String>, handler: F)
    where
        F: Fn(&mut V, &Value) + Send + Sync + 'static,
    {
        let channel = channel.into();
        if self
            .handlers
            .insert(channel.clone(), Box::new(handler))
            .is_some()
        {
            tracing::debug!("Replaced handler for '{}'", channel);
        }
    }

    pub fn is_registered(&self, channel: &str) -> bool {
        self.handlers.contains_key(channel)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the handler for the message's channel. Returns false when
    /// nothing is registered for it.
    pub fn dispatch(&self, view: &mut V, message: &InboundMessage) -> bool {
        match self.handlers.get(&message.event) {
            Some(handler) => {
                tracing::debug!("Dispatching '{}'", message.event);
                handler(view, &message.data);
                true
            }
            None => {
                tracing::debug!("No handler for '{}'", message.event);
                false
            }
        }
    }
}

impl<V> Default for EventRouter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for EventRouter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut channels: Vec<&String> = self.handlers.keys().collect();
        channels.sort();
        f.debug_struct("EventRouter")
            .field("channels", &channels)
            .finish()
    }
}

/// Trace a `connect_error`; it is never surfaced to the user
pub fn log_connect_error(payload: &Value) {
    let reason = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    tracing::warn!("connect_error due to {}", reason);
}

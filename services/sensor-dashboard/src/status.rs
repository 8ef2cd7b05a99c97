//! Sensor status payloads as delivered by the push channel

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reported state of a sensor
///
/// Unknown words are kept in `Other` so newer firmware vocabulary still renders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SensorStatus {
    Online,
    Offline,
    Error,
    Trigger,
    Idle,
    #[default]
    Unknown,
    Other(String),
}

impl SensorStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SensorStatus::Online => "online",
            SensorStatus::Offline => "offline",
            SensorStatus::Error => "error",
            SensorStatus::Trigger => "trigger",
            SensorStatus::Idle => "idle",
            SensorStatus::Unknown => "",
            SensorStatus::Other(word) => word,
        }
    }
}

impl From<&str> for SensorStatus {
    fn from(word: &str) -> Self {
        match word {
            "online" => SensorStatus::Online,
            "offline" => SensorStatus::Offline,
            "error" => SensorStatus::Error,
            "trigger" => SensorStatus::Trigger,
            "idle" => SensorStatus::Idle,
            "" => SensorStatus::Unknown,
            other => SensorStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for SensorStatus {
    fn from(word: String) -> Self {
        SensorStatus::from(word.as_str())
    }
}

impl From<SensorStatus> for String {
    fn from(status: SensorStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sensor's current state
///
/// Deserialization never fails on shape: missing or mistyped fields fall
/// back to defaults so the views can always render something.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct StatusEvent {
    #[serde(rename = "client_id")]
    pub entity_id: String,
    pub status: SensorStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
}

const ENTITY_ID_KEYS: &[&str] = &["client_id", "entityId", "entity_id"];
const MAX_DISTANCE_KEYS: &[&str] = &["max_distance", "maxDistance"];

impl StatusEvent {
    /// Best-effort read of a raw payload
    pub fn from_payload(payload: &Value) -> Self {
        if !payload.is_object() {
            tracing::warn!("Status payload is not an object: {}", payload);
        }

        let entity_id = first_field(payload, ENTITY_ID_KEYS)
            .and_then(text_value)
            .unwrap_or_default();
        let status = payload
            .get("status")
            .and_then(text_value)
            .map(SensorStatus::from)
            .unwrap_or_default();

        Self {
            entity_id,
            status,
            distance: payload.get("distance").and_then(number_value),
            threshold: payload.get("threshold").and_then(number_value),
            max_distance: first_field(payload, MAX_DISTANCE_KEYS).and_then(number_value),
        }
    }
}

impl From<Value> for StatusEvent {
    fn from(payload: Value) -> Self {
        StatusEvent::from_payload(&payload)
    }
}

fn first_field<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| payload.get(key))
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

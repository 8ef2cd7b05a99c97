//! Live status rendering: status payload -> presentational state

use serde::{Deserialize, Serialize};

use crate::status::{SensorStatus, StatusEvent};

/// Placeholder shown for a value the payload did not carry
pub const MISSING: &str = "-";

/// Discrete state marker shown next to a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// offline or error
    Red,
    /// online but idle
    Secondary,
    /// active, triggered, or any status this client does not know yet
    Green,
}

impl Indicator {
    pub fn symbol(self) -> &'static str {
        match self {
            Indicator::Red => "🔴",
            Indicator::Secondary => "🟣",
            Indicator::Green => "🟢",
        }
    }
}

/// Map a status to its indicator. Unrecognized words land on green.
pub fn indicator_for(status: &SensorStatus) -> Indicator {
    match status {
        SensorStatus::Offline | SensorStatus::Error => Indicator::Red,
        SensorStatus::Online => Indicator::Secondary,
        _ => Indicator::Green,
    }
}

/// Width of the threshold progress bar.
///
/// Not guarded: a `max_distance` of zero yields an infinite or NaN result.
pub fn progress_percent(threshold: f64, max_distance: f64) -> f64 {
    (threshold / max_distance) * 100.0
}

/// What one sensor currently looks like on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDisplayState {
    pub status_text: String,
    pub indicator: Indicator,
    /// Status-dependent measurement text
    pub detail: String,
    pub progress_percent: Option<f64>,
}

/// Render the display state for one status event
pub fn render(event: &StatusEvent) -> EntityDisplayState {
    let detail = if event.status == SensorStatus::Trigger {
        format!("D: {} mm", number_text(event.distance))
    } else {
        format!(
            "T: {} mm - Md: {} mm",
            number_text(event.threshold),
            number_text(event.max_distance)
        )
    };

    let progress_percent = match (event.threshold, event.max_distance) {
        (Some(threshold), Some(max)) if max != 0.0 => Some(progress_percent(threshold, max)),
        (Some(_), Some(_)) => {
            tracing::debug!(
                "Sensor '{}' reports max_distance 0, progress bar left unchanged",
                event.entity_id
            );
            None
        }
        _ => None,
    };

    EntityDisplayState {
        status_text: event.status.to_string(),
        indicator: indicator_for(&event.status),
        detail,
        progress_percent,
    }
}

/// Text for an optional measurement, `-` when absent
pub fn number_text(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

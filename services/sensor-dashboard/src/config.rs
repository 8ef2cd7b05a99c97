//! Configuration types for the dashboard client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::workout::WorkoutSettings;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardViewConfig,
    #[serde(default)]
    pub sensor: SensorViewConfig,
    #[serde(default)]
    pub workout: WorkoutConfig,
}

/// Sensor list (index) view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardViewConfig {
    #[serde(default = "default_dashboard_log_capacity")]
    pub log_capacity: usize,
}

impl Default for DashboardViewConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_dashboard_log_capacity(),
        }
    }
}

/// Single sensor view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorViewConfig {
    #[serde(default = "default_sensor_log_capacity")]
    pub log_capacity: usize,
}

impl Default for SensorViewConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_sensor_log_capacity(),
        }
    }
}

/// Workout control view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutConfig {
    /// Workout id that runs against the countdown and sends the full parameter set
    #[serde(default = "default_timed_workout_id")]
    pub timed_workout_id: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// How long the "stopped" banner stays visible
    #[serde(default = "default_stopped_banner_ms")]
    pub stopped_banner_ms: u64,
    #[serde(default)]
    pub defaults: WorkoutSettings,
}

impl WorkoutConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn stopped_banner(&self) -> Duration {
        Duration::from_millis(self.stopped_banner_ms)
    }
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            timed_workout_id: default_timed_workout_id(),
            tick_interval_ms: default_tick_interval_ms(),
            stopped_banner_ms: default_stopped_banner_ms(),
            defaults: WorkoutSettings::default(),
        }
    }
}

fn default_dashboard_log_capacity() -> usize {
    8
}

fn default_sensor_log_capacity() -> usize {
    crate::activity_log::DEFAULT_CAPACITY
}

fn default_timed_workout_id() -> u32 {
    2
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_stopped_banner_ms() -> u64 {
    5000
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    if config.workout.tick_interval_ms == 0 {
        return Err(crate::DashboardError::Config(
            "workout.tick_interval_ms must be greater than zero".to_string(),
        ));
    }
    Ok(config)
}

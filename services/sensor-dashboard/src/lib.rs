//! Sensor Dashboard - live sensor status and workout control client
//!
//! Subscribes to push events from the staircase controller, keeps bounded
//! activity logs, renders per-sensor indicators, and drives the workout
//! countdown that emits start/stop/finished control messages.

pub mod activity_log;
pub mod client;
pub mod config;
pub mod confirm;
pub mod countdown;
pub mod dashboard_view;
pub mod error;
pub mod render;
pub mod router;
pub mod sensor_view;
pub mod status;
pub mod stdio;
pub mod transport;
pub mod view;
pub mod workout;

pub use activity_log::{ActivityLog, LogEntry};
pub use client::run;
pub use config::{load_config, Config};
pub use confirm::{Confirmation, ConfirmationService};
pub use dashboard_view::DashboardView;
pub use error::{DashboardError, Result};
pub use render::{render, EntityDisplayState, Indicator};
pub use router::{EventRouter, Subscription};
pub use sensor_view::SensorView;
pub use status::{SensorStatus, StatusEvent};
pub use transport::{InboundMessage, OutboundMessage, PushTransport};
pub use view::{View, ViewCommand};
pub use workout::{ControlMode, WorkoutSettings, WorkoutView};

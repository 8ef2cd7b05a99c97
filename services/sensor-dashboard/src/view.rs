//! Rendering surface abstraction driven by the client loop

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::router::EventRouter;
use crate::workout::ControlMode;

/// User interaction forwarded to a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ViewCommand {
    /// Start, stop or finish the workout
    Control { mode: ControlMode },
    SetInputTime { value: String },
    SetEndSensor { value: Option<String> },
    SetLedToggle { value: bool },
    SetBrightness { value: u8 },
    SetColor { value: String },
    /// Restart `sensor-<id>` or `all_sensors` after confirmation
    RestartSensors { target: String },
    /// Delete `sensor-<id>` or `all_sensors` after confirmation
    DeleteSensors { target: String },
}

/// Timed work a view asked to be woken up for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTimer {
    CountdownTick,
    HideBanner,
}

/// A rendering surface owning its own state
#[async_trait]
pub trait View: Send + Sized {
    fn name(&self) -> &'static str;

    /// Register this view's channel handlers
    fn subscribe(&self, routes: &mut EventRouter<Self>);

    async fn on_command(&mut self, command: ViewCommand) {
        tracing::debug!("{} view ignores {:?}", self.name(), command);
    }

    /// Resolves when timed work is due. Views without timers never resolve.
    async fn timer_due(&mut self) -> ViewTimer {
        std::future::pending().await
    }

    async fn on_timer(&mut self, _timer: ViewTimer) {}

    /// True when no timer is pending
    fn is_idle(&self) -> bool {
        true
    }

    /// Current rendered state
    fn snapshot(&self) -> serde_json::Value;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_control_command() {
        let command: ViewCommand =
            serde_json::from_str(r#"{"command":"control","mode":"start"}"#).unwrap();
        assert_eq!(
            command,
            ViewCommand::Control {
                mode: ControlMode::Start
            }
        );
    }

    #[test]
    fn parse_setting_commands() {
        let command: ViewCommand =
            serde_json::from_str(r#"{"command":"set_input_time","value":"00:05"}"#).unwrap();
        assert_eq!(
            command,
            ViewCommand::SetInputTime {
                value: "00:05".to_string()
            }
        );

        let command: ViewCommand =
            serde_json::from_str(r#"{"command":"set_end_sensor","value":null}"#).unwrap();
        assert_eq!(command, ViewCommand::SetEndSensor { value: None });
    }

    #[derive(Debug)]
    struct Static;

    impl View for Static {
        fn name(&self) -> &'static str {
            "static"
        }

        fn subscribe(&self, _routes: &mut EventRouter<Self>) {}

        fn snapshot(&self) -> serde_json::Value {
            serde_json::Value::Null
        }
    }

    #[test]
    fn default_timer_never_fires() {
        let mut view = Static;
        assert!(view.is_idle());
        let mut due = tokio_test::task::spawn(view.timer_due());
        tokio_test::assert_pending!(due.poll());
    }

    #[test]
    fn parse_delete_command() {
        let command: ViewCommand =
            serde_json::from_str(r#"{"command":"delete_sensors","target":"sensor-2"}"#).unwrap();
        assert_eq!(
            command,
            ViewCommand::DeleteSensors {
                target: "sensor-2".to_string()
            }
        );
    }

    #[test]
    fn reject_out_of_range_brightness() {
        let result: Result<ViewCommand, _> =
            serde_json::from_str(r#"{"command":"set_brightness","value":300}"#);
        assert!(result.is_err());
    }
}

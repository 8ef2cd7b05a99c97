//! Workout control view: settings form, countdown, status banner, counter

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::config::WorkoutConfig;
use crate::countdown::{parse_duration, Countdown, Tick};
use crate::router::{self, EventRouter};
use crate::transport::{OutboundMessage, PushTransport, SYSTEM_CONTROL};
use crate::view::{View, ViewCommand, ViewTimer};

/// Workout control command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Start,
    Stop,
    Finished,
}

/// Form state of the workout control view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutSettings {
    pub workout_id: u32,
    /// Duration input, `HH:MM[:SS]`
    pub input_time: String,
    /// Sensor that ends a lap, e.g. `sensor-6`
    pub end_sensor: Option<String>,
    pub led_toggle: bool,
    pub brightness: u8,
    /// LED color as `#rrggbb`
    pub color: String,
}

impl Default for WorkoutSettings {
    fn default() -> Self {
        Self {
            workout_id: 1,
            input_time: String::new(),
            end_sensor: None,
            led_toggle: false,
            brightness: 100,
            color: "#ffffff".to_string(),
        }
    }
}

/// Extra parameters sent for the timed workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedParameters {
    /// Total seconds, `null` when no duration was entered
    pub time: Option<u64>,
    pub end_sensor: Option<String>,
    pub led_toggle: bool,
    pub brightness: u8,
    pub color: String,
}

/// Payload of the `system_control` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemControl {
    pub mode: ControlMode,
    pub workout_id: u32,
    #[serde(flatten)]
    pub timed: Option<TimedParameters>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerTone {
    Started,
    Stopped,
}

/// Alert shown when the workout starts or stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBanner {
    pub tone: BannerTone,
    pub message: String,
    pub visible: bool,
}

const STARTED_MESSAGE: &str = "Attention! The workout has started!";
const STOPPED_MESSAGE: &str = "Attention! The workout has stopped.";

/// Text for a `counter` payload
pub fn counter_text(payload: &Value) -> String {
    let stairs = payload.get("stair_counter").and_then(Value::as_u64);
    let steps = payload.get("steps_counter").and_then(Value::as_u64);
    match (stairs, steps) {
        (Some(stairs), Some(steps)) => format!("{} stairs / {} steps", stairs, steps),
        _ => match payload {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        },
    }
}

pub struct WorkoutView {
    settings: WorkoutSettings,
    timed_workout_id: u32,
    stopped_banner: Duration,
    countdown: Countdown,
    started: bool,
    banner: Option<StatusBanner>,
    banner_hide_at: Option<Instant>,
    counter: String,
    transport: Arc<dyn PushTransport>,
}

impl fmt::Debug for WorkoutView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkoutView")
            .field("settings", &self.settings)
            .field("started", &self.started)
            .field("countdown", &self.countdown.state())
            .field("banner", &self.banner)
            .finish()
    }
}

impl WorkoutView {
    pub fn new(config: &WorkoutConfig, transport: Arc<dyn PushTransport>) -> Self {
        let settings = config.defaults.clone();
        let mut countdown = Countdown::new(config.tick_interval());
        countdown.preview(&settings.input_time);
        Self {
            settings,
            timed_workout_id: config.timed_workout_id,
            stopped_banner: config.stopped_banner(),
            countdown,
            started: false,
            banner: None,
            banner_hide_at: None,
            counter: String::new(),
            transport,
        }
    }

    pub fn settings(&self) -> &WorkoutSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut WorkoutSettings {
        &mut self.settings
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn timer_display(&self) -> &str {
        self.countdown.display()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn banner(&self) -> Option<&StatusBanner> {
        self.banner.as_ref()
    }

    pub fn counter(&self) -> &str {
        &self.counter
    }

    pub fn is_timed(&self) -> bool {
        self.settings.workout_id == self.timed_workout_id
    }

    /// Update the duration input; the timer display follows it
    pub fn set_input_time(&mut self, value: impl Into<String>) {
        self.settings.input_time = value.into();
        self.countdown.preview(&self.settings.input_time);
    }

    pub fn on_counter(&mut self, payload: &Value) {
        self.counter = counter_text(payload);
    }

    /// Payload for a control message with the current settings
    pub fn control_payload(&self, mode: ControlMode) -> SystemControl {
        let timed = self.is_timed().then(|| TimedParameters {
            time: parse_duration(&self.settings.input_time),
            end_sensor: self.settings.end_sensor.clone(),
            led_toggle: self.settings.led_toggle,
            brightness: self.settings.brightness,
            color: self.settings.color.clone(),
        });
        SystemControl {
            mode,
            workout_id: self.settings.workout_id,
            timed,
        }
    }

    /// Apply a control command and emit it
    ///
    /// Starting a timed workout with a zero duration finishes it right after
    /// the start message. The browser client sent `finished` before `start`
    /// and left the started banner up; here the messages go out in the order
    /// they happen and the view ends stopped. Keep it that way.
    pub async fn control(&mut self, mode: ControlMode) {
        let mut next = Some(mode);
        while let Some(mode) = next.take() {
            next = self.apply_control(mode);
            self.emit_control(mode).await;
        }
    }

    fn apply_control(&mut self, mode: ControlMode) -> Option<ControlMode> {
        let timed = self.is_timed();
        let mut follow_up = None;
        match mode {
            ControlMode::Start => {
                if timed {
                    self.countdown.reset(&self.settings.input_time);
                    let total = parse_duration(&self.settings.input_time).unwrap_or(0);
                    if self.countdown.start(total) == Some(Tick::Finished) {
                        follow_up = Some(ControlMode::Finished);
                    }
                }
                self.started = true;
            }
            ControlMode::Stop | ControlMode::Finished => {
                if timed {
                    self.countdown.reset(&self.settings.input_time);
                }
                self.started = false;
            }
        }
        self.update_banner();
        follow_up
    }

    async fn emit_control(&self, mode: ControlMode) {
        let payload = self.control_payload(mode);
        tracing::info!(
            "Workout {} control: {:?} (timed={})",
            payload.workout_id,
            mode,
            payload.timed.is_some()
        );
        let data = match serde_json::to_value(&payload) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Could not encode control payload: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .transport
            .emit(OutboundMessage::new(SYSTEM_CONTROL, data))
            .await
        {
            tracing::warn!("Control message {:?} not sent: {}", mode, e);
        }
    }

    fn update_banner(&mut self) {
        if self.started {
            self.banner = Some(StatusBanner {
                tone: BannerTone::Started,
                message: STARTED_MESSAGE.to_string(),
                visible: true,
            });
            self.banner_hide_at = None;
        } else {
            self.banner = Some(StatusBanner {
                tone: BannerTone::Stopped,
                message: STOPPED_MESSAGE.to_string(),
                visible: true,
            });
            self.banner_hide_at = Some(Instant::now() + self.stopped_banner);
        }
    }

    fn hide_banner(&mut self) {
        self.banner_hide_at = None;
        if let Some(banner) = self.banner.as_mut() {
            banner.visible = false;
        }
    }
}

#[async_trait]
impl View for WorkoutView {
    fn name(&self) -> &'static str {
        "workout"
    }

    fn subscribe(&self, routes: &mut EventRouter<Self>) {
        routes.on(router::CONNECT, |_: &mut Self, _: &Value| {
            tracing::info!("Workout view connected")
        });
        routes.on(router::CONNECT_ERROR, |_: &mut Self, payload: &Value| {
            router::log_connect_error(payload)
        });
        routes.on(router::COUNTER, |view: &mut Self, payload: &Value| {
            view.on_counter(payload)
        });
    }

    async fn on_command(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::Control { mode } => self.control(mode).await,
            ViewCommand::SetInputTime { value } => self.set_input_time(value),
            ViewCommand::SetEndSensor { value } => self.settings.end_sensor = value,
            ViewCommand::SetLedToggle { value } => self.settings.led_toggle = value,
            ViewCommand::SetBrightness { value } => self.settings.brightness = value,
            ViewCommand::SetColor { value } => self.settings.color = value,
            other => tracing::debug!("workout view ignores {:?}", other),
        }
    }

    async fn timer_due(&mut self) -> ViewTimer {
        let hide_at = self.banner_hide_at;
        tokio::select! {
            _ = self.countdown.wait_tick() => ViewTimer::CountdownTick,
            _ = sleep_until_some(hide_at) => ViewTimer::HideBanner,
        }
    }

    async fn on_timer(&mut self, timer: ViewTimer) {
        match timer {
            ViewTimer::CountdownTick => {
                if self.countdown.tick() == Tick::Finished {
                    self.control(ControlMode::Finished).await;
                }
            }
            ViewTimer::HideBanner => self.hide_banner(),
        }
    }

    fn is_idle(&self) -> bool {
        !self.countdown.is_running() && self.banner_hide_at.is_none()
    }

    fn snapshot(&self) -> Value {
        json!({
            "view": self.name(),
            "settings": self.settings,
            "started": self.started,
            "timer": self.countdown.display(),
            "countdown": self.countdown.state(),
            "banner": self.banner,
            "counter": self.counter,
        })
    }
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

//! Single sensor view: one sensor's live panel and its own activity log

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::activity_log::ActivityLog;
use crate::config::SensorViewConfig;
use crate::confirm::{self, ConfirmationService};
use crate::render::{capitalize_first, indicator_for, number_text, render, Indicator};
use crate::router::{self, resolve_entity_id, EventRouter, Subscription};
use crate::status::{SensorStatus, StatusEvent};
use crate::transport::PushTransport;
use crate::view::{View, ViewCommand};

/// Log line for the single sensor view
pub fn status_line(event: &StatusEvent) -> String {
    let status = capitalize_first(event.status.as_str());
    if event.status == SensorStatus::Trigger {
        format!("{} - Distance: {} mm", status, number_text(event.distance))
    } else {
        format!(
            "{} - Thres: {} mm - MaxDist: {} mm",
            status,
            number_text(event.threshold),
            number_text(event.max_distance)
        )
    }
}

/// Live fields of the sensor panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorPanel {
    pub status_text: String,
    pub indicator: Indicator,
    pub trigger_distance: String,
    pub threshold: String,
    pub max_distance: String,
    /// Width of the threshold bar; kept from the previous update when unknown
    pub progress_percent: Option<f64>,
}

impl Default for SensorPanel {
    fn default() -> Self {
        Self {
            status_text: String::new(),
            indicator: indicator_for(&SensorStatus::Unknown),
            trigger_distance: String::new(),
            threshold: String::new(),
            max_distance: String::new(),
            progress_percent: None,
        }
    }
}

pub struct SensorView {
    entity_id: String,
    panel: SensorPanel,
    log: ActivityLog,
    transport: Arc<dyn PushTransport>,
    confirmation: Arc<dyn ConfirmationService>,
}

impl fmt::Debug for SensorView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorView")
            .field("entity_id", &self.entity_id)
            .field("panel", &self.panel)
            .field("log", &self.log.len())
            .finish()
    }
}

impl SensorView {
    /// `page_id` is the page's sensor identifier, e.g. `sensor-4`
    pub fn new(
        page_id: &str,
        config: &SensorViewConfig,
        transport: Arc<dyn PushTransport>,
        confirmation: Arc<dyn ConfirmationService>,
    ) -> Self {
        let entity_id = resolve_entity_id(page_id);
        tracing::debug!("Sensor view for '{}' (page '{}')", entity_id, page_id);
        Self {
            entity_id,
            panel: SensorPanel::default(),
            log: ActivityLog::new(config.log_capacity),
            transport,
            confirmation,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn subscription(&self) -> Subscription {
        Subscription::Entity(self.entity_id.clone())
    }

    pub fn panel(&self) -> &SensorPanel {
        &self.panel
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn on_connect(&mut self) {
        self.log.push("connected!");
    }

    /// Apply a status payload for this sensor
    pub fn apply_status(&mut self, payload: &Value) {
        let event = StatusEvent::from_payload(payload);
        self.log.push(status_line(&event));

        let display = render(&event);
        self.panel.status_text = display.status_text;
        self.panel.indicator = display.indicator;
        self.panel.trigger_distance = number_text(event.distance);
        self.panel.threshold = number_text(event.threshold);
        self.panel.max_distance = number_text(event.max_distance);
        if display.progress_percent.is_some() {
            self.panel.progress_percent = display.progress_percent;
        }
    }

    fn page_target(&self) -> String {
        format!("{}{}", router::SENSOR_PAGE_PREFIX, self.entity_id)
    }

    /// Restart this sensor after confirmation
    pub async fn restart(&self) -> bool {
        let target = self.page_target();
        match confirm::restart_sensors(
            self.confirmation.as_ref(),
            self.transport.as_ref(),
            &target,
        )
        .await
        {
            Ok(sent) => sent,
            Err(e) => {
                tracing::warn!("Restart of '{}' not sent: {}", target, e);
                false
            }
        }
    }

    /// Delete this sensor after confirmation
    pub async fn delete(&self) -> bool {
        let target = self.page_target();
        match confirm::delete_sensors(
            self.confirmation.as_ref(),
            self.transport.as_ref(),
            &target,
        )
        .await
        {
            Ok(sent) => sent,
            Err(e) => {
                tracing::warn!("Delete of '{}' not sent: {}", target, e);
                false
            }
        }
    }

    fn owns_target(&self, target: &str) -> bool {
        if resolve_entity_id(target) == self.entity_id {
            return true;
        }
        tracing::warn!(
            "Sensor view for '{}' refuses to act on '{}'",
            self.entity_id,
            target
        );
        false
    }
}

#[async_trait]
impl View for SensorView {
    fn name(&self) -> &'static str {
        "sensor"
    }

    fn subscribe(&self, routes: &mut EventRouter<Self>) {
        routes.on(router::CONNECT, |view: &mut Self, _: &Value| view.on_connect());
        routes.on(router::CONNECT_ERROR, |_: &mut Self, payload: &Value| {
            router::log_connect_error(payload)
        });
        routes.on(
            self.subscription().channel(),
            |view: &mut Self, payload: &Value| view.apply_status(payload),
        );
    }

    async fn on_command(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::RestartSensors { target } => {
                if self.owns_target(&target) {
                    self.restart().await;
                }
            }
            ViewCommand::DeleteSensors { target } => {
                if self.owns_target(&target) {
                    self.delete().await;
                }
            }
            other => tracing::debug!("sensor view ignores {:?}", other),
        }
    }

    fn snapshot(&self) -> Value {
        json!({
            "view": self.name(),
            "sensor": self.entity_id,
            "panel": self.panel,
            "log": self.log.lines(),
        })
    }
}

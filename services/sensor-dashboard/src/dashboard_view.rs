//! Sensor list view: every sensor's indicator plus a shared activity log

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::activity_log::ActivityLog;
use crate::config::DashboardViewConfig;
use crate::confirm::{self, ConfirmationService};
use crate::render::{number_text, render, EntityDisplayState};
use crate::router::{self, EventRouter, Subscription};
use crate::status::{SensorStatus, StatusEvent};
use crate::transport::PushTransport;
use crate::view::{View, ViewCommand};

/// Log line for the list view
pub fn status_line(event: &StatusEvent) -> String {
    if event.status == SensorStatus::Trigger {
        format!(
            "Sensor {} is: {} - D: {} mm",
            event.entity_id,
            event.status,
            number_text(event.distance)
        )
    } else {
        format!(
            "Sensor {} is: {} - T: {} mm - Md: {} mm",
            event.entity_id,
            event.status,
            number_text(event.threshold),
            number_text(event.max_distance)
        )
    }
}

pub struct DashboardView {
    sensors: BTreeMap<String, EntityDisplayState>,
    log: ActivityLog,
    transport: Arc<dyn PushTransport>,
    confirmation: Arc<dyn ConfirmationService>,
}

impl fmt::Debug for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardView")
            .field("sensors", &self.sensors.len())
            .field("log", &self.log.len())
            .finish()
    }
}

impl DashboardView {
    pub fn new(
        config: &DashboardViewConfig,
        transport: Arc<dyn PushTransport>,
        confirmation: Arc<dyn ConfirmationService>,
    ) -> Self {
        Self {
            sensors: BTreeMap::new(),
            log: ActivityLog::new(config.log_capacity),
            transport,
            confirmation,
        }
    }

    pub fn sensor(&self, entity_id: &str) -> Option<&EntityDisplayState> {
        self.sensors.get(entity_id)
    }

    pub fn sensors(&self) -> &BTreeMap<String, EntityDisplayState> {
        &self.sensors
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn on_connect(&mut self) {
        self.log.push("connected!");
    }

    /// Apply a broadcast status payload
    pub fn apply_status(&mut self, payload: &Value) {
        let event = StatusEvent::from_payload(payload);
        self.log.push(status_line(&event));
        if event.entity_id.is_empty() {
            tracing::warn!("Status without sensor id, indicator not updated");
            return;
        }
        self.sensors.insert(event.entity_id.clone(), render(&event));
    }

    /// Restart one sensor or all of them, after confirmation
    pub async fn restart_sensors(&self, target: &str) -> bool {
        match confirm::restart_sensors(
            self.confirmation.as_ref(),
            self.transport.as_ref(),
            target,
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

    /// Delete one sensor or all of them, after confirmation
    pub async fn delete_sensors(&self, target: &str) -> bool {
        match confirm::delete_sensors(
            self.confirmation.as_ref(),
            self.transport.as_ref(),
            target,
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
}

#[async_trait]
impl View for DashboardView {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn subscribe(&self, routes: &mut EventRouter<Self>) {
        routes.on(router::CONNECT, |view: &mut Self, _: &Value| view.on_connect());
        routes.on(router::CONNECT_ERROR, |_: &mut Self, payload: &Value| {
            router::log_connect_error(payload)
        });
        routes.on(
            Subscription::Broadcast.channel(),
            |view: &mut Self, payload: &Value| view.apply_status(payload),
        );
    }

    async fn on_command(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::RestartSensors { target } => {
                self.restart_sensors(&target).await;
            }
            ViewCommand::DeleteSensors { target } => {
                self.delete_sensors(&target).await;
            }
            other => tracing::debug!("dashboard view ignores {:?}", other),
        }
    }

    fn snapshot(&self) -> Value {
        json!({
            "view": self.name(),
            "sensors": self.sensors,
            "log": self.log.lines(),
        })
    }
}

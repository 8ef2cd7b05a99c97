//! Confirmation guard in front of destructive actions
//!
//! The dialog itself belongs to an external service; this module only
//! describes the prompts and emits the follow-up message once confirmed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::transport::{OutboundMessage, PushTransport, DELETE_SENSORS, RESTART_SENSORS};

/// Restart or delete target meaning every sensor
pub const ALL_SENSORS: &str = "all_sensors";

/// Outcome of a confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

/// Text shown by a confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub body: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

/// External confirmation-dialog service
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ConfirmationService: Send + Sync {
    async fn show(&self, prompt: &ConfirmPrompt) -> crate::Result<Confirmation>;
}

/// Destructive actions that need the user's consent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveAction {
    RestartSensor,
    RestartAllSensors,
    DeleteSensor,
    DeleteAllSensors,
}

impl DestructiveAction {
    pub fn prompt(self) -> ConfirmPrompt {
        let (body, confirm_text) = match self {
            DestructiveAction::RestartSensor => ("This will restart the sensor.", "Restart"),
            DestructiveAction::RestartAllSensors => {
                ("This will restart all sensors.", "Restart")
            }
            DestructiveAction::DeleteSensor => ("This will delete the sensor.", "Delete"),
            DestructiveAction::DeleteAllSensors => ("This will delete all sensors.", "Delete"),
        };
        ConfirmPrompt {
            title: "Are you sure?".to_string(),
            body: body.to_string(),
            confirm_text: confirm_text.to_string(),
            cancel_text: "Cancel".to_string(),
        }
    }
}

/// Ask for confirmation. A failing dialog counts as cancelled.
pub async fn confirm(service: &dyn ConfirmationService, action: DestructiveAction) -> bool {
    match service.show(&action.prompt()).await {
        Ok(Confirmation::Confirmed) => true,
        Ok(Confirmation::Cancelled) => {
            tracing::debug!("{:?} cancelled by user", action);
            false
        }
        Err(e) => {
            tracing::warn!("Confirmation dialog for {:?} failed: {}", action, e);
            false
        }
    }
}

/// Restart one sensor (`sensor-<id>`) or all of them (`all_sensors`) after
/// confirmation. Returns whether the restart was sent.
pub async fn restart_sensors(
    service: &dyn ConfirmationService,
    transport: &dyn PushTransport,
    target: &str,
) -> crate::Result<bool> {
    let action = if target == ALL_SENSORS {
        DestructiveAction::RestartAllSensors
    } else {
        DestructiveAction::RestartSensor
    };
    guarded_emit(service, transport, action, RESTART_SENSORS, target).await
}

/// Delete one sensor (`sensor-<id>`) or all of them (`all_sensors`) after
/// confirmation. Returns whether the delete was sent.
pub async fn delete_sensors(
    service: &dyn ConfirmationService,
    transport: &dyn PushTransport,
    target: &str,
) -> crate::Result<bool> {
    let action = if target == ALL_SENSORS {
        DestructiveAction::DeleteAllSensors
    } else {
        DestructiveAction::DeleteSensor
    };
    guarded_emit(service, transport, action, DELETE_SENSORS, target).await
}

async fn guarded_emit(
    service: &dyn ConfirmationService,
    transport: &dyn PushTransport,
    action: DestructiveAction,
    event: &str,
    target: &str,
) -> crate::Result<bool> {
    if !confirm(service, action).await {
        return Ok(false);
    }

    tracing::info!("{:?} confirmed for '{}'", action, target);
    transport
        .emit(OutboundMessage::new(
            event,
            serde_json::Value::String(target.to_string()),
        ))
        .await?;
    Ok(true)
}

/// Confirmation service that always answers the same way
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirmation(pub Confirmation);

#[async_trait]
impl ConfirmationService for StaticConfirmation {
    async fn show(&self, prompt: &ConfirmPrompt) -> crate::Result<Confirmation> {
        tracing::info!("{} {} -> {:?}", prompt.title, prompt.body, self.0);
        Ok(self.0)
    }
}

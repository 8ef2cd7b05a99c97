//! BDD test world for the sensor dashboard

use std::sync::{Arc, Mutex};

use cucumber::World;
use sensor_dashboard::confirm::ConfirmPrompt;
use sensor_dashboard::transport::OutboundMessage;
use sensor_dashboard::{DashboardView, EventRouter, WorkoutView};
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    // Sensor list testing
    pub dashboard: Option<DashboardView>,
    pub dashboard_routes: Option<EventRouter<DashboardView>>,
    pub prompts: Arc<Mutex<Vec<ConfirmPrompt>>>,

    // Workout testing
    pub workout: Option<WorkoutView>,

    // Everything the view under test emitted
    pub outbound: Option<UnboundedReceiver<OutboundMessage>>,
    pub sent: Vec<OutboundMessage>,
}

impl DashboardWorld {
    /// Move emitted messages from the transport channel into `sent`
    pub fn collect_sent(&mut self) -> &[OutboundMessage] {
        if let Some(rx) = self.outbound.as_mut() {
            while let Ok(message) = rx.try_recv() {
                self.sent.push(message);
            }
        }
        &self.sent
    }
}

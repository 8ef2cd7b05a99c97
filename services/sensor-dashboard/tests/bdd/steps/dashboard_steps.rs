//! BDD step definitions for the sensor list feature

use std::sync::{Arc, Mutex};

use cucumber::{given, then, when};
use serde_json::{json, Value};

use sensor_dashboard::config::DashboardViewConfig;
use sensor_dashboard::confirm::{ConfirmPrompt, ConfirmationService};
use sensor_dashboard::transport::{self, InboundMessage};
use sensor_dashboard::{Confirmation, DashboardView, EventRouter, View, ViewCommand};

use crate::world::DashboardWorld;

/// A dialog double that records prompts and answers the same way every time
#[derive(Debug)]
struct RecordingConfirmation {
    answer: Confirmation,
    prompts: Arc<Mutex<Vec<ConfirmPrompt>>>,
}

#[async_trait::async_trait]
impl ConfirmationService for RecordingConfirmation {
    async fn show(&self, prompt: &ConfirmPrompt) -> sensor_dashboard::Result<Confirmation> {
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok(self.answer)
    }
}

fn parse_answer(s: &str) -> Confirmation {
    match s {
        "confirm" => Confirmation::Confirmed,
        "cancel" => Confirmation::Cancelled,
        other => panic!("Unknown answer: {}", other),
    }
}

fn build_dashboard(world: &mut DashboardWorld, answer: Confirmation) {
    let (transport, rx) = transport::channel();
    let confirmation = RecordingConfirmation {
        answer,
        prompts: Arc::clone(&world.prompts),
    };
    let view = DashboardView::new(
        &DashboardViewConfig::default(),
        Arc::new(transport),
        Arc::new(confirmation),
    );
    let mut routes = EventRouter::new();
    view.subscribe(&mut routes);

    world.dashboard = Some(view);
    world.dashboard_routes = Some(routes);
    world.outbound = Some(rx);
}

fn deliver(world: &mut DashboardWorld, event: &str, data: Value) {
    let routes = world.dashboard_routes.as_ref().expect("dashboard not set");
    let view = world.dashboard.as_mut().expect("dashboard not set");
    routes.dispatch(view, &InboundMessage::new(event, data));
}

#[given("a dashboard view")]
fn dashboard_view(world: &mut DashboardWorld) {
    build_dashboard(world, Confirmation::Cancelled);
}

#[given(expr = "a dashboard view where the user will {word} dialogs")]
fn dashboard_view_answering(world: &mut DashboardWorld, answer: String) {
    build_dashboard(world, parse_answer(&answer));
}

#[when("the transport connects")]
fn transport_connects(world: &mut DashboardWorld) {
    deliver(world, "connect", Value::Null);
}

#[when(expr = "the transport fails to connect with {string}")]
fn transport_fails(world: &mut DashboardWorld, message: String) {
    deliver(world, "connect_error", json!({ "message": message }));
}

#[when(expr = "sensor {string} reports status {string}")]
fn sensor_reports(world: &mut DashboardWorld, id: String, status: String) {
    deliver(
        world,
        "sensors_status_all",
        json!({ "client_id": id, "status": status }),
    );
}

#[when(expr = "sensor {string} reports status {string} with threshold {int} and max distance {int}")]
fn sensor_reports_measurements(
    world: &mut DashboardWorld,
    id: String,
    status: String,
    threshold: u32,
    max_distance: u32,
) {
    deliver(
        world,
        "sensors_status_all",
        json!({
            "client_id": id,
            "status": status,
            "threshold": threshold,
            "max_distance": max_distance
        }),
    );
}

#[when(expr = "sensor {string} is triggered at {int} mm")]
fn sensor_triggered(world: &mut DashboardWorld, id: String, distance: u32) {
    deliver(
        world,
        "sensors_status_all",
        json!({ "client_id": id, "status": "trigger", "distance": distance }),
    );
}

#[when(expr = "{int} status messages arrive")]
fn many_messages(world: &mut DashboardWorld, count: u32) {
    for i in 0..count {
        deliver(
            world,
            "sensors_status_all",
            json!({ "client_id": i, "status": "idle" }),
        );
    }
}

#[when(expr = "the user restarts {string}")]
async fn user_restarts(world: &mut DashboardWorld, target: String) {
    let view = world.dashboard.as_mut().expect("dashboard not set");
    view.on_command(ViewCommand::RestartSensors { target }).await;
}

#[when(expr = "the user deletes {string}")]
async fn user_deletes(world: &mut DashboardWorld, target: String) {
    let view = world.dashboard.as_mut().expect("dashboard not set");
    view.on_command(ViewCommand::DeleteSensors { target }).await;
}

#[then(expr = "sensor {string} shows the {string} indicator")]
fn sensor_indicator(world: &mut DashboardWorld, id: String, indicator: String) {
    let view = world.dashboard.as_ref().expect("dashboard not set");
    let sensor = view.sensor(&id).expect("sensor not rendered");
    let actual = serde_json::to_value(sensor.indicator).unwrap();
    assert_eq!(actual, json!(indicator));
}

#[then(expr = "sensor {string} shows a progress of {float} percent")]
fn sensor_progress(world: &mut DashboardWorld, id: String, percent: f64) {
    let view = world.dashboard.as_ref().expect("dashboard not set");
    let sensor = view.sensor(&id).expect("sensor not rendered");
    let actual = sensor.progress_percent.expect("no progress");
    assert!((actual - percent).abs() < 1e-9, "progress {}", actual);
}

#[then(expr = "the newest log entry reads {string}")]
fn newest_log_entry(world: &mut DashboardWorld, expected: String) {
    let view = world.dashboard.as_ref().expect("dashboard not set");
    assert_eq!(view.log().head().expect("log empty").message, expected);
}

#[then(expr = "the log holds {int} entries")]
fn log_holds(world: &mut DashboardWorld, count: usize) {
    let view = world.dashboard.as_ref().expect("dashboard not set");
    assert_eq!(view.log().len(), count);
}

#[then(expr = "the user was asked {string}")]
fn user_was_asked(world: &mut DashboardWorld, body: String) {
    let prompts = world.prompts.lock().unwrap();
    assert!(
        prompts.iter().any(|p| p.body == body),
        "prompts: {:?}",
        *prompts
    );
}

#[then(expr = "a restart of {string} is sent")]
fn restart_sent(world: &mut DashboardWorld, target: String) {
    let sent = world.collect_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].event, "restart_sensors");
    assert_eq!(sent[0].data, json!(target));
}

#[then(expr = "a delete of {string} is sent")]
fn delete_sent(world: &mut DashboardWorld, target: String) {
    let sent = world.collect_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].event, "delete_sensors");
    assert_eq!(sent[0].data, json!(target));
}

#[then("nothing is sent")]
fn nothing_sent(world: &mut DashboardWorld) {
    assert!(world.collect_sent().is_empty());
}

//! BDD step definitions for the workout countdown feature

use std::sync::Arc;

use cucumber::{given, then, when};
use serde_json::json;

use sensor_dashboard::config::WorkoutConfig;
use sensor_dashboard::transport;
use sensor_dashboard::view::ViewTimer;
use sensor_dashboard::{ControlMode, View, ViewCommand, WorkoutView};

use crate::world::DashboardWorld;

fn parse_mode(s: &str) -> ControlMode {
    match s {
        "start" => ControlMode::Start,
        "stop" => ControlMode::Stop,
        "finished" => ControlMode::Finished,
        other => panic!("Unknown mode: {}", other),
    }
}

fn build_workout(world: &mut DashboardWorld, workout_id: u32, input_time: &str) {
    let (transport, rx) = transport::channel();
    let mut config = WorkoutConfig::default();
    config.defaults.workout_id = workout_id;
    config.defaults.input_time = input_time.to_string();
    world.workout = Some(WorkoutView::new(&config, Arc::new(transport)));
    world.outbound = Some(rx);
}

fn workout(world: &mut DashboardWorld) -> &mut WorkoutView {
    world.workout.as_mut().expect("workout not set")
}

#[given(expr = "a timed workout with duration {string}")]
fn timed_workout(world: &mut DashboardWorld, input_time: String) {
    build_workout(world, 2, &input_time);
}

#[given(expr = "workout {int} with duration {string}")]
fn workout_with_id(world: &mut DashboardWorld, workout_id: u32, input_time: String) {
    build_workout(world, workout_id, &input_time);
}

#[when(expr = "the user enters the duration {string}")]
async fn user_enters_duration(world: &mut DashboardWorld, value: String) {
    workout(world)
        .on_command(ViewCommand::SetInputTime { value })
        .await;
}

#[when(expr = "the user sets the color to {string} and brightness to {int}")]
async fn user_sets_led(world: &mut DashboardWorld, color: String, brightness: u8) {
    let view = workout(world);
    view.on_command(ViewCommand::SetColor { value: color }).await;
    view.on_command(ViewCommand::SetBrightness { value: brightness })
        .await;
}

#[when(expr = "the user sends {word}")]
async fn user_sends(world: &mut DashboardWorld, mode: String) {
    workout(world)
        .on_command(ViewCommand::Control {
            mode: parse_mode(&mode),
        })
        .await;
}

#[when(expr = "{int} second(s) elapse(s)")]
async fn seconds_elapse(world: &mut DashboardWorld, seconds: u32) {
    let view = workout(world);
    for _ in 0..seconds {
        view.on_timer(ViewTimer::CountdownTick).await;
    }
}

#[when("the stopped banner delay passes")]
async fn banner_delay_passes(world: &mut DashboardWorld) {
    workout(world).on_timer(ViewTimer::HideBanner).await;
}

#[when(expr = "the counter reports {int} stairs and {int} steps")]
fn counter_reports(world: &mut DashboardWorld, stairs: u32, steps: u32) {
    workout(world).on_counter(&json!({ "stair_counter": stairs, "steps_counter": steps }));
}

#[then(expr = "the timer shows {string}")]
fn timer_shows(world: &mut DashboardWorld, expected: String) {
    assert_eq!(workout(world).timer_display(), expected);
}

#[then("the countdown is running")]
fn countdown_running(world: &mut DashboardWorld) {
    assert!(workout(world).countdown().is_running());
}

#[then("the countdown is idle")]
fn countdown_idle(world: &mut DashboardWorld) {
    assert!(!workout(world).countdown().is_running());
}

#[then(expr = "the sent modes are {string}")]
fn sent_modes(world: &mut DashboardWorld, expected: String) {
    let modes: Vec<String> = world
        .collect_sent()
        .iter()
        .map(|m| {
            assert_eq!(m.event, "system_control");
            m.data["mode"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    let expected: Vec<String> = expected.split(", ").map(str::to_string).collect();
    assert_eq!(modes, expected);
}

#[then(expr = "the last control message carries time {int}")]
fn last_time(world: &mut DashboardWorld, seconds: u64) {
    let sent = world.collect_sent();
    let last = sent.last().expect("nothing sent");
    assert_eq!(last.data["time"], json!(seconds));
}

#[then("the last control message carries no time")]
fn last_time_null(world: &mut DashboardWorld) {
    let sent = world.collect_sent();
    let last = sent.last().expect("nothing sent");
    assert!(last.data["time"].is_null());
}

#[then(expr = "the last control message has color {string} and brightness {int}")]
fn last_led(world: &mut DashboardWorld, color: String, brightness: u8) {
    let sent = world.collect_sent();
    let last = sent.last().expect("nothing sent");
    assert_eq!(last.data["color"], json!(color));
    assert_eq!(last.data["brightness"], json!(brightness));
}

#[then("the last control message has only mode and workout id")]
fn last_untimed(world: &mut DashboardWorld) {
    let sent = world.collect_sent();
    let last = sent.last().expect("nothing sent");
    let keys: Vec<&String> = last.data.as_object().expect("object").keys().collect();
    assert_eq!(keys.len(), 2, "keys: {:?}", keys);
    assert!(last.data.get("mode").is_some());
    assert!(last.data.get("workout_id").is_some());
}

#[then(expr = "the banner reads {string}")]
fn banner_reads(world: &mut DashboardWorld, message: String) {
    let banner = workout(world).banner().expect("no banner");
    assert!(banner.visible);
    assert_eq!(banner.message, message);
}

#[then("the banner is hidden")]
fn banner_hidden(world: &mut DashboardWorld) {
    let banner = workout(world).banner().expect("no banner");
    assert!(!banner.visible);
}

#[then(expr = "the counter shows {string}")]
fn counter_shows(world: &mut DashboardWorld, expected: String) {
    assert_eq!(workout(world).counter(), expected);
}

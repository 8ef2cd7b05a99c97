//! Sensor Dashboard CLI
//!
//! Runs one view against JSON lines: push messages and user commands are read
//! from stdin, outbound control messages are written to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use sensor_dashboard::confirm::StaticConfirmation;
use sensor_dashboard::transport;
use sensor_dashboard::{
    load_config, stdio, Config, Confirmation, ConfirmationService, DashboardView, SensorView,
    View, WorkoutView,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Level;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewKind {
    /// All sensors with a shared activity log
    Dashboard,
    /// One sensor's panel and log
    Sensor,
    /// Workout control with countdown
    Workout,
}

#[derive(Parser)]
#[command(name = "sensor-dashboard")]
#[command(about = "Live sensor dashboard and workout control client")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// View to run
    #[arg(long, value_enum, default_value = "dashboard")]
    view: ViewKind,

    /// Page id of the sensor for the sensor view, e.g. sensor-4
    #[arg(long, default_value = "sensor-1")]
    sensor: String,

    /// Selected workout (overrides config file)
    #[arg(long)]
    workout_id: Option<u32>,

    /// Answer every confirmation dialog with yes
    #[arg(short, long)]
    yes: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, view={:?}, sensor={}, log_level={:?}",
        args.config,
        args.view,
        args.sensor,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(workout_id) = args.workout_id {
        config.workout.defaults.workout_id = workout_id;
    }

    let answer = if args.yes {
        Confirmation::Confirmed
    } else {
        Confirmation::Cancelled
    };
    let confirmation: Arc<dyn ConfirmationService> = Arc::new(StaticConfirmation(answer));
    let (transport, outbound) = transport::channel();

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted");
            ctrl_c.cancel();
        }
    });

    let writer = tokio::spawn(stdio::write_output(tokio::io::stdout(), outbound));

    match args.view {
        ViewKind::Dashboard => {
            let view = DashboardView::new(&config.dashboard, Arc::new(transport), confirmation);
            serve(view, cancel).await?;
        }
        ViewKind::Sensor => {
            let view = SensorView::new(
                &args.sensor,
                &config.sensor,
                Arc::new(transport),
                confirmation,
            );
            serve(view, cancel).await?;
        }
        ViewKind::Workout => {
            let view = WorkoutView::new(&config.workout, Arc::new(transport));
            serve(view, cancel).await?;
        }
    }

    writer.await??;
    Ok(())
}

async fn serve<V: View>(view: V, cancel: CancellationToken) -> sensor_dashboard::Result<()> {
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    // left running on return; the process exits without joining it
    let _input = stdio::spawn_input_thread(inbound_tx, command_tx)?;

    let view = sensor_dashboard::run(view, inbound_rx, command_rx, cancel).await?;
    tracing::info!("Final {} view: {}", view.name(), view.snapshot());
    Ok(())
}

//! Client loop: routes inbound messages, user commands and view timers into
//! a single view, one event at a time

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use crate::router::EventRouter;
use crate::transport::InboundMessage;
use crate::view::{View, ViewCommand};

/// Drive `view` until cancelled, or until both input channels are closed and
/// the view has no pending timers. Returns the view in its final state.
pub async fn run<V: View>(
    mut view: V,
    mut inbound: UnboundedReceiver<InboundMessage>,
    mut commands: UnboundedReceiver<ViewCommand>,
    cancel: CancellationToken,
) -> crate::Result<V> {
    let mut routes = EventRouter::new();
    view.subscribe(&mut routes);
    tracing::info!("Starting {} view: {:?}", view.name(), routes);

    let mut inbound_open = true;
    let mut commands_open = true;

    loop {
        if !inbound_open && !commands_open && view.is_idle() {
            tracing::info!("Inputs closed, {} view done", view.name());
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("{} view cancelled", view.name());
                break;
            }
            message = inbound.recv(), if inbound_open => match message {
                Some(message) => {
                    routes.dispatch(&mut view, &message);
                }
                None => {
                    tracing::debug!("Inbound channel closed");
                    inbound_open = false;
                }
            },
            command = commands.recv(), if commands_open => match command {
                Some(command) => {
                    tracing::debug!("Command: {:?}", command);
                    view.on_command(command).await;
                }
                None => {
                    tracing::debug!("Command channel closed");
                    commands_open = false;
                }
            },
            timer = view.timer_due() => {
                view.on_timer(timer).await;
            }
        }

        tracing::debug!("{} view: {}", view.name(), view.snapshot());
    }

    Ok(view)
}

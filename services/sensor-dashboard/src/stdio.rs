//! JSON-lines harness: feeds the client loop from a reader and writes
//! outbound messages to a writer
//!
//! Each input line is either a command (`{"command": "control", "mode": "start"}`)
//! or a push message (`{"event": "counter", "data": {...}}`).

use std::io::BufRead;
use std::thread::JoinHandle;

use serde::Deserialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::transport::{InboundMessage, OutboundMessage};
use crate::view::ViewCommand;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputLine {
    Command(ViewCommand),
    Message(InboundMessage),
}

/// Read JSON lines until EOF, forwarding messages and commands. Unparseable
/// lines are skipped. Returns when the input ends or the client loop is gone.
///
/// Reads block the calling thread.
pub fn forward_input<R>(
    reader: R,
    inbound: UnboundedSender<InboundMessage>,
    commands: UnboundedSender<ViewCommand>,
) -> crate::Result<()>
where
    R: BufRead,
{
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let sent = match serde_json::from_str::<InputLine>(line) {
            Ok(InputLine::Command(command)) => commands.send(command).is_ok(),
            Ok(InputLine::Message(message)) => inbound.send(message).is_ok(),
            Err(e) => {
                tracing::warn!("Skipping input line: {}", e);
                continue;
            }
        };
        if !sent {
            tracing::debug!("Client loop gone, input no longer forwarded");
            break;
        }
    }
    tracing::debug!("Input ended");
    Ok(())
}

/// Forward stdin on its own OS thread.
///
/// The thread is never joined by the runtime, so a read parked on an open
/// stdin does not hold up process exit after cancellation.
pub fn spawn_input_thread(
    inbound: UnboundedSender<InboundMessage>,
    commands: UnboundedSender<ViewCommand>,
) -> crate::Result<JoinHandle<()>> {
    let handle = std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            if let Err(e) = forward_input(stdin.lock(), inbound, commands) {
                tracing::warn!("Reading stdin failed: {}", e);
            }
        })?;
    Ok(handle)
}

/// Write each outbound message as one JSON line
pub async fn write_output<W>(
    mut writer: W,
    mut outbound: UnboundedReceiver<OutboundMessage>,
) -> crate::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = outbound.recv().await {
        let mut line = serde_json::to_vec(&message)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

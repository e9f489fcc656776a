//! The socket owner: framing, queues and the per-connection task set.
//!
//! Four cooperative tokio tasks run per open connection, all tied to
//! one [`CancellationToken`]:
//!
//! - **reader** — the only blocking socket read, bounded by a short
//!   timeout so cancellation stays responsive; frames the byte stream
//!   into CRLF-terminated lines and feeds the raw-line channel.
//! - **sender** — drains a bounded batch of queued outbound messages
//!   per tick and writes them to the socket.
//! - **dispatcher** — parses raw lines and forwards good ones as
//!   [`ConnectionEvent::MessageReceived`]; bad ones are logged and
//!   dropped.
//! - **supervisor** — enforces the shutdown order: reader stops, the
//!   dispatcher drains, the sender closes the socket, and only then is
//!   `Disconnected` emitted, exactly once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use fsdlink_models::{parse_line, Message, ProtocolRevision, LINE_END};

use crate::error::ClientError;
use crate::event::{ConnectionEvent, DisconnectReason};

/// How long one socket read may block before the loop re-checks
/// cancellation. A lapse is "no data yet", never an error.
const READ_POLL: Duration = Duration::from_millis(10);
/// Scheduling tick of the sender loop.
const SEND_TICK: Duration = Duration::from_millis(10);
/// Outbound messages written per tick, so a busy send queue cannot
/// starve the reader of socket bandwidth.
const MAX_MESSAGES_PER_TICK: usize = 10;
/// Socket read buffer size.
const READ_BUFFER_SIZE: usize = 256;

type ClosingSlot = Arc<Mutex<Option<(DisconnectReason, Option<String>)>>>;

/// A live connection to an FSD server.
///
/// Cheap to clone the handle state; dropping the last handle does not
/// tear the connection down — call [`disconnect`](Self::disconnect).
pub struct Connection {
    outbound: mpsc::UnboundedSender<Message>,
    shutdown: CancellationToken,
    closing: ClosingSlot,
    connected: Arc<AtomicBool>,
}

impl Connection {
    /// Open a TCP connection and start the per-connection tasks.
    ///
    /// Returns the connection handle plus the event stream carrying
    /// `MessageReceived` and the final `Disconnected`.
    pub async fn connect(
        host: &str,
        port: u16,
        revision: ProtocolRevision,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ConnectionEvent>), ClientError> {
        let stream = TcpStream::connect((host, port)).await?;
        debug!(host, port, "connected");
        let (read_half, write_half) = stream.into_split();

        let (raw_tx, raw_rx) = mpsc::unbounded_channel::<String>();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<ConnectionEvent>();

        let shutdown = CancellationToken::new();
        let closing: ClosingSlot = Arc::new(Mutex::new(None));
        let connected = Arc::new(AtomicBool::new(true));

        let reader = tokio::spawn(reader_loop(
            read_half,
            raw_tx,
            shutdown.clone(),
            closing.clone(),
        ));
        let sender = tokio::spawn(sender_loop(
            write_half,
            outbound_rx,
            shutdown.clone(),
            closing.clone(),
        ));
        let dispatcher = tokio::spawn(dispatch_loop(raw_rx, event_tx.clone(), revision));

        // Supervisor: the one place Disconnected is raised.
        {
            let shutdown = shutdown.clone();
            let closing = closing.clone();
            let connected = connected.clone();
            tokio::spawn(async move {
                // Reader exit (loss or cancellation) drives the rest.
                let _ = reader.await;
                shutdown.cancel();
                // The reader dropped its end of the raw-line channel, so
                // the dispatcher finishes once the backlog is drained.
                let _ = dispatcher.await;
                // The sender closes the socket on its way out.
                let _ = sender.await;
                connected.store(false, Ordering::SeqCst);

                let (reason, kick_message) = closing
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .take()
                    .unwrap_or((DisconnectReason::ForcedDisconnect, None));
                debug!(%reason, "connection closed");
                let _ = event_tx.send(ConnectionEvent::Disconnected {
                    reason,
                    kick_message,
                });
            });
        }

        Ok((
            Self {
                outbound: outbound_tx,
                shutdown,
                closing,
                connected,
            },
            event_rx,
        ))
    }

    /// Queue a message for sending. Never blocks; the sender loop
    /// writes it on its next tick.
    pub fn send(&self, message: Message) -> Result<(), ClientError> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        self.outbound
            .send(message)
            .map_err(|_| ClientError::NotConnected)
    }

    /// Ask the connection to shut down. Returns immediately; the
    /// `Disconnected` event follows once all loops have stopped.
    pub fn disconnect(&self, reason: DisconnectReason) {
        self.disconnect_with_message(reason, None);
    }

    /// [`disconnect`](Self::disconnect) with an attached kick message.
    pub fn disconnect_with_message(&self, reason: DisconnectReason, kick_message: Option<String>) {
        note_closing(&self.closing, reason, kick_message);
        self.shutdown.cancel();
    }

    /// Whether the connection is still up.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Record the closing reason; the first writer wins.
fn note_closing(closing: &ClosingSlot, reason: DisconnectReason, kick_message: Option<String>) {
    let mut slot = closing
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if slot.is_none() {
        *slot = Some((reason, kick_message));
    }
}

// ---------------------------------------------------------------------------
// Loops
// ---------------------------------------------------------------------------

async fn reader_loop(
    mut read_half: OwnedReadHalf,
    raw_tx: mpsc::UnboundedSender<String>,
    shutdown: CancellationToken,
    closing: ClosingSlot,
) {
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut acc = String::new();

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            result = tokio::time::timeout(READ_POLL, read_half.read(&mut buf)) => {
                match result {
                    // No data within the poll window: keep looping.
                    Err(_elapsed) => {}
                    Ok(Ok(0)) => {
                        debug!("server closed the connection");
                        note_closing(&closing, DisconnectReason::ForcedDisconnect, None);
                        shutdown.cancel();
                        break;
                    }
                    Ok(Ok(n)) => {
                        // The protocol is plain ASCII text.
                        acc.push_str(&String::from_utf8_lossy(&buf[..n]));
                        while let Some(end) = acc.find(LINE_END) {
                            let line: String = acc.drain(..end + LINE_END.len()).collect();
                            if raw_tx.send(line).is_err() {
                                return;
                            }
                        }
                    }
                    Ok(Err(e)) => {
                        warn!(error = %e, "read failed, treating as connection loss");
                        note_closing(&closing, DisconnectReason::ForcedDisconnect, None);
                        shutdown.cancel();
                        break;
                    }
                }
            }
        }
    }
}

async fn sender_loop(
    mut write_half: OwnedWriteHalf,
    mut outbound_rx: mpsc::UnboundedReceiver<Message>,
    shutdown: CancellationToken,
    closing: ClosingSlot,
) {
    let mut tick = tokio::time::interval(SEND_TICK);

    'outer: loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            _ = tick.tick() => {
                for _ in 0..MAX_MESSAGES_PER_TICK {
                    let message = match outbound_rx.try_recv() {
                        Ok(message) => message,
                        Err(_) => continue 'outer,
                    };
                    if let Err(e) = write_half.write_all(message.decompose().as_bytes()).await {
                        warn!(error = %e, "write failed, treating as connection loss");
                        note_closing(&closing, DisconnectReason::ForcedDisconnect, None);
                        shutdown.cancel();
                        break 'outer;
                    }
                }
            }
        }
    }

    // Close our half of the socket; the reader half dies with its task.
    let _ = write_half.shutdown().await;
}

async fn dispatch_loop(
    mut raw_rx: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    revision: ProtocolRevision,
) {
    // Runs until the raw-line channel is closed *and* drained, so no
    // line received before shutdown is lost.
    while let Some(line) = raw_rx.recv().await {
        match parse_line(&line, revision) {
            Ok(message) => {
                if events.send(ConnectionEvent::MessageReceived(message)).is_err() {
                    break;
                }
            }
            // One bad line never stops the loop.
            Err(e) => trace!(line = line.trim_end(), error = %e, "discarding unparsable line"),
        }
    }
}

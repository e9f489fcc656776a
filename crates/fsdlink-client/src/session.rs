//! The session: one connection, one entity registry, one event stream.
//!
//! A `Session` is an explicitly owned value — whoever drives the UI
//! lifecycle holds it. There is no process-wide session state.

use tokio::sync::mpsc;
use tracing::info;

use fsdlink_models::{FsdName, Message, WeatherDataMessage, WeatherRequestType};

use crate::config::SessionConfig;
use crate::connection::Connection;
use crate::error::ClientError;
use crate::event::{ConnectionEvent, DisconnectReason, SessionEvent};
use crate::registry::Registry;

/// A live session on an FSD network.
///
/// Owns the connection and the local controller identity; the entity
/// set lives inside a dedicated actor task that is the only writer, so
/// message dispatch and the refresh sweep can never race.
pub struct Session {
    connection: Connection,
    callsign: FsdName,
    sectors: Vec<i64>,
}

impl Session {
    /// Connect and start the session actor.
    ///
    /// Returns the session handle plus the stream of
    /// [`SessionEvent`]s. The stream ends with `Disconnected` followed
    /// by `Closed`, in that order, exactly once each.
    pub async fn connect(
        config: SessionConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>), ClientError> {
        let (connection, mut conn_rx) =
            Connection::connect(&config.host, config.port, config.revision).await?;
        info!(
            host = %config.host,
            port = config.port,
            callsign = %config.callsign,
            "session opened"
        );

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut registry = Registry::new(event_tx.clone(), config.activity);
        let refresh_interval = config.refresh_interval;

        tokio::spawn(async move {
            let mut sweep = tokio::time::interval(refresh_interval);
            loop {
                tokio::select! {
                    event = conn_rx.recv() => match event {
                        Some(ConnectionEvent::MessageReceived(message)) => {
                            registry.handle_message(message);
                        }
                        Some(ConnectionEvent::Disconnected { reason, kick_message }) => {
                            info!(%reason, "session closing");
                            registry.clear();
                            let _ = event_tx.send(SessionEvent::Disconnected {
                                reason,
                                kick_message,
                            });
                            let _ = event_tx.send(SessionEvent::Closed);
                            break;
                        }
                        // Connection task set is gone; treat as closed.
                        None => {
                            registry.clear();
                            let _ = event_tx.send(SessionEvent::Closed);
                            break;
                        }
                    },
                    _ = sweep.tick() => registry.tick(),
                }
            }
        });

        Ok((
            Self {
                connection,
                callsign: config.callsign,
                sectors: config.sectors,
            },
            event_rx,
        ))
    }

    /// Queue an arbitrary message for sending.
    pub fn send(&self, message: Message) -> Result<(), ClientError> {
        self.connection.send(message)
    }

    /// Request weather text for a station from a weather provider.
    pub fn request_weather(
        &self,
        destination: FsdName,
        request_type: WeatherRequestType,
        station: &str,
    ) -> Result<(), ClientError> {
        let message =
            WeatherDataMessage::new(self.callsign.clone(), destination, request_type, station)?;
        self.send(Message::WeatherData(message))
    }

    /// Close the session at the user's request.
    pub fn close(&self) {
        self.connection.disconnect(DisconnectReason::UserDisconnect);
    }

    /// Tear the session down for a non-user reason (e.g. a kick).
    pub fn disconnect(&self, reason: DisconnectReason, kick_message: Option<String>) {
        self.connection.disconnect_with_message(reason, kick_message);
    }

    /// Whether the underlying connection is still up.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Callsign of the local controller.
    pub fn callsign(&self) -> &FsdName {
        &self.callsign
    }

    /// Sector identifiers the local controller covers.
    pub fn sectors(&self) -> &[i64] {
        &self.sectors
    }
}

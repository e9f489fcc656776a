//! Events emitted towards the session consumer (renderer, UI, CLI).
//!
//! All notification is fire-and-forget over channels; nothing here is
//! a callback, so no consumer code ever runs while internal state is
//! being mutated.

use serde::Serialize;

use fsdlink_models::{Message, WeatherDataMessage};

use crate::entity::EntitySnapshot;

/// Why a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum DisconnectReason {
    /// The local user asked to close the session.
    UserDisconnect,
    /// The server kicked the local user; a kick message may be attached.
    Kick,
    /// The connection was lost without local intent (I/O failure,
    /// zero-byte read, write failure).
    ForcedDisconnect,
}

/// Events emitted by a [`Connection`](crate::connection::Connection).
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// One wire line parsed successfully.
    MessageReceived(Message),
    /// The connection ended. Emitted exactly once, after all loops have
    /// stopped and the socket is closed.
    Disconnected {
        /// Why the connection ended.
        reason: DisconnectReason,
        /// Server-supplied text when `reason` is [`DisconnectReason::Kick`].
        kick_message: Option<String>,
    },
}

/// Events emitted by a [`Session`](crate::session::Session).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A previously unknown entity appeared.
    EntityAdded(EntitySnapshot),
    /// An entity received new telemetry or crossed the activity boundary.
    EntityUpdated(EntitySnapshot),
    /// An entity was removed: delete message or timeout.
    EntityDestroyed(EntitySnapshot),
    /// Weather text addressed to us.
    WeatherData(WeatherDataMessage),
    /// The underlying connection ended.
    Disconnected {
        /// Why the connection ended.
        reason: DisconnectReason,
        /// Server-supplied text when `reason` is [`DisconnectReason::Kick`].
        kick_message: Option<String>,
    },
    /// The session is torn down; no further events follow. Emitted
    /// exactly once.
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_events_export_as_tagged_json() {
        let event = SessionEvent::Disconnected {
            reason: DisconnectReason::Kick,
            kick_message: Some("server full".into()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "disconnected");
        assert_eq!(json["reason"], "Kick");
        assert_eq!(json["kick_message"], "server full");

        let json = serde_json::to_value(SessionEvent::Closed).unwrap();
        assert_eq!(json["event"], "closed");
    }

    #[test]
    fn disconnect_reason_display() {
        assert_eq!(DisconnectReason::UserDisconnect.to_string(), "UserDisconnect");
        assert_eq!(DisconnectReason::ForcedDisconnect.to_string(), "ForcedDisconnect");
    }
}

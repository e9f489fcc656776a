//! The live entity registry.
//!
//! Routes decoded messages to the right entity, creates entities on
//! first sight, runs the periodic refresh sweep and emits
//! added/updated/destroyed notifications.
//!
//! The registry has a single owner — the session actor task — so the
//! entity map needs no lock at all, and every notification is a
//! channel send performed *after* the mutation it reports. No consumer
//! code can ever re-enter the registry while it holds internal state
//! half-updated.

use std::collections::HashMap;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use fsdlink_models::{DeleteMessage, Message};

use crate::activity::Refresh;
use crate::config::ActivityConfig;
use crate::entity::Entity;
use crate::event::SessionEvent;

/// Live entity set plus the outgoing event channel.
pub(crate) struct Registry {
    entities: HashMap<String, Entity>,
    events: mpsc::UnboundedSender<SessionEvent>,
    activity: ActivityConfig,
}

impl Registry {
    pub(crate) fn new(
        events: mpsc::UnboundedSender<SessionEvent>,
        activity: ActivityConfig,
    ) -> Self {
        Self {
            entities: HashMap::new(),
            events,
            activity,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entities.len()
    }

    /// Route one decoded message. Called for every `MessageReceived`.
    pub(crate) fn handle_message(&mut self, message: Message) {
        self.handle_message_at(message, Instant::now());
    }

    pub(crate) fn handle_message_at(&mut self, message: Message, now: Instant) {
        match message {
            Message::PilotPosition(msg) => {
                let key = msg.source.to_key();
                if let Some(entity) = self.entities.get_mut(&key) {
                    if entity.handle_pilot_position(&msg, now) {
                        let snapshot = entity.snapshot(now);
                        self.emit(SessionEvent::EntityUpdated(snapshot));
                    } else {
                        // Protocol inconsistency; non-fatal.
                        warn!(name = %msg.source, "pilot position for non-pilot entity, ignoring");
                    }
                } else {
                    let mut entity = Entity::new_pilot(msg.source.clone(), self.activity, now);
                    entity.handle_pilot_position(&msg, now);
                    let snapshot = entity.snapshot(now);
                    self.entities.insert(key, entity);
                    debug!(name = %msg.source, "pilot appeared");
                    self.emit(SessionEvent::EntityAdded(snapshot));
                }
            }
            Message::PlanePosition(msg) => {
                let key = msg.source.to_key();
                if let Some(entity) = self.entities.get_mut(&key) {
                    if entity.handle_plane_position(&msg, now) {
                        let snapshot = entity.snapshot(now);
                        self.emit(SessionEvent::EntityUpdated(snapshot));
                    } else {
                        warn!(name = %msg.source, "plane position for non-plane entity, ignoring");
                    }
                } else {
                    let mut entity = Entity::new_plane(msg.source.clone(), self.activity, now);
                    entity.handle_plane_position(&msg, now);
                    let snapshot = entity.snapshot(now);
                    self.entities.insert(key, entity);
                    debug!(name = %msg.source, "plane appeared");
                    self.emit(SessionEvent::EntityAdded(snapshot));
                }
            }
            Message::DeletePilot(msg) | Message::DeletePlane(msg) | Message::DeleteAtc(msg) => {
                self.handle_delete(&msg, now);
            }
            Message::WeatherData(msg) => {
                self.emit(SessionEvent::WeatherData(msg));
            }
        }
    }

    fn handle_delete(&mut self, msg: &DeleteMessage, now: Instant) {
        match self.entities.remove(&msg.source.to_key()) {
            Some(entity) => {
                debug!(name = %entity.name(), "entity deleted by server");
                let snapshot = entity.snapshot(now);
                self.emit(SessionEvent::EntityDestroyed(snapshot));
            }
            // Deletes for not-yet-known entities are expected traffic.
            None => trace!(name = %msg.source, "delete for unknown entity, ignoring"),
        }
    }

    /// The periodic refresh sweep: activity boundaries fire `EntityUpdated`,
    /// timeouts remove the entity and fire `EntityDestroyed` exactly once.
    pub(crate) fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub(crate) fn tick_at(&mut self, now: Instant) {
        let mut crossed = Vec::new();
        let mut timed_out = Vec::new();
        for (key, entity) in &mut self.entities {
            match entity.refresh_at(now) {
                Refresh::Unchanged => {}
                Refresh::Crossed => crossed.push(key.clone()),
                Refresh::TimedOut => timed_out.push(key.clone()),
            }
        }

        for key in crossed {
            if let Some(entity) = self.entities.get(&key) {
                self.emit(SessionEvent::EntityUpdated(entity.snapshot(now)));
            }
        }
        // Removal happens before the notification goes out, so an
        // event consumer can never observe a timed-out entity as live.
        for key in timed_out {
            if let Some(entity) = self.entities.remove(&key) {
                debug!(name = %entity.name(), "entity timed out");
                self.emit(SessionEvent::EntityDestroyed(entity.snapshot(now)));
            }
        }
    }

    /// Drop all entities. The session emits `Closed` after this.
    pub(crate) fn clear(&mut self) {
        self.entities.clear();
    }

    fn emit(&self, event: SessionEvent) {
        // The consumer may be gone during teardown; that is fine.
        let _ = self.events.send(event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Tracked remote entities.
//!
//! The original inheritance hierarchy (base entity, pilot/plane/
//! controller subclasses) is a tagged variant here, with the activity
//! clock composed in. Matching on [`EntityKind`] is exhaustive, so a
//! new variant cannot be half-handled.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use fsdlink_models::{
    FsdName, GeoPoint, PilotPositionMessage, PlanePosition, PlanePositionMessage,
};

use crate::activity::{ActivityClock, Refresh};
use crate::config::ActivityConfig;

// ---------------------------------------------------------------------------
// Per-kind state
// ---------------------------------------------------------------------------

/// Telemetry tracked for a legacy-revision pilot.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PilotState {
    /// Most recent reported position.
    pub position: Option<GeoPoint>,
    /// The position before that; present only from the second report on.
    pub last_position: Option<GeoPoint>,
    /// Speed over ground in knots.
    pub ground_speed_kt: i32,
    /// True altitude in feet.
    pub altitude_ft: i32,
}

/// Telemetry tracked for an extended-revision plane.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PlaneState {
    /// Most recent decoded telemetry.
    pub position: Option<PlanePosition>,
}

/// Identity of a controller (including the local one).
#[derive(Debug, Clone, Serialize)]
pub struct ControllerState {
    /// Display callsign.
    pub callsign: String,
    /// Sector identifiers this controller covers.
    pub sectors: Vec<i64>,
}

/// What kind of participant an entity is, with its kind-specific state.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    /// A pilot (legacy protocol revision).
    Pilot(PilotState),
    /// A plane (extended protocol revision).
    Plane(PlaneState),
    /// An air-traffic controller.
    Controller(ControllerState),
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One tracked remote participant, identified by its protocol name.
///
/// Owned exclusively by the session registry; destroyed on timeout or
/// on receipt of a delete message. Never resurrects — a later
/// occurrence of the same name is a fresh entity.
#[derive(Debug, Clone)]
pub struct Entity {
    name: FsdName,
    last_seen: DateTime<Utc>,
    clock: ActivityClock,
    kind: EntityKind,
}

impl Entity {
    fn new(name: FsdName, kind: EntityKind, config: ActivityConfig, now: Instant) -> Self {
        Self {
            name,
            last_seen: Utc::now(),
            clock: ActivityClock::new_at(config, now),
            kind,
        }
    }

    /// A pilot with no telemetry yet.
    pub fn new_pilot(name: FsdName, config: ActivityConfig, now: Instant) -> Self {
        Self::new(name, EntityKind::Pilot(PilotState::default()), config, now)
    }

    /// A plane with no telemetry yet.
    pub fn new_plane(name: FsdName, config: ActivityConfig, now: Instant) -> Self {
        Self::new(name, EntityKind::Plane(PlaneState::default()), config, now)
    }

    /// A controller entity. The live session keeps its own identity in
    /// [`Session`](crate::session::Session) fields; controller entities
    /// only ever enter a registry through explicit construction.
    #[cfg(test)]
    pub(crate) fn new_controller(
        name: FsdName,
        callsign: String,
        sectors: Vec<i64>,
        config: ActivityConfig,
        now: Instant,
    ) -> Self {
        Self::new(
            name,
            EntityKind::Controller(ControllerState { callsign, sectors }),
            config,
            now,
        )
    }

    /// The unique protocol name.
    pub fn name(&self) -> &FsdName {
        &self.name
    }

    /// Kind tag plus kind-specific state.
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Apply a pilot position report. Returns `false` (message ignored)
    /// when this entity is not a pilot.
    pub fn handle_pilot_position(&mut self, msg: &PilotPositionMessage, now: Instant) -> bool {
        let EntityKind::Pilot(state) = &mut self.kind else {
            return false;
        };
        if state.position.is_some() {
            state.last_position = state.position;
        }
        state.position = Some(msg.position);
        state.ground_speed_kt = msg.ground_speed_kt;
        state.altitude_ft = msg.true_altitude_ft;
        self.touch(now);
        true
    }

    /// Apply a plane position report. Returns `false` when this entity
    /// is not a plane.
    pub fn handle_plane_position(&mut self, msg: &PlanePositionMessage, now: Instant) -> bool {
        let EntityKind::Plane(state) = &mut self.kind else {
            return false;
        };
        state.position = Some(msg.position);
        self.touch(now);
        true
    }

    fn touch(&mut self, now: Instant) {
        self.last_seen = Utc::now();
        self.clock.wake_up_at(now);
    }

    /// Run the activity-threshold check (see [`ActivityClock::refresh_at`]).
    pub fn refresh_at(&mut self, now: Instant) -> Refresh {
        self.clock.refresh_at(now)
    }

    /// Snapshot for event consumers.
    pub fn snapshot(&self, now: Instant) -> EntitySnapshot {
        EntitySnapshot {
            name: self.name.clone(),
            last_seen: self.last_seen,
            inactive: self.clock.is_inactive_at(now),
            kind: self.kind.clone(),
        }
    }
}

/// Immutable copy of an entity's outward-visible state, carried by
/// session events.
#[derive(Debug, Clone, Serialize)]
pub struct EntitySnapshot {
    /// The unique protocol name.
    pub name: FsdName,
    /// When telemetry was last received (UTC).
    pub last_seen: DateTime<Utc>,
    /// Whether the inactive threshold has elapsed.
    pub inactive: bool,
    /// Kind tag plus kind-specific state.
    pub kind: EntityKind,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use fsdlink_models::{PilotRating, Squawk, SquawkMode};

    use super::*;

    fn name(s: &str) -> FsdName {
        FsdName::new(s).unwrap()
    }

    fn position_msg(lat: f64, lon: f64) -> PilotPositionMessage {
        PilotPositionMessage {
            squawk_mode: SquawkMode::Charlie,
            source: name("DLH123"),
            squawk: Squawk::from_octal("1200").unwrap(),
            rating: PilotRating::CommercialPilot,
            position: GeoPoint::new(lat, lon),
            true_altitude_ft: 10_000,
            ground_speed_kt: 250,
            pitch_bank_heading: 0,
            altitude_difference_ft: 0,
        }
    }

    #[test]
    fn previous_position_appears_on_second_report() {
        let now = Instant::now();
        let mut pilot = Entity::new_pilot(name("DLH123"), ActivityConfig::default(), now);

        assert!(pilot.handle_pilot_position(&position_msg(53.0, 8.0), now));
        let EntityKind::Pilot(state) = pilot.kind() else {
            panic!("expected pilot")
        };
        assert_eq!(state.position, Some(GeoPoint::new(53.0, 8.0)));
        assert_eq!(state.last_position, None);

        assert!(pilot.handle_pilot_position(&position_msg(53.1, 8.1), now));
        let EntityKind::Pilot(state) = pilot.kind() else {
            panic!("expected pilot")
        };
        assert_eq!(state.position, Some(GeoPoint::new(53.1, 8.1)));
        assert_eq!(state.last_position, Some(GeoPoint::new(53.0, 8.0)));
    }

    #[test]
    fn wrong_variant_is_rejected() {
        let now = Instant::now();
        let mut controller = Entity::new_controller(
            name("EDWW_W_CTR"),
            "EDWW_W_CTR".into(),
            vec![53, 54, 55],
            ActivityConfig::default(),
            now,
        );
        assert!(!controller.handle_pilot_position(&position_msg(53.0, 8.0), now));
    }

    #[test]
    fn telemetry_wakes_the_clock() {
        let config = ActivityConfig::default();
        let t0 = Instant::now();
        let mut pilot = Entity::new_pilot(name("DLH123"), config, t0);

        let later = t0 + config.inactive_after * 2;
        assert_eq!(pilot.refresh_at(later), Refresh::Crossed);
        pilot.handle_pilot_position(&position_msg(53.0, 8.0), later);
        assert!(!pilot.snapshot(later).inactive);
    }
}

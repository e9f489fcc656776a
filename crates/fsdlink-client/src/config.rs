//! Session and activity-tracking configuration.

use std::time::Duration;

use fsdlink_models::{FsdName, ProtocolRevision};

/// Thresholds for the per-entity activity clock.
#[derive(Debug, Clone, Copy)]
pub struct ActivityConfig {
    /// Elapsed time without telemetry after which an entity counts as inactive.
    pub inactive_after: Duration,
    /// Elapsed time without telemetry after which an entity is removed.
    pub timeout_after: Duration,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            inactive_after: Duration::from_millis(10_000),
            timeout_after: Duration::from_millis(60_000),
        }
    }
}

/// Everything needed to open a session against an FSD server.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server host name or address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Callsign of the local controller.
    pub callsign: FsdName,
    /// Sector identifiers the local controller covers.
    pub sectors: Vec<i64>,
    /// Protocol revision the server speaks.
    pub revision: ProtocolRevision,
    /// Activity thresholds applied to every tracked entity.
    pub activity: ActivityConfig,
    /// Interval of the registry refresh sweep.
    pub refresh_interval: Duration,
}

impl SessionConfig {
    /// Config with default revision, thresholds and refresh interval.
    pub fn new(host: impl Into<String>, port: u16, callsign: FsdName) -> Self {
        Self {
            host: host.into(),
            port,
            callsign,
            sectors: Vec::new(),
            revision: ProtocolRevision::default(),
            activity: ActivityConfig::default(),
            refresh_interval: Duration::from_millis(1_000),
        }
    }
}

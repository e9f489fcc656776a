//! Geographic positions and decoded plane telemetry.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GeoPoint
// ---------------------------------------------------------------------------

/// A WGS84 coordinate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, north positive.
    pub lat: f64,
    /// Longitude in degrees, east positive.
    pub lon: f64,
}

impl GeoPoint {
    /// Construct from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{lat={:.4}, lon={:.4}}}", self.lat, self.lon)
    }
}

// ---------------------------------------------------------------------------
// Pitch/bank/heading word
// ---------------------------------------------------------------------------

/// On-ground flag inside the packed pitch/bank/heading word (bit 1).
const PBH_ON_GROUND: u32 = 0x2;

/// Decode the on-ground flag from a packed pitch/bank/heading word.
pub fn pbh_on_ground(word: u32) -> bool {
    word & PBH_ON_GROUND != 0
}

/// Decode true heading in degrees from a packed pitch/bank/heading word.
///
/// Bits 2..=11 carry the heading in 1024ths of a full circle.
pub fn pbh_true_heading(word: u32) -> f64 {
    f64::from((word >> 2) & 0x3FF) * 360.0 / 1024.0
}

// ---------------------------------------------------------------------------
// PlanePosition
// ---------------------------------------------------------------------------

/// Fully decoded plane telemetry from an extended-revision position report.
///
/// Unlike the raw wire fields this carries the pressure altitude as an
/// absolute value and the heading/on-ground flag already unpacked.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PlanePosition {
    /// Position in WGS84.
    pub position: GeoPoint,
    /// Speed over ground in knots.
    pub ground_speed_kt: i32,
    /// Altitude above mean sea level in feet.
    pub elevation_ft: i32,
    /// Indicated altitude at standard barometer setting, in feet.
    pub pressure_altitude_ft: i32,
    /// Heading with reference to true north, in degrees.
    pub true_heading_deg: f64,
    /// Whether the plane is on the ground.
    pub on_ground: bool,
}

impl fmt::Display for PlanePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{lat={:.4}, lon={:.4}, speed={}kt, alt={}ft, pressAlt={}ft, onGround={}}}",
            self.position.lat,
            self.position.lon,
            self.ground_speed_kt,
            self.elevation_ft,
            self.pressure_altitude_ft,
            self.on_ground
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pbh_on_ground_flag() {
        assert!(pbh_on_ground(1_073_741_826)); // 0x4000_0002
        assert!(!pbh_on_ground(1_077_591_040)); // 0x403C_0000
        assert!(!pbh_on_ground(0));
    }

    #[test]
    fn pbh_heading_decodes_in_1024ths() {
        // Heading bits zero -> north.
        assert_eq!(pbh_true_heading(1_073_741_826), 0.0);
        // 512/1024 of a circle -> south.
        let word = 512u32 << 2;
        assert!((pbh_true_heading(word) - 180.0).abs() < f64::EPSILON);
        // Maximum heading value stays below 360.
        let word = 1023u32 << 2;
        assert!(pbh_true_heading(word) < 360.0);
    }
}

//! Typed wire messages and the `decompose` serializer.
//!
//! Every message is an immutable value: constructed either by the
//! parser from a framed wire line, or locally right before sending.
//! Field types enforce the protocol invariants, so a constructed
//! message is always serializable.
//!
//! The wire shape is `<tag><token1>:<token2>...\r\n` — note that the
//! first token is glued directly to the type tag (`@N:...`,
//! `#DPTEST123`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::name::FsdName;
use crate::position::{pbh_on_ground, pbh_true_heading, GeoPoint, PlanePosition};
use crate::rating::PilotRating;
use crate::squawk::{Squawk, SquawkMode};

/// Token separator on the wire.
pub const SEPARATOR: &str = ":";
/// Line terminator on the wire.
pub const LINE_END: &str = "\r\n";

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One typed FSD protocol message.
///
/// The two position kinds share the `@` tag; which one a line decodes
/// to depends on the negotiated
/// [`ProtocolRevision`](crate::parser::ProtocolRevision). The same
/// applies to `#DP` (delete pilot vs. delete plane).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Message {
    /// Legacy pilot telemetry (`@`).
    PilotPosition(PilotPositionMessage),
    /// Extended-revision plane telemetry (`@`).
    PlanePosition(PlanePositionMessage),
    /// METAR/TAF request or response (`&D`).
    WeatherData(WeatherDataMessage),
    /// A pilot left the network (`#DP`, legacy revision).
    DeletePilot(DeleteMessage),
    /// A plane left the network (`#DP`, extended revision).
    DeletePlane(DeleteMessage),
    /// A controller left the network (`#DA`).
    DeleteAtc(DeleteMessage),
}

impl Message {
    /// The short protocol tag this message is framed with.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::PilotPosition(_) | Self::PlanePosition(_) => PilotPositionMessage::TAG,
            Self::WeatherData(_) => WeatherDataMessage::TAG,
            Self::DeletePilot(_) | Self::DeletePlane(_) => DeleteMessage::PLANE_TAG,
            Self::DeleteAtc(_) => DeleteMessage::ATC_TAG,
        }
    }

    /// Protocol name of the sender.
    pub fn source(&self) -> &FsdName {
        match self {
            Self::PilotPosition(m) => &m.source,
            Self::PlanePosition(m) => &m.source,
            Self::WeatherData(m) => &m.source,
            Self::DeletePilot(m) | Self::DeletePlane(m) | Self::DeleteAtc(m) => &m.source,
        }
    }

    /// Protocol name of the receiver; `None` means broadcast.
    pub fn destination(&self) -> Option<&FsdName> {
        match self {
            Self::WeatherData(m) => Some(&m.destination),
            _ => None,
        }
    }

    /// Whether this message is addressed to all connected parties.
    pub fn is_broadcast(&self) -> bool {
        self.destination().is_none()
    }

    /// Serialize back into the wire-line representation, terminator included.
    ///
    /// Structural inverse of the parser: re-parsing a decomposed message
    /// yields the same field values.
    pub fn decompose(&self) -> String {
        let tokens = match self {
            Self::PilotPosition(m) => m.tokens(),
            Self::PlanePosition(m) => m.tokens(),
            Self::WeatherData(m) => m.tokens(),
            Self::DeletePilot(m) | Self::DeletePlane(m) | Self::DeleteAtc(m) => m.tokens(),
        };
        format!("{}{}{}", self.type_tag(), tokens.join(SEPARATOR), LINE_END)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The wire line minus the terminator is the natural rendering.
        f.write_str(self.decompose().trim_end())
    }
}

// ---------------------------------------------------------------------------
// PilotPositionMessage
// ---------------------------------------------------------------------------

/// Legacy pilot position report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PilotPositionMessage {
    /// Transponder mode.
    pub squawk_mode: SquawkMode,
    /// Sender.
    pub source: FsdName,
    /// Transponder code.
    pub squawk: Squawk,
    /// Pilot rating.
    pub rating: PilotRating,
    /// Position in WGS84.
    pub position: GeoPoint,
    /// True altitude in feet.
    pub true_altitude_ft: i32,
    /// Speed over ground in knots.
    pub ground_speed_kt: i32,
    /// Packed pitch/bank/heading word.
    pub pitch_bank_heading: u32,
    /// Difference between pressure altitude and true altitude, in feet.
    pub altitude_difference_ft: i32,
}

impl PilotPositionMessage {
    /// Wire tag shared by both position kinds.
    pub const TAG: &'static str = "@";

    /// Whether the on-ground flag is set in the packed word.
    pub fn on_ground(&self) -> bool {
        pbh_on_ground(self.pitch_bank_heading)
    }

    fn tokens(&self) -> Vec<String> {
        vec![
            self.squawk_mode.letter().to_string(),
            self.source.to_string(),
            self.squawk.to_string(),
            self.rating.wire_value().to_string(),
            self.position.lat.to_string(),
            self.position.lon.to_string(),
            self.true_altitude_ft.to_string(),
            self.ground_speed_kt.to_string(),
            self.pitch_bank_heading.to_string(),
            self.altitude_difference_ft.to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// PlanePositionMessage
// ---------------------------------------------------------------------------

/// Extended-revision position report.
///
/// Supersedes [`PilotPositionMessage`]; same wire tokens, but the
/// altitude pair is interpreted as elevation + pressure delta and the
/// heading/on-ground flag are decoded from the packed word.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlanePositionMessage {
    /// Transponder mode.
    pub squawk_mode: SquawkMode,
    /// Sender.
    pub source: FsdName,
    /// Transponder code.
    pub squawk: Squawk,
    /// Pilot rating.
    pub rating: PilotRating,
    /// Decoded telemetry.
    pub position: PlanePosition,
    /// Packed pitch/bank/heading word, retained for lossless re-serialization.
    pub pitch_bank_heading: u32,
}

impl PlanePositionMessage {
    /// Build the decoded telemetry from raw wire fields.
    pub fn from_wire(
        squawk_mode: SquawkMode,
        source: FsdName,
        squawk: Squawk,
        rating: PilotRating,
        position: GeoPoint,
        elevation_ft: i32,
        ground_speed_kt: i32,
        pitch_bank_heading: u32,
        altitude_difference_ft: i32,
    ) -> Self {
        Self {
            squawk_mode,
            source,
            squawk,
            rating,
            position: PlanePosition {
                position,
                ground_speed_kt,
                elevation_ft,
                pressure_altitude_ft: elevation_ft + altitude_difference_ft,
                true_heading_deg: pbh_true_heading(pitch_bank_heading),
                on_ground: pbh_on_ground(pitch_bank_heading),
            },
            pitch_bank_heading,
        }
    }

    fn tokens(&self) -> Vec<String> {
        let p = &self.position;
        vec![
            self.squawk_mode.letter().to_string(),
            self.source.to_string(),
            self.squawk.to_string(),
            self.rating.wire_value().to_string(),
            p.position.lat.to_string(),
            p.position.lon.to_string(),
            p.elevation_ft.to_string(),
            p.ground_speed_kt.to_string(),
            self.pitch_bank_heading.to_string(),
            (p.pressure_altitude_ft - p.elevation_ft).to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// WeatherDataMessage
// ---------------------------------------------------------------------------

/// The flavour of weather text being requested or delivered.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter,
)]
pub enum WeatherRequestType {
    /// Current aerodrome report.
    Metar,
    /// Terminal aerodrome forecast.
    Taf,
    /// Abbreviated forecast.
    ShortTaf,
}

impl WeatherRequestType {
    /// The integer wire code.
    pub fn wire_value(self) -> i32 {
        match self {
            Self::Metar => 0,
            Self::Taf => 1,
            Self::ShortTaf => 2,
        }
    }
}

impl TryFrom<i32> for WeatherRequestType {
    type Error = ModelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Metar),
            1 => Ok(Self::Taf),
            2 => Ok(Self::ShortTaf),
            other => Err(ModelError::InvalidRequestType(other)),
        }
    }
}

/// Weather request/response. The only addressed (non-broadcast) kind.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeatherDataMessage {
    /// Sender.
    pub source: FsdName,
    /// Receiver; weather traffic is never broadcast.
    pub destination: FsdName,
    /// Requested/delivered weather flavour.
    pub request_type: WeatherRequestType,
    /// Free text: a station identifier on request, the report on response.
    pub data: String,
}

impl WeatherDataMessage {
    /// Wire tag.
    pub const TAG: &'static str = "&D";

    /// Construct, rejecting empty payload text.
    pub fn new(
        source: FsdName,
        destination: FsdName,
        request_type: WeatherRequestType,
        data: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let data = data.into();
        if data.is_empty() {
            return Err(ModelError::MissingField {
                field: "data".into(),
            });
        }
        Ok(Self {
            source,
            destination,
            request_type,
            data,
        })
    }

    fn tokens(&self) -> Vec<String> {
        vec![
            self.source.to_string(),
            self.destination.to_string(),
            self.request_type.wire_value().to_string(),
            self.data.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// DeleteMessage
// ---------------------------------------------------------------------------

/// A participant leaving the network. Always broadcast.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeleteMessage {
    /// The departing participant.
    pub source: FsdName,
    /// Undocumented trailing integer some servers append. Kept opaque.
    pub unknown: Option<i64>,
}

impl DeleteMessage {
    /// Wire tag for pilot/plane deletes.
    pub const PLANE_TAG: &'static str = "#DP";
    /// Wire tag for controller deletes.
    pub const ATC_TAG: &'static str = "#DA";

    /// Construct a delete notice.
    pub fn new(source: FsdName, unknown: Option<i64>) -> Self {
        Self { source, unknown }
    }

    fn tokens(&self) -> Vec<String> {
        let mut tokens = vec![self.source.to_string()];
        if let Some(unknown) = self.unknown {
            tokens.push(unknown.to_string());
        }
        tokens
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> FsdName {
        FsdName::new(s).unwrap()
    }

    #[test]
    fn pilot_position_decompose() {
        let msg = Message::PilotPosition(PilotPositionMessage {
            squawk_mode: SquawkMode::Charlie,
            source: name("TEST123"),
            squawk: Squawk::from_octal("1200").unwrap(),
            rating: PilotRating::CommercialPilot,
            position: GeoPoint::new(52.75, -8.0),
            true_altitude_ft: 20_000,
            ground_speed_kt: 400,
            pitch_bank_heading: 1_073_741_826,
            altitude_difference_ft: 100,
        });
        assert_eq!(
            msg.decompose(),
            "@N:TEST123:1200:7:52.75:-8:20000:400:1073741826:100\r\n"
        );
        assert!(msg.is_broadcast());
        assert_eq!(msg.type_tag(), "@");
    }

    #[test]
    fn plane_position_from_wire_decodes_word() {
        let msg = PlanePositionMessage::from_wire(
            SquawkMode::Standby,
            name("BER155"),
            Squawk::from_octal("2000").unwrap(),
            PilotRating::AirlineTransportPilot,
            GeoPoint::new(52.8, 8.3),
            5_564,
            245,
            1_073_741_826,
            -45,
        );
        assert!(msg.position.on_ground);
        assert_eq!(msg.position.pressure_altitude_ft, 5_519);
        assert_eq!(msg.position.true_heading_deg, 0.0);
        // Serializer restores the altitude-difference token.
        let line = Message::PlanePosition(msg).decompose();
        assert!(line.ends_with(":1073741826:-45\r\n"), "{line}");
    }

    #[test]
    fn weather_data_requires_payload() {
        assert!(WeatherDataMessage::new(
            name("AAA"),
            name("BBB"),
            WeatherRequestType::Metar,
            ""
        )
        .is_err());

        let msg = WeatherDataMessage::new(
            name("AAA"),
            name("BBB"),
            WeatherRequestType::Metar,
            "EDDW",
        )
        .unwrap();
        let msg = Message::WeatherData(msg);
        assert_eq!(msg.decompose(), "&DAAA:BBB:0:EDDW\r\n");
        assert!(!msg.is_broadcast());
        assert_eq!(msg.destination().unwrap().as_str(), "BBB");
    }

    #[test]
    fn delete_decompose_with_and_without_unknown() {
        let with = Message::DeletePilot(DeleteMessage::new(name("TEST123"), Some(45_789)));
        assert_eq!(with.decompose(), "#DPTEST123:45789\r\n");

        let without = Message::DeleteAtc(DeleteMessage::new(name("EDWW_W_CTR"), None));
        assert_eq!(without.decompose(), "#DAEDWW_W_CTR\r\n");
    }

    #[test]
    fn display_is_wire_line_without_terminator() {
        let msg = Message::DeletePilot(DeleteMessage::new(name("DLH123"), None));
        assert_eq!(msg.to_string(), "#DPDLH123");
    }
}

//! The wire parser: one framed protocol line in, one typed [`Message`] out.
//!
//! The grammar is a fixed leading-token dispatch followed by a fixed
//! colon-separated token sequence per kind, so a direct tokenizer is
//! all that is needed. Every failure mode is a structured
//! [`ParseError`]; nothing escapes this module as a panic and no input
//! is silently dropped.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::message::{
    DeleteMessage, Message, PilotPositionMessage, PlanePositionMessage, WeatherDataMessage,
    WeatherRequestType,
};
use crate::name::FsdName;
use crate::position::GeoPoint;
use crate::rating::PilotRating;
use crate::squawk::{Squawk, SquawkMode};

/// Which revision of the protocol the peer speaks.
///
/// The `@` and `#DP` tags are shared between revisions; this selects
/// whether they decode to the legacy pilot kinds or the extended plane
/// kinds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolRevision {
    /// Legacy servers: `@` is a pilot position, `#DP` deletes a pilot.
    #[default]
    Classic,
    /// Later servers: `@` is a plane position, `#DP` deletes a plane.
    Extended,
}

/// Parse one framed protocol line (terminator optional) into a message.
///
/// # Errors
///
/// Returns a [`ParseError`] for empty input, unknown type tags, missing
/// or malformed tokens, and values that violate model invariants.
pub fn parse_line(line: &str, revision: ProtocolRevision) -> Result<Message, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    if let Some(rest) = line.strip_prefix(DeleteMessage::PLANE_TAG) {
        let delete = parse_delete(rest, DeleteMessage::PLANE_TAG)?;
        return Ok(match revision {
            ProtocolRevision::Classic => Message::DeletePilot(delete),
            ProtocolRevision::Extended => Message::DeletePlane(delete),
        });
    }
    if let Some(rest) = line.strip_prefix(DeleteMessage::ATC_TAG) {
        return Ok(Message::DeleteAtc(parse_delete(rest, DeleteMessage::ATC_TAG)?));
    }
    if let Some(rest) = line.strip_prefix(WeatherDataMessage::TAG) {
        return Ok(Message::WeatherData(parse_weather(rest)?));
    }
    if let Some(rest) = line.strip_prefix(PilotPositionMessage::TAG) {
        return parse_position(rest, revision);
    }

    Err(ParseError::UnknownType {
        line: line.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Per-kind token sequences
// ---------------------------------------------------------------------------

const POSITION_FIELDS: [&str; 10] = [
    "squawk mode",
    "source",
    "squawk",
    "rating",
    "latitude",
    "longitude",
    "altitude",
    "ground speed",
    "pitch/bank/heading",
    "altitude difference",
];

fn parse_position(rest: &str, revision: ProtocolRevision) -> Result<Message, ParseError> {
    const TAG: &str = PilotPositionMessage::TAG;
    let tokens: Vec<&str> = rest.split(':').collect();
    if tokens.len() > POSITION_FIELDS.len() {
        return Err(ParseError::TrailingTokens { tag: TAG });
    }

    let mode_token = required(&tokens, 0, TAG, &POSITION_FIELDS)?;
    let squawk_mode = SquawkMode::from_letter(mode_token)
        .ok_or_else(|| ParseError::InvalidSquawkMode(mode_token.to_string()))?;
    let source = FsdName::new(required(&tokens, 1, TAG, &POSITION_FIELDS)?)?;
    let squawk = Squawk::from_octal(required(&tokens, 2, TAG, &POSITION_FIELDS)?)?;
    let rating =
        PilotRating::try_from(numeric::<i32>(required(&tokens, 3, TAG, &POSITION_FIELDS)?, "rating")?)?;
    let lat = numeric::<f64>(required(&tokens, 4, TAG, &POSITION_FIELDS)?, "latitude")?;
    let lon = numeric::<f64>(required(&tokens, 5, TAG, &POSITION_FIELDS)?, "longitude")?;
    let altitude_ft = numeric::<i32>(required(&tokens, 6, TAG, &POSITION_FIELDS)?, "altitude")?;
    let ground_speed_kt =
        numeric::<i32>(required(&tokens, 7, TAG, &POSITION_FIELDS)?, "ground speed")?;
    let pitch_bank_heading =
        numeric::<u32>(required(&tokens, 8, TAG, &POSITION_FIELDS)?, "pitch/bank/heading")?;
    let altitude_difference_ft = numeric::<i32>(
        required(&tokens, 9, TAG, &POSITION_FIELDS)?,
        "altitude difference",
    )?;

    let position = GeoPoint::new(lat, lon);
    Ok(match revision {
        ProtocolRevision::Classic => Message::PilotPosition(PilotPositionMessage {
            squawk_mode,
            source,
            squawk,
            rating,
            position,
            true_altitude_ft: altitude_ft,
            ground_speed_kt,
            pitch_bank_heading,
            altitude_difference_ft,
        }),
        ProtocolRevision::Extended => Message::PlanePosition(PlanePositionMessage::from_wire(
            squawk_mode,
            source,
            squawk,
            rating,
            position,
            altitude_ft,
            ground_speed_kt,
            pitch_bank_heading,
            altitude_difference_ft,
        )),
    })
}

const WEATHER_FIELDS: [&str; 4] = ["source", "destination", "request type", "data"];

fn parse_weather(rest: &str) -> Result<WeatherDataMessage, ParseError> {
    const TAG: &str = WeatherDataMessage::TAG;
    // The data token is free text and may itself contain separators,
    // so split at most four ways and keep the remainder intact.
    let tokens: Vec<&str> = rest.splitn(WEATHER_FIELDS.len(), ':').collect();

    let source = FsdName::new(required(&tokens, 0, TAG, &WEATHER_FIELDS)?)?;
    let destination = FsdName::new(required(&tokens, 1, TAG, &WEATHER_FIELDS)?)?;
    let request_type = WeatherRequestType::try_from(numeric::<i32>(
        required(&tokens, 2, TAG, &WEATHER_FIELDS)?,
        "request type",
    )?)?;
    let data = required(&tokens, 3, TAG, &WEATHER_FIELDS)?;

    Ok(WeatherDataMessage::new(source, destination, request_type, data)?)
}

const DELETE_FIELDS: [&str; 2] = ["source", "unknown"];

fn parse_delete(rest: &str, tag: &'static str) -> Result<DeleteMessage, ParseError> {
    let tokens: Vec<&str> = rest.split(':').collect();
    if tokens.len() > DELETE_FIELDS.len() {
        return Err(ParseError::TrailingTokens { tag });
    }

    let source = FsdName::new(required(&tokens, 0, tag, &DELETE_FIELDS)?)?;
    // The trailing integer is optional on the wire, but if the
    // separator is present the token must be there and numeric.
    let unknown = match tokens.get(1) {
        None => None,
        Some(token) if token.is_empty() => {
            return Err(ParseError::MissingToken {
                tag,
                token: DELETE_FIELDS[1],
            });
        }
        Some(token) => Some(numeric::<i64>(token, "unknown")?),
    };

    Ok(DeleteMessage::new(source, unknown))
}

// ---------------------------------------------------------------------------
// Token helpers
// ---------------------------------------------------------------------------

fn required<'a>(
    tokens: &[&'a str],
    index: usize,
    tag: &'static str,
    fields: &'static [&'static str],
) -> Result<&'a str, ParseError> {
    match tokens.get(index) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ParseError::MissingToken {
            tag,
            token: fields[index],
        }),
    }
}

fn numeric<T: std::str::FromStr>(value: &str, token: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        token,
        value: value.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Message, ParseError> {
        parse_line(line, ProtocolRevision::Classic)
    }

    fn parse_ok(line: &str) -> Message {
        parse(line).unwrap_or_else(|e| panic!("{line:?} should parse: {e}"))
    }

    #[test]
    fn pilot_position_full_decode() {
        let Message::PilotPosition(msg) =
            parse_ok("@N:TEST123:0520:7:52.75:-8:20000:400:1073741826:100\r\n")
        else {
            panic!("expected pilot position");
        };
        assert_eq!(msg.squawk_mode, SquawkMode::Charlie);
        assert_eq!(msg.source.as_str(), "TEST123");
        assert_eq!(msg.squawk, Squawk::from_octal("0520").unwrap());
        assert_eq!(msg.rating, PilotRating::CommercialPilot);
        assert_eq!(msg.position, GeoPoint::new(52.75, -8.0));
        assert_eq!(msg.true_altitude_ft, 20_000);
        assert_eq!(msg.ground_speed_kt, 400);
        assert_eq!(msg.pitch_bank_heading, 1_073_741_826);
        assert!(msg.on_ground());
        assert_eq!(msg.altitude_difference_ft, 100);
    }

    #[test]
    fn pilot_position_modes_and_squawks() {
        let Message::PilotPosition(msg) =
            parse_ok("@S:TEST123:7700:7:0052:-0008:5564:2450:1077591040:-45")
        else {
            panic!("expected pilot position");
        };
        assert_eq!(msg.squawk_mode, SquawkMode::Standby);
        assert_eq!(msg.squawk, Squawk::EMERGENCY);
        assert_eq!(msg.position, GeoPoint::new(52.0, -8.0));
        assert!(!msg.on_ground());
        assert_eq!(msg.altitude_difference_ft, -45);

        let Message::PilotPosition(msg) =
            parse_ok("@Y:TEST123:741:7:0052:-0008:5564:2450:1077591040:-45")
        else {
            panic!("expected pilot position");
        };
        assert_eq!(msg.squawk_mode, SquawkMode::Ident);
        assert_eq!(msg.squawk.value(), 0x1E1);
    }

    #[test]
    fn pilot_position_rejects_missing_tokens() {
        // Drop each token in turn.
        let lines = [
            "@:A:7000:2:0:0:0:0:0:0",
            "@N::7000:2:0:0:0:0:0:0",
            "@N:A::2:0:0:0:0:0:0",
            "@N:A:7000::0:0:0:0:0:0",
            "@N:A:7000:2::0:0:0:0:0",
            "@N:A:7000:2:0::0:0:0:0",
            "@N:A:7000:2:0:0::0:0:0",
            "@N:A:7000:2:0:0:0::0:0",
            "@N:A:7000:2:0:0:0:0::0",
            "@N:A:7000:2:0:0:0:0:0:",
            "@N:A:7000:2:0:0:0:0:0",
        ];
        for line in lines {
            assert!(parse(line).is_err(), "should reject {line:?}");
        }
    }

    #[test]
    fn pilot_position_rejects_malformed_tokens() {
        let lines = [
            "@B:A:7000:2:0:0:0:0:0:0",     // unknown mode letter
            "@5:A:7000:2:0:0:0:0:0:0",     // numeric mode
            "@N:4D:7000:2:0:0:0:0:0:0",    // invalid source name
            "@N:A:7800:2:0:0:0:0:0:0",     // non-octal squawk
            "@N:A:-0000:2:0:0:0:0:0:0",    // negative squawk
            "@N:A:77775:2:0:0:0:0:0:0",    // squawk out of range
            "@N:A:7000:12:0:0:0:0:0:0",    // rating out of range
            "@N:A:7000:x:0:0:0:0:0:0",     // non-numeric rating
            "@N:A:7000:2:north:0:0:0:0:0", // non-numeric latitude
            "@N:A:7000:2:0:0:1e2x:0:0:0",  // non-numeric altitude
            "@N:A:7000:2:0:0:0:0:-1:0",    // negative packed word
            "@N:A:7000:2:0:0:0:0:0:0:9",   // trailing token
        ];
        for line in lines {
            assert!(parse(line).is_err(), "should reject {line:?}");
        }
    }

    #[test]
    fn extended_revision_yields_plane_position() {
        let msg = parse_line(
            "@N:TEST123:0520:7:52.75:-8:20000:400:1073741826:100",
            ProtocolRevision::Extended,
        )
        .unwrap();
        let Message::PlanePosition(msg) = msg else {
            panic!("expected plane position");
        };
        assert_eq!(msg.position.elevation_ft, 20_000);
        assert_eq!(msg.position.pressure_altitude_ft, 20_100);
        assert!(msg.position.on_ground);
        assert_eq!(msg.position.true_heading_deg, 0.0);
    }

    #[test]
    fn weather_data_decode() {
        let Message::WeatherData(msg) = parse_ok("&DAAA:BBB:0:DATA\r\n") else {
            panic!("expected weather data");
        };
        assert_eq!(msg.source.as_str(), "AAA");
        assert_eq!(msg.destination.as_str(), "BBB");
        assert_eq!(msg.request_type, WeatherRequestType::Metar);
        assert_eq!(msg.data, "DATA");

        let Message::WeatherData(msg) = parse_ok("&DA:B:1:DATA AND MORE DATA /-") else {
            panic!("expected weather data");
        };
        assert_eq!(msg.request_type, WeatherRequestType::Taf);
        assert_eq!(msg.data, "DATA AND MORE DATA /-");

        // Payload keeps embedded separators.
        let Message::WeatherData(msg) = parse_ok("&DA:B:2:METAR EDDW 191020Z:RMK") else {
            panic!("expected weather data");
        };
        assert_eq!(msg.request_type, WeatherRequestType::ShortTaf);
        assert_eq!(msg.data, "METAR EDDW 191020Z:RMK");
    }

    #[test]
    fn weather_data_rejects_malformed() {
        let lines = [
            "&D:5T:0:D",   // missing source
            "&DA::0:D",    // missing destination
            "&DA:B::D",    // missing request type
            "&DA:B:0:",    // missing data
            "&DA:B:4:D",   // request type out of range
            "&DA:B:0.1:D", // non-integer request type
            "&D5A:B:0:D",  // invalid source name
            "&DA:5T:0:D",  // invalid destination name
        ];
        for line in lines {
            assert!(parse(line).is_err(), "should reject {line:?}");
        }
    }

    #[test]
    fn delete_decode() {
        let Message::DeletePilot(msg) = parse_ok("#DPTEST123:45789\r\n") else {
            panic!("expected delete pilot");
        };
        assert_eq!(msg.source.as_str(), "TEST123");
        assert_eq!(msg.unknown, Some(45_789));

        // The trailing integer is optional.
        let Message::DeletePilot(msg) = parse_ok("#DPTEST123") else {
            panic!("expected delete pilot");
        };
        assert_eq!(msg.unknown, None);

        let Message::DeleteAtc(msg) = parse_ok("#DATEST123:45789") else {
            panic!("expected delete ATC");
        };
        assert_eq!(msg.source.as_str(), "TEST123");

        let msg = parse_line("#DPTEST123", ProtocolRevision::Extended).unwrap();
        assert!(matches!(msg, Message::DeletePlane(_)));
    }

    #[test]
    fn delete_rejects_malformed() {
        let lines = [
            "#DP:0",     // missing source
            "#DP4D:0",   // invalid source name
            "#DPTEST:",  // separator without the trailing token
            "#DPTEST:x", // non-numeric trailing token
            "#DA:0",
            "#DATEST:",
            "#DPTEST:1:2", // too many tokens
        ];
        for line in lines {
            assert!(parse(line).is_err(), "should reject {line:?}");
        }
    }

    #[test]
    fn garbage_and_empty_are_errors_not_silence() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("\r\n"), Err(ParseError::Empty));
        assert!(matches!(parse("$HOABC:DEF"), Err(ParseError::UnknownType { .. })));
        assert!(matches!(parse("hello world"), Err(ParseError::UnknownType { .. })));
    }

    // ── Round-trips ─────────────────────────────────────────────────

    #[test]
    fn round_trip_every_kind() {
        let lines = [
            "@N:TEST123:0520:7:52.75:-8:20000:400:1073741826:100",
            "@S:DLH123:0000:2:0:0:0:0:0:0",
            "@Y:BER155:7777:11:-12.5:170.25:-100:0:3221225471:-2000",
            "&DAAA:BBB:0:EDDW",
            "&DA:B:2:DATA AND MORE DATA /-",
            "#DPTEST123:45789",
            "#DPTEST123",
            "#DATEST123:45789",
        ];
        for revision in [ProtocolRevision::Classic, ProtocolRevision::Extended] {
            for line in lines {
                let msg = parse_line(line, revision)
                    .unwrap_or_else(|e| panic!("{line:?} should parse: {e}"));
                let reparsed = parse_line(&msg.decompose(), revision).unwrap();
                assert_eq!(msg, reparsed, "round trip failed for {line:?}");
            }
        }
    }
}

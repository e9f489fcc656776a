//! Pilot ratings.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Pilot rating as carried in position reports.
///
/// The wire value is an integer in `2..=11`. The network also defines
/// `Unknown` (-1) and `Observer` (1), but those never appear in
/// position traffic and are rejected here on purpose.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
    strum::Display, strum::EnumIter,
)]
#[repr(i32)]
pub enum PilotRating {
    /// Basic flight student.
    Fs1 = 2,
    /// Advanced flight student.
    Fs2 = 3,
    /// Senior flight student.
    Fs3 = 4,
    /// Private pilot.
    PrivatePilot = 5,
    /// Senior private pilot.
    SeniorPrivatePilot = 6,
    /// Commercial pilot.
    CommercialPilot = 7,
    /// Airline transport pilot.
    AirlineTransportPilot = 8,
    /// Senior flight instructor.
    SeniorFlightInstructor = 9,
    /// Chief flight instructor.
    ChiefFlightInstructor = 10,
    /// Show administrator.
    ShowAdministrator = 11,
}

impl PilotRating {
    /// The integer wire value.
    pub fn wire_value(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for PilotRating {
    type Error = ModelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            2 => Self::Fs1,
            3 => Self::Fs2,
            4 => Self::Fs3,
            5 => Self::PrivatePilot,
            6 => Self::SeniorPrivatePilot,
            7 => Self::CommercialPilot,
            8 => Self::AirlineTransportPilot,
            9 => Self::SeniorFlightInstructor,
            10 => Self::ChiefFlightInstructor,
            11 => Self::ShowAdministrator,
            other => return Err(ModelError::InvalidRating(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn wire_values_round_trip() {
        for rating in PilotRating::iter() {
            assert_eq!(PilotRating::try_from(rating.wire_value()).unwrap(), rating);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        for value in [-1, 0, 1, 12, 100] {
            assert_eq!(
                PilotRating::try_from(value),
                Err(ModelError::InvalidRating(value))
            );
        }
    }
}

//! Transponder codes and squawk modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// Squawk
// ---------------------------------------------------------------------------

/// A 12-bit transponder code.
///
/// Stored as the binary value (`0x000..=0xFFF`); the wire carries the
/// four-digit octal rendering pilots actually dial (7700 → `0xFC0`).
///
/// # Examples
///
/// ```
/// use fsdlink_models::Squawk;
///
/// let sq = Squawk::from_octal("7700").unwrap();
/// assert_eq!(sq, Squawk::EMERGENCY);
/// assert_eq!(sq.to_string(), "7700");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Squawk(u16);

impl Squawk {
    /// Emergency (octal 7700).
    pub const EMERGENCY: Squawk = Squawk(0xFC0);
    /// Radio failure (octal 7600).
    pub const RADIO_FAILURE: Squawk = Squawk(0xF80);
    /// Unlawful interference (octal 7500).
    pub const HIJACK: Squawk = Squawk(0xF40);

    /// Construct from the binary value; rejects anything above `0xFFF`.
    pub fn new(value: u16) -> Result<Self, ModelError> {
        if value > 0xFFF {
            return Err(ModelError::InvalidSquawk {
                value: format!("{value:#x}"),
                reason: "out of range 0x000..=0xFFF".into(),
            });
        }
        Ok(Self(value))
    }

    /// Parse the octal wire form (1 to 4 octal digits).
    pub fn from_octal(input: &str) -> Result<Self, ModelError> {
        if input.is_empty() || input.len() > 4 {
            return Err(ModelError::InvalidSquawk {
                value: input.to_string(),
                reason: "expected 1 to 4 octal digits".into(),
            });
        }
        let value = u16::from_str_radix(input, 8).map_err(|_| ModelError::InvalidSquawk {
            value: input.to_string(),
            reason: "digits must be octal".into(),
        })?;
        Self::new(value)
    }

    /// The binary value.
    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Squawk {
    /// Zero-padded four-digit octal, as transmitted on the wire.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl FromStr for Squawk {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_octal(s)
    }
}

// ---------------------------------------------------------------------------
// SquawkMode
// ---------------------------------------------------------------------------

/// Transponder operating mode carried in position reports.
///
/// A closed enumeration; the wire letters are fixed (`N` is mode
/// Charlie, not `C`).
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter,
)]
pub enum SquawkMode {
    /// Transponder on standby (`S`).
    Standby,
    /// Mode Charlie, altitude reporting (`N`).
    Charlie,
    /// Ident flash (`Y`).
    Ident,
}

impl SquawkMode {
    /// Decode the wire letter; `None` for anything outside the closed set.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "N" | "n" => Some(Self::Charlie),
            "S" | "s" => Some(Self::Standby),
            "Y" | "y" => Some(Self::Ident),
            _ => None,
        }
    }

    /// The wire letter for this mode.
    pub fn letter(self) -> &'static str {
        match self {
            Self::Standby => "S",
            Self::Charlie => "N",
            Self::Ident => "Y",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

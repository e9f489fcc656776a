//! Protocol names.
//!
//! Every participant on an FSD network is identified by its protocol
//! name (callsign-like, e.g. `EDWW_W_CTR`, `DLH123`). Names appear as
//! the source and optional destination of every message, so validation
//! happens once here and the rest of the code can trust the value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// FsdName
// ---------------------------------------------------------------------------

/// A validated FSD protocol name.
///
/// Valid iff non-empty, every character is an ASCII letter, digit or
/// underscore, and the first character is a letter.
///
/// # Examples
///
/// ```
/// use fsdlink_models::FsdName;
///
/// let name: FsdName = "EDWW_W_CTR".parse().unwrap();
/// assert_eq!(name.as_str(), "EDWW_W_CTR");
///
/// assert!("4D".parse::<FsdName>().is_err());
/// assert!("".parse::<FsdName>().is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct FsdName(String);

impl FsdName {
    /// Validate and wrap a protocol name.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::InvalidName {
                value: name.to_string(),
                reason: "must not be empty".into(),
            });
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ModelError::InvalidName {
                value: name.to_string(),
                reason: "only ASCII letters, digits and '_' are allowed".into(),
            });
        }
        // First char is ASCII by the check above.
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(ModelError::InvalidName {
                value: name.to_string(),
                reason: "first character must be a letter".into(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercased form, used for case-insensitive registry lookup.
    pub fn to_key(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl fmt::Display for FsdName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FsdName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FsdName {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<FsdName> for String {
    fn from(name: FsdName) -> Self {
        name.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_names() {
        for name in ["DLH123", "EDWW_W_CTR", "a", "Test_1"] {
            assert!(FsdName::new(name).is_ok(), "should accept {name}");
        }
    }

    #[test]
    fn rejects_invalid_names() {
        for name in ["", "4D", "_X", "A B", "A-B", "A:B", "Ä"] {
            assert!(FsdName::new(name).is_err(), "should reject {name:?}");
        }
    }

    #[test]
    fn key_is_case_insensitive() {
        let a = FsdName::new("Dlh123").unwrap();
        let b = FsdName::new("DLH123").unwrap();
        assert_eq!(a.to_key(), b.to_key());
        // Display preserves the original casing.
        assert_eq!(a.to_string(), "Dlh123");
    }

    #[test]
    fn serde_rejects_invalid() {
        assert!(serde_json::from_str::<FsdName>("\"DLH123\"").is_ok());
        assert!(serde_json::from_str::<FsdName>("\"4D\"").is_err());
    }
}

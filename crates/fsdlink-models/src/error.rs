//! Error types for the `fsdlink-models` crate.
//!
//! [`ModelError`] covers invariant violations at value construction;
//! [`ParseError`] covers failures while decoding one wire line. Both are
//! terminal for the offending value/line only — callers are expected to
//! log and carry on.

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A protocol name was empty or contained invalid characters.
    #[error("invalid FSD name \"{value}\": {reason}")]
    InvalidName {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A squawk code was outside `0x000..=0xFFF` or not octal.
    #[error("invalid squawk \"{value}\": {reason}")]
    InvalidSquawk {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A pilot rating was outside the accepted wire range.
    #[error("invalid pilot rating {0}")]
    InvalidRating(i32),

    /// A weather request type code was not 0, 1 or 2.
    #[error("invalid weather request type {0}")]
    InvalidRequestType(i32),

    /// A required field was missing or empty during message construction.
    #[error("missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },
}

/// Errors produced while parsing one framed protocol line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input line was empty.
    #[error("empty message line")]
    Empty,

    /// The leading type tag did not match any known message kind.
    #[error("unknown message type: \"{line}\"")]
    UnknownType {
        /// The offending line (truncated by the caller if needed).
        line: String,
    },

    /// A required token was absent or empty.
    #[error("missing token \"{token}\" in {tag} message")]
    MissingToken {
        /// Type tag of the message being parsed.
        tag: &'static str,
        /// Name of the missing token.
        token: &'static str,
    },

    /// A token that must be numeric failed to parse.
    #[error("invalid numeric token \"{token}\" = \"{value}\"")]
    InvalidNumber {
        /// Name of the token.
        token: &'static str,
        /// The raw token text.
        value: String,
    },

    /// A squawk-mode letter outside the closed `N`/`S`/`Y` set.
    #[error("invalid squawk mode token: \"{0}\"")]
    InvalidSquawkMode(String),

    /// The line carried more tokens than the kind's grammar allows.
    #[error("unexpected trailing tokens in {tag} message")]
    TrailingTokens {
        /// Type tag of the message being parsed.
        tag: &'static str,
    },

    /// A decoded value violated a model invariant.
    #[error(transparent)]
    Model(#[from] ModelError),
}

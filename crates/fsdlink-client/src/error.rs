//! Client error types.
//!
//! [`ClientError`] is the single error type returned by every fallible
//! operation in this crate. Per-message failures (parse errors,
//! protocol inconsistencies) are not errors at this level — they are
//! logged and skipped inside the loops that encounter them.

use fsdlink_models::ModelError;

/// Error type for connection and session operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Socket-level I/O failure (connect, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection has been closed or was never established.
    #[error("not connected")]
    NotConnected,

    /// A locally constructed message violated a model invariant.
    #[error(transparent)]
    Model(#[from] ModelError),
}

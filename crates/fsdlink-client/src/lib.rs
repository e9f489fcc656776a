//! # FSDLink Client
//!
//! Async client for FSD air-traffic simulation networks: owns the TCP
//! connection, frames and parses the wire protocol (via
//! [`fsdlink_models`]), and maintains a live registry of remote
//! entities with activity/timeout semantics.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use fsdlink_client::{Session, SessionConfig, SessionEvent};
//! use fsdlink_models::FsdName;
//!
//! # async fn run() -> Result<(), fsdlink_client::ClientError> {
//! let config = SessionConfig::new("fsd.example.net", 6809, FsdName::new("EDWW_W_CTR")?);
//! let (session, mut events) = Session::connect(config).await?;
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         SessionEvent::Closed => break,
//!         other => println!("{other:?}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod activity;
pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub(crate) mod registry;
pub mod session;

pub use activity::{ActivityClock, Refresh};
pub use config::{ActivityConfig, SessionConfig};
pub use connection::Connection;
pub use entity::{ControllerState, Entity, EntityKind, EntitySnapshot, PilotState, PlaneState};
pub use error::ClientError;
pub use event::{ConnectionEvent, DisconnectReason, SessionEvent};
pub use session::Session;

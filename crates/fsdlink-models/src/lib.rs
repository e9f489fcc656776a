#![deny(missing_docs)]

//! # FSDLink Models
//!
//! Wire message model and parser for the FSD air-traffic simulation
//! network protocol: plaintext, colon-separated, CRLF-framed lines.
//!
//! ## Message kinds
//!
//! ```text
//! Message
//! ├── PilotPosition / PlanePosition   "@"   (revision-dependent)
//! ├── WeatherData                     "&D"
//! ├── DeletePilot / DeletePlane       "#DP" (revision-dependent)
//! └── DeleteAtc                       "#DA"
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`name`] | Validated protocol names (`FsdName`) |
//! | [`squawk`] | Transponder codes and squawk modes |
//! | [`rating`] | Pilot ratings |
//! | [`position`] | WGS84 points, packed-word decoding, plane telemetry |
//! | [`message`] | Typed messages and the `decompose` serializer |
//! | [`parser`] | The colon-grammar tokenizer (`parse_line`) |

pub mod error;
pub mod message;
pub mod name;
pub mod parser;
pub mod position;
pub mod rating;
pub mod squawk;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `fsdlink_models::FsdName` directly.
pub use error::*;
pub use message::*;
pub use name::*;
pub use parser::*;
pub use position::*;
pub use rating::*;
pub use squawk::*;

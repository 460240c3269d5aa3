//! # Domain Module
//!
//! Business inputs and the rules that apply before anything reaches storage.
//!
//! - **models**: validated inputs built from request DTOs (`NewStudent`,
//!   `NewClass`, `NewCheckIn`)
//! - **calendar**: month windows, date/time parsing, Sunday-based weekday index
//! - **clock**: the injectable wall clock behind current/upcoming class lookups
//!   and check-in defaults
//! - **errors**: `ValidationError`, raised for missing or malformed input

pub mod calendar;
pub mod clock;
pub mod errors;
pub mod models;

pub use clock::{Clock, FixedClock, ScheduleMoment, SystemClock};
pub use errors::ValidationError;
pub use models::*;

//! # Storage Module
//!
//! Persistence for the roster, the weekly schedule and attendance.
//!
//! One `DbConnection` is opened at startup and cloned into each repository.
//! Repositories are the only place that talks SQL, and they report constraint
//! conflicts (duplicate NFC token, repeat enrollment, second check-in on the
//! same day) as `RepositoryError` variants rather than raw database errors.
//!
//! ## Tables
//!
//! - `students`, `classes`
//! - `class_students`: enrollment pairs, unique per class and student
//! - `attendance`: one row per student, class and date
//!
//! Every foreign key cascades, so deleting a student or class removes its
//! enrollments and attendance.

pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::DbConnection;
pub use error::{RepositoryError, RepositoryResult};
pub use repositories::*;

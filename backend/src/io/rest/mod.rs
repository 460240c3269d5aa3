//! # REST API Interface Layer
//!
//! HTTP endpoints for the roster, the class schedule and attendance, all
//! mounted under `/api`.
//!
//! Handlers parse and validate input, call one repository operation, and
//! translate the outcome through [`ApiError`]:
//!
//! - validation failure or constraint conflict → 400
//! - unknown id or token → 404
//! - anything else from the store → 500
//!
//! Every error body is `{"error": "..."}`.

pub mod attendance_apis;
pub mod class_apis;
pub mod error;
pub mod extract;
pub mod health_apis;
pub mod student_apis;

use axum::Router;

pub use error::{ApiError, ApiResult};

use crate::AppState;

/// Every `/api` route, before state and middleware are attached
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health_apis::router())
        .nest("/students", student_apis::router())
        .nest("/classes", class_apis::router())
        .nest("/attendance", attendance_apis::router())
}

//! # Dojo Attendance Backend
//!
//! REST service for a martial-arts school: the student roster, the weekly
//! class schedule, enrollment, check-ins and the monthly billing report.
//!
//! ## Architecture
//!
//! ```text
//! io::rest      (axum handlers, error mapping)
//!     ↓
//! domain        (validated inputs, calendar math, wall clock)
//!     ↓
//! storage       (SQLite pool, schema, repositories)
//! ```
//!
//! Business rules that depend on stored data (one check-in per day, unique
//! NFC tokens, day-of-week range) live in the repositories. Handlers only
//! validate the shape of their input.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::any::Any;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    Router,
};
use shared::ErrorResponse;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as CorsAny, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::domain::{Clock, SystemClock};
use crate::storage::{AttendanceRepository, ClassRepository, DbConnection, StudentRepository};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DbConnection,
    pub students: StudentRepository,
    pub classes: ClassRepository,
    pub attendance: AttendanceRepository,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(db: DbConnection, clock: Arc<dyn Clock>) -> Self {
        Self {
            students: StudentRepository::new(db.clone()),
            classes: ClassRepository::new(db.clone()),
            attendance: AttendanceRepository::new(db.clone()),
            db,
            clock,
        }
    }
}

/// Open the database and build the application state
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    info!("Setting up application state");
    Ok(AppState::new(db, Arc::new(SystemClock)))
}

/// Create the Axum router with all routes and middleware configured
pub fn create_router(app_state: AppState, config: &Config) -> Result<Router> {
    let mut app = Router::new().nest("/api", io::api_router());

    if let Some(dir) = &config.static_dir {
        info!("Serving frontend from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    with_middleware(app.with_state(app_state), config)
}

fn with_middleware(app: Router, config: &Config) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(CorsAny);
    let cors = match &config.cors_origin {
        Some(origin) => cors.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("CORS_ORIGIN is not a valid origin: {}", origin))?,
        ),
        None => cors.allow_origin(CorsAny),
    };

    Ok(app
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

/// Panics are logged and surfaced as a generic 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        *message
    } else {
        "unknown panic"
    };
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Something went wrong!".to_string(),
        }),
    )
        .into_response()
}

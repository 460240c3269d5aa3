//! # REST API for Attendance
//!
//! Check-in, history queries and the monthly billing report.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use shared::{CheckInRequest, CreatedResponse, DateRangeQuery, MessageResponse, MonthQuery};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::calendar::{month_window, parse_date};
use crate::domain::clock::check_in_timestamp;
use crate::domain::errors::MissingFields;
use crate::domain::NewCheckIn;
use crate::AppState;

const ATTENDANCE_NOT_FOUND: &str = "Attendance record not found";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance))
        .route("/checkin", post(check_in))
        .route("/daterange", get(list_by_date_range))
        .route("/report/monthly", get(monthly_report))
        .route("/student/:student_id", get(list_by_student))
        .route("/student/:student_id/monthly", get(student_monthly_attendance))
        .route("/class/:class_id", get(list_by_class))
        .route("/:id", get(get_attendance).delete(delete_attendance))
}

/// All attendance, most recent first
pub async fn list_attendance(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("GET /api/attendance");

    Ok(Json(state.attendance.list_attendance().await?))
}

/// Get an attendance record by ID
pub async fn get_attendance(
    State(state): State<AppState>,
    ApiPath(attendance_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/attendance/{}", attendance_id);

    match state.attendance.get_attendance(attendance_id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound(ATTENDANCE_NOT_FOUND)),
    }
}

/// Check a student in to a class; the date defaults to today
pub async fn check_in(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckInRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("POST /api/attendance/checkin - request: {:?}", request);

    let check_in = NewCheckIn::from_request(request)?;
    let now = state.clock.now();
    let date = check_in.date.unwrap_or_else(|| now.date());

    let id = state
        .attendance
        .check_in(
            check_in.student_id,
            check_in.class_id,
            date,
            &check_in_timestamp(now),
        )
        .await?;

    info!(
        "Student {} checked in to class {} on {}",
        check_in.student_id, check_in.class_id, date
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Check-in successful".to_string(),
            id,
        }),
    ))
}

/// Attendance between two dates, both inclusive
pub async fn list_by_date_range(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/attendance/daterange - query: {:?}", query);

    let (start, end) = date_range(&query)?;
    Ok(Json(state.attendance.list_by_date_range(start, end).await?))
}

pub async fn list_by_student(
    State(state): State<AppState>,
    ApiPath(student_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/attendance/student/{}", student_id);

    Ok(Json(state.attendance.list_by_student(student_id).await?))
}

pub async fn list_by_class(
    State(state): State<AppState>,
    ApiPath(class_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/attendance/class/{}", class_id);

    Ok(Json(state.attendance.list_by_class(class_id).await?))
}

/// Per-student totals for a calendar month, absent students included
pub async fn monthly_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/attendance/report/monthly - query: {:?}", query);

    let (start, end) = month_range(&query)?;
    Ok(Json(state.attendance.monthly_report(start, end).await?))
}

/// One student's check-ins for a calendar month, oldest first
pub async fn student_monthly_attendance(
    State(state): State<AppState>,
    ApiPath(student_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> ApiResult<impl IntoResponse> {
    info!(
        "GET /api/attendance/student/{}/monthly - query: {:?}",
        student_id, query
    );

    let (start, end) = month_range(&query)?;
    let records = state
        .attendance
        .student_attendance_between(student_id, start, end)
        .await?;
    Ok(Json(records))
}

/// Remove a check-in made by mistake
pub async fn delete_attendance(
    State(state): State<AppState>,
    ApiPath(attendance_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    info!("DELETE /api/attendance/{}", attendance_id);

    if !state.attendance.delete_attendance(attendance_id).await? {
        return Err(ApiError::NotFound(ATTENDANCE_NOT_FOUND));
    }

    Ok(Json(MessageResponse {
        message: "Attendance record deleted successfully".to_string(),
    }))
}

fn date_range(query: &DateRangeQuery) -> ApiResult<(NaiveDate, NaiveDate)> {
    MissingFields::new()
        .check_text("start_date", &query.start_date)
        .check_text("end_date", &query.end_date)
        .finish()?;

    let start = parse_date("start_date", query.start_date.as_deref().unwrap_or_default())?;
    let end = parse_date("end_date", query.end_date.as_deref().unwrap_or_default())?;
    Ok((start, end))
}

fn month_range(query: &MonthQuery) -> ApiResult<(NaiveDate, NaiveDate)> {
    MissingFields::new()
        .check("year", &query.year)
        .check("month", &query.month)
        .finish()?;

    Ok(month_window(
        query.year.unwrap_or_default(),
        query.month.unwrap_or_default(),
    )?)
}

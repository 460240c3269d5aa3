//! # REST API for the Student Roster
//!
//! CRUD, name search and NFC token lookup for students.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{CreatedResponse, MessageResponse, StudentRequest, StudentSearchQuery};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::{NewStudent, ValidationError};
use crate::AppState;

const STUDENT_NOT_FOUND: &str = "Student not found";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/search", get(search_students))
        .route("/nfc/:token", get(get_student_by_nfc_token))
        .route(
            "/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

/// List all students
pub async fn list_students(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("GET /api/students");

    let students = state.students.list_students().await?;
    Ok(Json(students))
}

/// Get a student by ID
pub async fn get_student(
    State(state): State<AppState>,
    ApiPath(student_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/students/{}", student_id);

    match state.students.get_student(student_id).await? {
        Some(student) => Ok(Json(student)),
        None => Err(ApiError::NotFound(STUDENT_NOT_FOUND)),
    }
}

/// Search students by partial name
pub async fn search_students(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StudentSearchQuery>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/students/search - query: {:?}", query);

    let name = match query.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(ValidationError::MissingFields(vec!["name"]).into()),
    };

    let students = state.students.search_students(&name).await?;
    Ok(Json(students))
}

/// Look a student up by the token on their card
pub async fn get_student_by_nfc_token(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/students/nfc/{}", token);

    match state.students.get_student_by_nfc_token(&token).await? {
        Some(student) => Ok(Json(student)),
        None => Err(ApiError::NotFound(STUDENT_NOT_FOUND)),
    }
}

/// Create a new student
pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<StudentRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("POST /api/students - request: {:?}", request);

    let student = NewStudent::from_request(request)?;
    let id = state.students.create_student(&student).await?;

    info!("Created student {} ({})", id, student.name);
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Student created successfully".to_string(),
            id,
        }),
    ))
}

/// Replace a student's name, age and token
pub async fn update_student(
    State(state): State<AppState>,
    ApiPath(student_id): ApiPath<i64>,
    ApiJson(request): ApiJson<StudentRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("PUT /api/students/{} - request: {:?}", student_id, request);

    let student = NewStudent::from_request(request)?;
    if !state.students.update_student(student_id, &student).await? {
        return Err(ApiError::NotFound(STUDENT_NOT_FOUND));
    }

    Ok(Json(MessageResponse {
        message: "Student updated successfully".to_string(),
    }))
}

/// Delete a student along with their enrollments and attendance
pub async fn delete_student(
    State(state): State<AppState>,
    ApiPath(student_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    info!("DELETE /api/students/{}", student_id);

    if !state.students.delete_student(student_id).await? {
        return Err(ApiError::NotFound(STUDENT_NOT_FOUND));
    }

    Ok(Json(MessageResponse {
        message: "Student deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_then_get_by_id_and_token() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/students",
            Some(json!({"name": "Kenji Sato", "age": 12, "nfc_token": "04:A2:19"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Student created successfully");
        let id = body["id"].as_i64().expect("id missing");

        let (status, student) = send(&app, Method::GET, &format!("/api/students/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(student["name"], "Kenji Sato");
        assert_eq!(student["age"], 12);
        assert_eq!(student["nfc_token"], "04:A2:19");

        let (status, by_token) = send(&app, Method::GET, "/api/students/nfc/04:A2:19", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_token, student);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::POST, "/api/students", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name and age are required");

        let (status, body) =
            send(&app, Method::POST, "/api/students", Some(json!({"name": "Ana"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "age is required");
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_error() {
        let app = test_app().await;

        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/students")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_update_replaces_every_field() {
        let app = test_app().await;
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/students",
            Some(json!({"name": "Old", "age": 7, "nfc_token": "old"})),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/students/{}", id),
            Some(json!({"name": "New", "age": 8})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Student updated successfully");

        let (_, student) = send(&app, Method::GET, &format!("/api/students/{}", id), None).await;
        assert_eq!(student["name"], "New");
        assert_eq!(student["age"], 8);
        assert!(student["nfc_token"].is_null());
    }

    #[tokio::test]
    async fn test_duplicate_token_is_conflict() {
        let app = test_app().await;
        let body = json!({"name": "A", "age": 9, "nfc_token": "tag"});
        send(&app, Method::POST, "/api/students", Some(body.clone())).await;

        let (status, error) = send(&app, Method::POST, "/api/students", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "NFC token is already assigned to another student");
    }

    #[tokio::test]
    async fn test_missing_student_is_404() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/students/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Student not found");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/students/77",
            Some(json!({"name": "X", "age": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/api/students/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/api/students/nfc/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_requires_name() {
        let app = test_app().await;
        send(&app, Method::POST, "/api/students", Some(json!({"name": "Sarah", "age": 9}))).await;
        send(&app, Method::POST, "/api/students", Some(json!({"name": "Tom", "age": 9}))).await;

        let (status, body) = send(&app, Method::GET, "/api/students/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");

        let (status, body) = send(&app, Method::GET, "/api/students/search?name=sar", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Sarah"]);
    }
}

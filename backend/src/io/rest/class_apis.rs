//! # REST API for Classes and Enrollment
//!
//! Weekly schedule CRUD, the "what is on right now" lookups used by the
//! check-in screen, and the enrollment sub-resource under
//! `/api/classes/:id/students`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{ClassRequest, CreatedResponse, EnrollmentRequest, MessageResponse};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::extract::{ApiJson, ApiPath};
use crate::domain::errors::MissingFields;
use crate::domain::{NewClass, ScheduleMoment};
use crate::AppState;

const CLASS_NOT_FOUND: &str = "Class not found";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes).post(create_class))
        .route("/active", get(list_active_classes))
        .route("/current", get(get_current_classes))
        .route("/upcoming", get(get_upcoming_class))
        .route(
            "/:id",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route(
            "/:id/students",
            get(list_students_in_class)
                .post(enroll_student)
                .delete(unenroll_student),
        )
}

/// List the whole weekly schedule
pub async fn list_classes(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("GET /api/classes");

    Ok(Json(state.classes.list_classes().await?))
}

/// List classes that are currently offered
pub async fn list_active_classes(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("GET /api/classes/active");

    Ok(Json(state.classes.list_active_classes().await?))
}

/// Active classes in session at this moment
pub async fn get_current_classes(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let moment = ScheduleMoment::at(state.clock.now());
    info!(
        "GET /api/classes/current - day {} at {}",
        moment.day_of_week, moment.current_time
    );

    let classes = state
        .classes
        .get_current_classes(moment.day_of_week, &moment.current_time)
        .await?;
    Ok(Json(classes))
}

/// Next class starting later today, or null
pub async fn get_upcoming_class(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let moment = ScheduleMoment::at(state.clock.now());
    info!(
        "GET /api/classes/upcoming - day {} at {}",
        moment.day_of_week, moment.current_time
    );

    let class = state
        .classes
        .get_upcoming_class(moment.day_of_week, &moment.current_time)
        .await?;
    Ok(Json(class))
}

/// Get a class by ID
pub async fn get_class(
    State(state): State<AppState>,
    ApiPath(class_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/classes/{}", class_id);

    match state.classes.get_class(class_id).await? {
        Some(class) => Ok(Json(class)),
        None => Err(ApiError::NotFound(CLASS_NOT_FOUND)),
    }
}

/// Add a class to the schedule
pub async fn create_class(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ClassRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("POST /api/classes - request: {:?}", request);

    let class = NewClass::for_create(request)?;
    let id = state.classes.create_class(&class).await?;

    info!("Created class {} ({})", id, class.name);
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Class created successfully".to_string(),
            id,
        }),
    ))
}

/// Replace every field of a class
pub async fn update_class(
    State(state): State<AppState>,
    ApiPath(class_id): ApiPath<i64>,
    ApiJson(request): ApiJson<ClassRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("PUT /api/classes/{} - request: {:?}", class_id, request);

    let class = NewClass::for_update(request)?;
    if !state.classes.update_class(class_id, &class).await? {
        return Err(ApiError::NotFound(CLASS_NOT_FOUND));
    }

    Ok(Json(MessageResponse {
        message: "Class updated successfully".to_string(),
    }))
}

/// Delete a class along with its enrollments and attendance
pub async fn delete_class(
    State(state): State<AppState>,
    ApiPath(class_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    info!("DELETE /api/classes/{}", class_id);

    if !state.classes.delete_class(class_id).await? {
        return Err(ApiError::NotFound(CLASS_NOT_FOUND));
    }

    Ok(Json(MessageResponse {
        message: "Class deleted successfully".to_string(),
    }))
}

/// Students enrolled in a class
pub async fn list_students_in_class(
    State(state): State<AppState>,
    ApiPath(class_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    info!("GET /api/classes/{}/students", class_id);

    Ok(Json(state.classes.list_students_in_class(class_id).await?))
}

pub async fn enroll_student(
    State(state): State<AppState>,
    ApiPath(class_id): ApiPath<i64>,
    ApiJson(request): ApiJson<EnrollmentRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("POST /api/classes/{}/students - request: {:?}", class_id, request);

    let student_id = required_student_id(&request)?;
    state.classes.enroll_student(class_id, student_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Student added to class successfully".to_string(),
        }),
    ))
}

/// Succeeds whether or not the student was enrolled
pub async fn unenroll_student(
    State(state): State<AppState>,
    ApiPath(class_id): ApiPath<i64>,
    ApiJson(request): ApiJson<EnrollmentRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("DELETE /api/classes/{}/students - request: {:?}", class_id, request);

    let student_id = required_student_id(&request)?;
    state.classes.unenroll_student(class_id, student_id).await?;

    Ok(Json(MessageResponse {
        message: "Student removed from class successfully".to_string(),
    }))
}

fn required_student_id(request: &EnrollmentRequest) -> ApiResult<i64> {
    MissingFields::new()
        .check("student_id", &request.student_id)
        .finish()?;
    Ok(request.student_id.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app, test_app_at};
    use axum::http::{Method, StatusCode};
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    async fn create_class(app: &axum::Router, body: Value) -> i64 {
        let (status, created) = send(app, Method::POST, "/api/classes", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", created);
        created["id"].as_i64().unwrap()
    }

    fn class_body(name: &str, day: i64, start: &str, end: &str) -> Value {
        json!({"name": name, "day_of_week": day, "start_time": start, "end_time": end})
    }

    #[tokio::test]
    async fn test_current_and_upcoming_follow_the_clock() {
        // 2025-06-18 is a Wednesday
        let now = NaiveDate::from_ymd_opt(2025, 6, 18)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let app = test_app_at(now).await;

        create_class(&app, class_body("Starts Now", 3, "10:00", "11:00")).await;
        create_class(&app, class_body("Starts Later", 3, "10:01", "11:00")).await;
        create_class(&app, class_body("Evening", 3, "18:00", "19:00")).await;
        create_class(&app, class_body("Thursday", 4, "09:00", "12:00")).await;

        let (status, current) = send(&app, Method::GET, "/api/classes/current", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = current
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Starts Now"]);

        let (status, upcoming) = send(&app, Method::GET, "/api/classes/upcoming", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(upcoming["name"], "Starts Later");
    }

    #[tokio::test]
    async fn test_no_upcoming_class_is_null() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 18)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        let app = test_app_at(now).await;
        create_class(&app, class_body("Morning", 3, "09:00", "10:00")).await;

        let (status, upcoming) = send(&app, Method::GET, "/api/classes/upcoming", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(upcoming.is_null());
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::POST, "/api/classes", Some(json!({"name": "X"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "day_of_week, start_time and end_time are required");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/classes",
            Some(class_body("X", 7, "10:00", "11:00")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("day_of_week"));

        let (_, classes) = send(&app, Method::GET, "/api/classes", None).await;
        assert!(classes.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_active_and_replaces_fields() {
        let app = test_app().await;
        let id = create_class(&app, class_body("Judo", 1, "17:00", "18:00")).await;
        let uri = format!("/api/classes/{}", id);

        let (status, body) =
            send(&app, Method::PUT, &uri, Some(class_body("Judo", 2, "17:00", "18:00"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "active is required");

        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({
                "name": "Judo Advanced",
                "day_of_week": 2,
                "start_time": "18:30",
                "end_time": "19:30",
                "active": false
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, class) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(class["name"], "Judo Advanced");
        assert_eq!(class["day_of_week"], 2);
        assert_eq!(class["start_time"], "18:30");
        assert_eq!(class["end_time"], "19:30");
        assert_eq!(class["active"], false);

        let (_, active) = send(&app, Method::GET, "/api/classes/active", None).await;
        assert!(active.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enroll_twice_then_unenroll() {
        let app = test_app().await;
        let class_id = create_class(&app, class_body("Karate", 1, "17:00", "18:00")).await;
        let (_, student) = send(
            &app,
            Method::POST,
            "/api/students",
            Some(json!({"name": "Ana", "age": 10})),
        )
        .await;
        let student_id = student["id"].as_i64().unwrap();
        let uri = format!("/api/classes/{}/students", class_id);
        let body = json!({ "student_id": student_id });

        let (status, first) = send(&app, Method::POST, &uri, Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["message"], "Student added to class successfully");

        let (status, second) = send(&app, Method::POST, &uri, Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(second["error"], "Student is already enrolled in this class");

        let (_, enrolled) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(enrolled.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);

        // Never-enrolled pair is still a success
        let (status, removed) = send(&app, Method::DELETE, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["message"], "Student removed from class successfully");

        let (status, missing) = send(&app, Method::POST, &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(missing["error"], "student_id is required");
    }

    #[tokio::test]
    async fn test_missing_class_is_404() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/classes/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Class not found");

        let (status, _) = send(&app, Method::DELETE, "/api/classes/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

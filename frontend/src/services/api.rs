use gloo::net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    AttendanceRecord, CheckInRequest, Class, ClassRequest, CreatedResponse, EnrollmentRequest,
    ErrorResponse, MessageResponse, MonthlyReportRow, Student, StudentRequest,
};

/// API client for communicating with the backend server
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    // Students

    pub async fn list_students(&self) -> Result<Vec<Student>, String> {
        self.fetch(Request::get(&self.url("/students"))).await
    }

    pub async fn get_student(&self, student_id: i64) -> Result<Student, String> {
        self.fetch(Request::get(&self.url(&format!("/students/{}", student_id))))
            .await
    }

    pub async fn search_students(&self, name: &str) -> Result<Vec<Student>, String> {
        self.fetch(Request::get(&self.url("/students/search")).query([("name", name)]))
            .await
    }

    pub async fn get_student_by_nfc_token(&self, token: &str) -> Result<Student, String> {
        self.fetch(Request::get(&self.url(&nfc_token_path(token)))).await
    }

    pub async fn create_student(&self, request: &StudentRequest) -> Result<CreatedResponse, String> {
        self.send_json(Request::post(&self.url("/students")), request)
            .await
    }

    pub async fn update_student(
        &self,
        student_id: i64,
        request: &StudentRequest,
    ) -> Result<MessageResponse, String> {
        self.send_json(
            Request::put(&self.url(&format!("/students/{}", student_id))),
            request,
        )
        .await
    }

    pub async fn delete_student(&self, student_id: i64) -> Result<MessageResponse, String> {
        self.fetch(Request::delete(&self.url(&format!("/students/{}", student_id))))
            .await
    }

    // Classes

    pub async fn list_classes(&self) -> Result<Vec<Class>, String> {
        self.fetch(Request::get(&self.url("/classes"))).await
    }

    pub async fn list_active_classes(&self) -> Result<Vec<Class>, String> {
        self.fetch(Request::get(&self.url("/classes/active"))).await
    }

    pub async fn get_current_classes(&self) -> Result<Vec<Class>, String> {
        self.fetch(Request::get(&self.url("/classes/current"))).await
    }

    /// `None` when nothing else starts today
    pub async fn get_upcoming_class(&self) -> Result<Option<Class>, String> {
        self.fetch(Request::get(&self.url("/classes/upcoming"))).await
    }

    pub async fn get_class(&self, class_id: i64) -> Result<Class, String> {
        self.fetch(Request::get(&self.url(&format!("/classes/{}", class_id))))
            .await
    }

    pub async fn create_class(&self, request: &ClassRequest) -> Result<CreatedResponse, String> {
        self.send_json(Request::post(&self.url("/classes")), request)
            .await
    }

    pub async fn update_class(
        &self,
        class_id: i64,
        request: &ClassRequest,
    ) -> Result<MessageResponse, String> {
        self.send_json(
            Request::put(&self.url(&format!("/classes/{}", class_id))),
            request,
        )
        .await
    }

    pub async fn delete_class(&self, class_id: i64) -> Result<MessageResponse, String> {
        self.fetch(Request::delete(&self.url(&format!("/classes/{}", class_id))))
            .await
    }

    pub async fn list_students_in_class(&self, class_id: i64) -> Result<Vec<Student>, String> {
        self.fetch(Request::get(&self.url(&format!("/classes/{}/students", class_id))))
            .await
    }

    pub async fn enroll_student(&self, class_id: i64, student_id: i64) -> Result<MessageResponse, String> {
        self.send_json(
            Request::post(&self.url(&format!("/classes/{}/students", class_id))),
            &EnrollmentRequest {
                student_id: Some(student_id),
            },
        )
        .await
    }

    pub async fn unenroll_student(&self, class_id: i64, student_id: i64) -> Result<MessageResponse, String> {
        self.send_json(
            Request::delete(&self.url(&format!("/classes/{}/students", class_id))),
            &EnrollmentRequest {
                student_id: Some(student_id),
            },
        )
        .await
    }

    // Attendance

    pub async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, String> {
        self.fetch(Request::get(&self.url("/attendance"))).await
    }

    pub async fn get_attendance(&self, attendance_id: i64) -> Result<AttendanceRecord, String> {
        self.fetch(Request::get(&self.url(&format!("/attendance/{}", attendance_id))))
            .await
    }

    pub async fn check_in(&self, request: &CheckInRequest) -> Result<CreatedResponse, String> {
        self.send_json(Request::post(&self.url("/attendance/checkin")), request)
            .await
    }

    pub async fn list_attendance_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AttendanceRecord>, String> {
        self.fetch(
            Request::get(&self.url("/attendance/daterange"))
                .query([("start_date", start_date), ("end_date", end_date)]),
        )
        .await
    }

    pub async fn list_attendance_by_student(&self, student_id: i64) -> Result<Vec<AttendanceRecord>, String> {
        self.fetch(Request::get(&self.url(&format!("/attendance/student/{}", student_id))))
            .await
    }

    pub async fn list_attendance_by_class(&self, class_id: i64) -> Result<Vec<AttendanceRecord>, String> {
        self.fetch(Request::get(&self.url(&format!("/attendance/class/{}", class_id))))
            .await
    }

    pub async fn get_monthly_report(&self, year: i32, month: u32) -> Result<Vec<MonthlyReportRow>, String> {
        self.fetch(Request::get(&self.url(&format!(
            "/attendance/report/monthly?year={}&month={}",
            year, month
        ))))
        .await
    }

    pub async fn get_student_monthly_attendance(
        &self,
        student_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<AttendanceRecord>, String> {
        self.fetch(Request::get(&self.url(&format!(
            "/attendance/student/{}/monthly?year={}&month={}",
            student_id, year, month
        ))))
        .await
    }

    pub async fn delete_attendance(&self, attendance_id: i64) -> Result<MessageResponse, String> {
        self.fetch(Request::delete(&self.url(&format!("/attendance/{}", attendance_id))))
            .await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, String> {
        match request.send().await {
            Ok(response) => read_response(response).await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        body: &B,
    ) -> Result<T, String> {
        let request = request
            .json(body)
            .map_err(|e| format!("Failed to serialize request: {}", e))?;

        match request.send().await {
            Ok(response) => read_response(response).await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }
}

async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(error_message(status, &body))
    }
}

/// The server's `error` field, or a generic message naming the status
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) => error.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("Request failed with status {}", status),
    }
}

/// Tokens are arbitrary tag payloads and may contain `/`, `?` or `#`
fn nfc_token_path(token: &str) -> String {
    let encoded: String = js_sys::encode_uri_component(token).into();
    format!("/students/nfc/{}", encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_server_error_field() {
        assert_eq!(
            error_message(400, r#"{"error":"Student already checked in for this class today"}"#),
            "Student already checked in for this class today"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(502, "Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(500, ""), "Request failed with status 500");
    }

    #[test]
    fn test_url_includes_api_prefix() {
        let client = ApiClient::with_base_url("http://dojo.local".to_string());
        assert_eq!(client.url("/students"), "http://dojo.local/api/students");
    }
}

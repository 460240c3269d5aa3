use serde::{Deserialize, Serialize};

/// A student on the school roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub age: i64,
    /// Alternate lookup key (card/tag identifier), unique when present
    pub nfc_token: Option<String>,
    /// Creation timestamp as stored by the database (UTC, "YYYY-MM-DD HH:MM:SS")
    pub created_at: String,
}

/// Body for POST /api/students and PUT /api/students/:id
///
/// Every field is optional at the wire level so that the handler can report
/// exactly which required fields are missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub nfc_token: Option<String>,
}

/// A scheduled weekly class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    /// 0 = Sunday, 6 = Saturday
    pub day_of_week: i64,
    /// Zero-padded 24-hour "HH:MM"
    pub start_time: String,
    /// Zero-padded 24-hour "HH:MM"
    pub end_time: String,
    pub active: bool,
    pub created_at: String,
}

/// Body for POST /api/classes and PUT /api/classes/:id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassRequest {
    pub name: Option<String>,
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub active: Option<bool>,
}

/// Body for POST/DELETE /api/classes/:id/students
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub student_id: Option<i64>,
}

/// A single check-in, joined with the student and class names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    /// Calendar date of the class ("YYYY-MM-DD")
    pub date: String,
    /// Local wall-clock time of the check-in ("YYYY-MM-DD HH:MM:SS")
    pub check_in_time: String,
    pub student_name: String,
    pub class_name: String,
}

/// Body for POST /api/attendance/checkin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    /// Defaults to today when omitted
    pub date: Option<String>,
}

/// One row of the monthly billing report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReportRow {
    pub student_id: i64,
    pub student_name: String,
    pub student_age: i64,
    pub total_attendance: i64,
    /// Distinct class names attended during the month, alphabetical
    pub classes_attended: Vec<String>,
}

/// Query string for GET /api/students/search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentSearchQuery {
    pub name: Option<String>,
}

/// Query string for GET /api/attendance/daterange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Query string for the monthly report endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Returned with 201 after a successful create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

/// Returned with 200 after a successful update or delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub database: String,
}

use chrono::NaiveDate;
use shared::CheckInRequest;

use crate::domain::calendar::parse_date;
use crate::domain::errors::{MissingFields, ValidationError};

/// Validated check-in; `date` falls back to today when absent
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckIn {
    pub student_id: i64,
    pub class_id: i64,
    pub date: Option<NaiveDate>,
}

impl NewCheckIn {
    pub fn from_request(request: CheckInRequest) -> Result<Self, ValidationError> {
        MissingFields::new()
            .check("student_id", &request.student_id)
            .check("class_id", &request.class_id)
            .finish()?;

        let date = match request.date.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(parse_date("date", value)?),
            _ => None,
        };

        Ok(Self {
            student_id: request.student_id.unwrap_or_default(),
            class_id: request.class_id.unwrap_or_default(),
            date,
        })
    }
}

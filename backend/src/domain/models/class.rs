use shared::ClassRequest;

use crate::domain::calendar::parse_class_time;
use crate::domain::errors::{MissingFields, ValidationError};

/// Validated fields for creating or fully replacing a class.
///
/// `day_of_week` is range-checked by the class repository, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClass {
    pub name: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub active: bool,
}

impl NewClass {
    /// Create: `active` defaults to true
    pub fn for_create(request: ClassRequest) -> Result<Self, ValidationError> {
        Self::from_request(request, false)
    }

    /// Update is a full replacement, so `active` must be given
    pub fn for_update(request: ClassRequest) -> Result<Self, ValidationError> {
        Self::from_request(request, true)
    }

    fn from_request(request: ClassRequest, require_active: bool) -> Result<Self, ValidationError> {
        let mut missing = MissingFields::new();
        missing
            .check_text("name", &request.name)
            .check("day_of_week", &request.day_of_week)
            .check_text("start_time", &request.start_time)
            .check_text("end_time", &request.end_time);
        if require_active {
            missing.check("active", &request.active);
        }
        missing.finish()?;

        Ok(Self {
            name: request.name.unwrap_or_default().trim().to_string(),
            day_of_week: request.day_of_week.unwrap_or_default(),
            start_time: parse_class_time("start_time", &request.start_time.unwrap_or_default())?,
            end_time: parse_class_time("end_time", &request.end_time.unwrap_or_default())?,
            active: request.active.unwrap_or(true),
        })
    }
}

use shared::StudentRequest;

use crate::domain::errors::{MissingFields, ValidationError};

/// Validated fields for creating or fully replacing a student
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub age: i64,
    pub nfc_token: Option<String>,
}

impl NewStudent {
    pub fn from_request(request: StudentRequest) -> Result<Self, ValidationError> {
        MissingFields::new()
            .check_text("name", &request.name)
            .check("age", &request.age)
            .finish()?;

        let age = request.age.unwrap_or_default();
        if age <= 0 {
            return Err(ValidationError::Invalid(
                "age must be a positive integer".to_string(),
            ));
        }

        Ok(Self {
            name: request.name.unwrap_or_default().trim().to_string(),
            age,
            // Blank tokens mean "no token"
            nfc_token: request
                .nfc_token
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty()),
        })
    }
}

/// Input rejected before any store access
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", describe_missing(.0))]
    MissingFields(Vec<&'static str>),
    #[error("{0}")]
    Invalid(String),
}

/// "name is required", "name and age are required", "a, b and c are required"
fn describe_missing(fields: &[&'static str]) -> String {
    match fields {
        [] => "Required fields are missing".to_string(),
        [only] => format!("{} is required", only),
        [init @ .., last] => format!("{} and {} are required", init.join(", "), last),
    }
}

/// Collects the names of required fields that are absent
#[derive(Debug, Default)]
pub struct MissingFields(Vec<&'static str>);

impl MissingFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check<T>(&mut self, field: &'static str, value: &Option<T>) -> &mut Self {
        if value.is_none() {
            self.0.push(field);
        }
        self
    }

    /// Like `check`, but blank strings count as missing too
    pub fn check_text(&mut self, field: &'static str, value: &Option<String>) -> &mut Self {
        if value.as_deref().map_or(true, |text| text.trim().is_empty()) {
            self.0.push(field);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(std::mem::take(&mut self.0)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_messages() {
        assert_eq!(
            ValidationError::MissingFields(vec!["student_id"]).to_string(),
            "student_id is required"
        );
        assert_eq!(
            ValidationError::MissingFields(vec!["name", "age"]).to_string(),
            "name and age are required"
        );
        assert_eq!(
            ValidationError::MissingFields(vec!["name", "day_of_week", "end_time"]).to_string(),
            "name, day_of_week and end_time are required"
        );
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let result = MissingFields::new()
            .check_text("name", &Some("   ".to_string()))
            .check("age", &Some(10))
            .finish();
        assert_eq!(result, Err(ValidationError::MissingFields(vec!["name"])));
    }
}

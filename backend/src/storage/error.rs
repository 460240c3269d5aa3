use sqlx::error::ErrorKind;

/// Outcomes a repository reports instead of a bare database failure
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("day_of_week must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidDayOfWeek(i64),
    #[error("NFC token is already assigned to another student")]
    DuplicateNfcToken,
    #[error("Student is already enrolled in this class")]
    AlreadyEnrolled,
    #[error("Student already checked in for this class today")]
    DuplicateCheckIn,
    #[error("Referenced student or class does not exist")]
    MissingReference,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Kind of constraint a failed statement tripped over, if any
pub(crate) fn constraint_kind(err: &sqlx::Error) -> Option<ErrorKind> {
    match err {
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::Other => None,
            kind => Some(kind),
        },
        _ => None,
    }
}

/// Map unique and foreign-key violations of an insert/update to typed outcomes
pub(crate) fn map_constraint(err: sqlx::Error, on_unique: RepositoryError) -> RepositoryError {
    match constraint_kind(&err) {
        Some(ErrorKind::UniqueViolation) => on_unique,
        Some(ErrorKind::ForeignKeyViolation) => RepositoryError::MissingReference,
        _ => RepositoryError::Database(err),
    }
}

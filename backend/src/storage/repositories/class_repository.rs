use shared::{Class, Student};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::NewClass;
use crate::storage::connection::DbConnection;
use crate::storage::error::{map_constraint, RepositoryError, RepositoryResult};
use crate::storage::repositories::student_repository::student_from_row;

const CLASS_COLUMNS: &str = "id, name, day_of_week, start_time, end_time, active, created_at";

/// Repository for the weekly class schedule and class enrollment
#[derive(Clone)]
pub struct ClassRepository {
    db: DbConnection,
}

impl ClassRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// All classes in schedule order
    pub async fn list_classes(&self) -> RepositoryResult<Vec<Class>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM classes ORDER BY day_of_week, start_time, id",
            CLASS_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(class_from_row).collect())
    }

    /// Active classes in schedule order
    pub async fn list_active_classes(&self) -> RepositoryResult<Vec<Class>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM classes WHERE active = 1 ORDER BY day_of_week, start_time, id",
            CLASS_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(class_from_row).collect())
    }

    pub async fn get_class(&self, class_id: i64) -> RepositoryResult<Option<Class>> {
        let row = sqlx::query(&format!("SELECT {} FROM classes WHERE id = ?", CLASS_COLUMNS))
            .bind(class_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(class_from_row))
    }

    /// Store a new class and return its generated id
    pub async fn create_class(&self, class: &NewClass) -> RepositoryResult<i64> {
        validate_day_of_week(class.day_of_week)?;

        let result = sqlx::query(
            r#"
            INSERT INTO classes (name, day_of_week, start_time, end_time, active)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&class.name)
        .bind(class.day_of_week)
        .bind(&class.start_time)
        .bind(&class.end_time)
        .bind(class.active)
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Replace every mutable field. Returns false when no such class exists.
    pub async fn update_class(&self, class_id: i64, class: &NewClass) -> RepositoryResult<bool> {
        validate_day_of_week(class.day_of_week)?;

        let result = sqlx::query(
            r#"
            UPDATE classes
            SET name = ?, day_of_week = ?, start_time = ?, end_time = ?, active = ?
            WHERE id = ?
            "#,
        )
        .bind(&class.name)
        .bind(class.day_of_week)
        .bind(&class.start_time)
        .bind(&class.end_time)
        .bind(class.active)
        .bind(class_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a class; enrollments and attendance go with it (ON DELETE CASCADE)
    pub async fn delete_class(&self, class_id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM classes WHERE id = ?")
            .bind(class_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Active classes on `day_of_week` whose [start, end] contains `current_time`.
    ///
    /// Times are zero-padded "HH:MM", so text comparison is chronological.
    pub async fn get_current_classes(
        &self,
        day_of_week: i64,
        current_time: &str,
    ) -> RepositoryResult<Vec<Class>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM classes
            WHERE active = 1
              AND day_of_week = ?
              AND start_time <= ?
              AND end_time >= ?
            ORDER BY start_time, id
            "#,
            CLASS_COLUMNS
        ))
        .bind(day_of_week)
        .bind(current_time)
        .bind(current_time)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(class_from_row).collect())
    }

    /// Next active class later the same day; never rolls over to the next day
    pub async fn get_upcoming_class(
        &self,
        day_of_week: i64,
        current_time: &str,
    ) -> RepositoryResult<Option<Class>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM classes
            WHERE active = 1
              AND day_of_week = ?
              AND start_time > ?
            ORDER BY start_time, id
            LIMIT 1
            "#,
            CLASS_COLUMNS
        ))
        .bind(day_of_week)
        .bind(current_time)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(class_from_row))
    }

    /// Students enrolled in a class, ordered by name
    pub async fn list_students_in_class(&self, class_id: i64) -> RepositoryResult<Vec<Student>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name, s.age, s.nfc_token, s.created_at
            FROM students s
            INNER JOIN class_students cs ON s.id = cs.student_id
            WHERE cs.class_id = ?
            ORDER BY s.name, s.id
            "#,
        )
        .bind(class_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(student_from_row).collect())
    }

    /// Enroll a student; a pair that is already enrolled is rejected
    pub async fn enroll_student(&self, class_id: i64, student_id: i64) -> RepositoryResult<()> {
        sqlx::query("INSERT INTO class_students (class_id, student_id) VALUES (?, ?)")
            .bind(class_id)
            .bind(student_id)
            .execute(self.db.pool())
            .await
            .map_err(|e| map_constraint(e, RepositoryError::AlreadyEnrolled))?;

        Ok(())
    }

    /// Remove an enrollment; removing a pair that was never enrolled is a no-op
    pub async fn unenroll_student(&self, class_id: i64, student_id: i64) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM class_students WHERE class_id = ? AND student_id = ?")
            .bind(class_id)
            .bind(student_id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}

fn validate_day_of_week(day_of_week: i64) -> RepositoryResult<()> {
    if (0..=6).contains(&day_of_week) {
        Ok(())
    } else {
        Err(RepositoryError::InvalidDayOfWeek(day_of_week))
    }
}

fn class_from_row(row: &SqliteRow) -> Class {
    Class {
        id: row.get("id"),
        name: row.get("name"),
        day_of_week: row.get("day_of_week"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        active: row.get("active"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewStudent;
    use crate::storage::repositories::{AttendanceRepository, StudentRepository};
    use chrono::NaiveDate;

    async fn setup_test() -> (ClassRepository, StudentRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        (ClassRepository::new(db.clone()), StudentRepository::new(db))
    }

    fn new_class(name: &str, day_of_week: i64, start: &str, end: &str) -> NewClass {
        NewClass {
            name: name.to_string(),
            day_of_week,
            start_time: start.to_string(),
            end_time: end.to_string(),
            active: true,
        }
    }

    fn new_student(name: &str) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            age: 11,
            nfc_token: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_class() {
        let (repo, _) = setup_test().await;

        let id = repo
            .create_class(&new_class("Adult BJJ", 2, "19:00", "20:30"))
            .await
            .expect("Failed to create class");

        let class = repo.get_class(id).await.unwrap().expect("Class missing");
        assert_eq!(class.name, "Adult BJJ");
        assert_eq!(class.day_of_week, 2);
        assert_eq!(class.start_time, "19:00");
        assert_eq!(class.end_time, "20:30");
        assert!(class.active);
    }

    #[tokio::test]
    async fn test_day_of_week_out_of_range_rejected() {
        let (repo, _) = setup_test().await;

        let result = repo.create_class(&new_class("Bad", 7, "10:00", "11:00")).await;
        assert!(matches!(result, Err(RepositoryError::InvalidDayOfWeek(7))));

        let id = repo.create_class(&new_class("Good", 0, "10:00", "11:00")).await.unwrap();
        let result = repo.update_class(id, &new_class("Good", -1, "10:00", "11:00")).await;
        assert!(matches!(result, Err(RepositoryError::InvalidDayOfWeek(-1))));

        assert_eq!(repo.list_classes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let (repo, _) = setup_test().await;
        let id = repo.create_class(&new_class("Kids", 1, "16:00", "17:00")).await.unwrap();

        let mut replacement = new_class("Teens", 4, "17:30", "18:30");
        replacement.active = false;
        assert!(repo.update_class(id, &replacement).await.unwrap());

        let class = repo.get_class(id).await.unwrap().unwrap();
        assert_eq!(class.name, "Teens");
        assert_eq!(class.day_of_week, 4);
        assert_eq!(class.start_time, "17:30");
        assert_eq!(class.end_time, "18:30");
        assert!(!class.active);

        assert!(!repo.update_class(999, &replacement).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_active_excludes_inactive() {
        let (repo, _) = setup_test().await;
        repo.create_class(&new_class("Morning", 1, "07:00", "08:00")).await.unwrap();
        let mut retired = new_class("Retired", 1, "09:00", "10:00");
        retired.active = false;
        repo.create_class(&retired).await.unwrap();

        assert_eq!(repo.list_classes().await.unwrap().len(), 2);
        let active = repo.list_active_classes().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Morning");
    }

    #[tokio::test]
    async fn test_current_classes_inclusive_interval() {
        let (repo, _) = setup_test().await;
        repo.create_class(&new_class("Exact Start", 3, "10:00", "11:00")).await.unwrap();
        repo.create_class(&new_class("Ends Now", 3, "09:00", "10:00")).await.unwrap();
        repo.create_class(&new_class("Too Late", 3, "10:01", "11:00")).await.unwrap();
        repo.create_class(&new_class("Other Day", 4, "09:30", "10:30")).await.unwrap();
        let mut inactive = new_class("Inactive", 3, "09:30", "10:30");
        inactive.active = false;
        repo.create_class(&inactive).await.unwrap();

        let names: Vec<String> = repo
            .get_current_classes(3, "10:00")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ends Now", "Exact Start"]);
    }

    #[tokio::test]
    async fn test_upcoming_class_is_earliest_later_start() {
        let (repo, _) = setup_test().await;
        repo.create_class(&new_class("Evening", 5, "18:00", "19:00")).await.unwrap();
        repo.create_class(&new_class("Afternoon", 5, "15:00", "16:00")).await.unwrap();
        repo.create_class(&new_class("Now", 5, "12:00", "13:00")).await.unwrap();

        let upcoming = repo.get_upcoming_class(5, "12:00").await.unwrap().unwrap();
        assert_eq!(upcoming.name, "Afternoon");

        // Nothing left today, and no rollover to tomorrow
        assert!(repo.get_upcoming_class(5, "18:00").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enrollment_lifecycle() {
        let (classes, students) = setup_test().await;
        let class_id = classes.create_class(&new_class("Kids", 6, "10:00", "11:00")).await.unwrap();
        let zed = students.create_student(&new_student("Zed")).await.unwrap();
        let amy = students.create_student(&new_student("Amy")).await.unwrap();

        classes.enroll_student(class_id, zed).await.unwrap();
        classes.enroll_student(class_id, amy).await.unwrap();

        let result = classes.enroll_student(class_id, zed).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyEnrolled)));

        let names: Vec<String> = classes
            .list_students_in_class(class_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Amy", "Zed"]);

        classes.unenroll_student(class_id, zed).await.unwrap();
        // Removing again is a no-op
        classes.unenroll_student(class_id, zed).await.unwrap();
        assert_eq!(classes.list_students_in_class(class_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_enroll_unknown_student_rejected() {
        let (classes, _) = setup_test().await;
        let class_id = classes.create_class(&new_class("Kids", 6, "10:00", "11:00")).await.unwrap();

        let result = classes.enroll_student(class_id, 404).await;
        assert!(matches!(result, Err(RepositoryError::MissingReference)));
    }

    #[tokio::test]
    async fn test_delete_class_cascades_enrollments() {
        let (classes, students) = setup_test().await;
        let class_id = classes.create_class(&new_class("Kids", 6, "10:00", "11:00")).await.unwrap();
        let student_id = students.create_student(&new_student("Amy")).await.unwrap();
        classes.enroll_student(class_id, student_id).await.unwrap();

        assert!(classes.delete_class(class_id).await.unwrap());
        assert!(classes.get_class(class_id).await.unwrap().is_none());
        assert!(classes.list_students_in_class(class_id).await.unwrap().is_empty());
        assert!(!classes.delete_class(class_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_class_cascades_attendance() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let classes = ClassRepository::new(db.clone());
        let students = StudentRepository::new(db.clone());
        let attendance = AttendanceRepository::new(db.clone());

        let class_id = classes.create_class(&new_class("Kids", 6, "10:00", "11:00")).await.unwrap();
        let student_id = students.create_student(&new_student("Amy")).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        attendance
            .check_in(student_id, class_id, date, "2025-06-21 10:05:00")
            .await
            .expect("Failed to check in");

        assert!(classes.delete_class(class_id).await.unwrap());

        let remaining: i64 = sqlx::query("SELECT COUNT(*) FROM attendance")
            .fetch_one(db.pool())
            .await
            .expect("Failed to count attendance")
            .get(0);
        assert_eq!(remaining, 0);
        assert!(attendance.list_attendance().await.unwrap().is_empty());
        assert!(students.get_student(student_id).await.unwrap().is_some());
    }
}

use shared::Student;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::NewStudent;
use crate::storage::connection::DbConnection;
use crate::storage::error::{map_constraint, RepositoryError, RepositoryResult};

const STUDENT_COLUMNS: &str = "id, name, age, nfc_token, created_at";

/// Repository for the student roster
#[derive(Clone)]
pub struct StudentRepository {
    db: DbConnection,
}

impl StudentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// All students ordered by name
    pub async fn list_students(&self) -> RepositoryResult<Vec<Student>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM students ORDER BY name, id",
            STUDENT_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(student_from_row).collect())
    }

    pub async fn get_student(&self, student_id: i64) -> RepositoryResult<Option<Student>> {
        let row = sqlx::query(&format!("SELECT {} FROM students WHERE id = ?", STUDENT_COLUMNS))
            .bind(student_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(student_from_row))
    }

    /// Exact match on the NFC token; tokens are unique so at most one student matches
    pub async fn get_student_by_nfc_token(&self, token: &str) -> RepositoryResult<Option<Student>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM students WHERE nfc_token = ?",
            STUDENT_COLUMNS
        ))
        .bind(token)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(student_from_row))
    }

    /// Case-insensitive substring match on the student name.
    ///
    /// SQLite's LIKE only folds ASCII, so names are compared after Unicode
    /// lowercasing here instead.
    pub async fn search_students(&self, name: &str) -> RepositoryResult<Vec<Student>> {
        let needle = name.trim().to_lowercase();
        let students = self.list_students().await?;

        Ok(students
            .into_iter()
            .filter(|student| student.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Store a new student and return its generated id
    pub async fn create_student(&self, student: &NewStudent) -> RepositoryResult<i64> {
        let result = sqlx::query("INSERT INTO students (name, age, nfc_token) VALUES (?, ?, ?)")
            .bind(&student.name)
            .bind(student.age)
            .bind(&student.nfc_token)
            .execute(self.db.pool())
            .await
            .map_err(|e| map_constraint(e, RepositoryError::DuplicateNfcToken))?;

        Ok(result.last_insert_rowid())
    }

    /// Replace name, age and token. Returns false when no such student exists.
    pub async fn update_student(&self, student_id: i64, student: &NewStudent) -> RepositoryResult<bool> {
        let result = sqlx::query("UPDATE students SET name = ?, age = ?, nfc_token = ? WHERE id = ?")
            .bind(&student.name)
            .bind(student.age)
            .bind(&student.nfc_token)
            .bind(student_id)
            .execute(self.db.pool())
            .await
            .map_err(|e| map_constraint(e, RepositoryError::DuplicateNfcToken))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a student; enrollments and attendance go with it (ON DELETE CASCADE)
    pub async fn delete_student(&self, student_id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(student_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub(crate) fn student_from_row(row: &SqliteRow) -> Student {
    Student {
        id: row.get("id"),
        name: row.get("name"),
        age: row.get("age"),
        nfc_token: row.get("nfc_token"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> StudentRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        StudentRepository::new(db)
    }

    fn new_student(name: &str, age: i64, token: Option<&str>) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            age,
            nfc_token: token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_student() {
        let repo = setup_test().await;

        let id = repo
            .create_student(&new_student("Mia Tanaka", 10, Some("tag-001")))
            .await
            .expect("Failed to create student");

        let student = repo.get_student(id).await.expect("Query failed").expect("Student missing");
        assert_eq!(student.id, id);
        assert_eq!(student.name, "Mia Tanaka");
        assert_eq!(student.age, 10);
        assert_eq!(student.nfc_token.as_deref(), Some("tag-001"));
        assert!(!student.created_at.is_empty());

        let by_token = repo
            .get_student_by_nfc_token("tag-001")
            .await
            .expect("Query failed")
            .expect("Student missing");
        assert_eq!(by_token, student);
    }

    #[tokio::test]
    async fn test_get_missing_student_is_none() {
        let repo = setup_test().await;
        assert!(repo.get_student(42).await.expect("Query failed").is_none());
        assert!(repo.get_student_by_nfc_token("nope").await.expect("Query failed").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_nfc_token_rejected() {
        let repo = setup_test().await;
        repo.create_student(&new_student("A", 8, Some("tag-x"))).await.unwrap();

        let result = repo.create_student(&new_student("B", 9, Some("tag-x"))).await;
        assert!(matches!(result, Err(RepositoryError::DuplicateNfcToken)));

        // Students without tokens never collide
        repo.create_student(&new_student("C", 9, None)).await.unwrap();
        repo.create_student(&new_student("D", 9, None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let repo = setup_test().await;
        let id = repo.create_student(&new_student("Old Name", 7, Some("old-tag"))).await.unwrap();

        let found = repo
            .update_student(id, &new_student("New Name", 8, None))
            .await
            .expect("Failed to update");
        assert!(found);

        let student = repo.get_student(id).await.unwrap().unwrap();
        assert_eq!(student.name, "New Name");
        assert_eq!(student.age, 8);
        assert!(student.nfc_token.is_none());
        assert!(repo.get_student_by_nfc_token("old-tag").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_to_taken_token_rejected() {
        let repo = setup_test().await;
        repo.create_student(&new_student("A", 8, Some("tag-a"))).await.unwrap();
        let b = repo.create_student(&new_student("B", 8, Some("tag-b"))).await.unwrap();

        let result = repo.update_student(b, &new_student("B", 8, Some("tag-a"))).await;
        assert!(matches!(result, Err(RepositoryError::DuplicateNfcToken)));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_student() {
        let repo = setup_test().await;
        assert!(!repo.update_student(99, &new_student("X", 5, None)).await.unwrap());
        assert!(!repo.delete_student(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let repo = setup_test().await;
        for name in ["Zoe", "Adam", "Maya"] {
            repo.create_student(&new_student(name, 10, None)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_students()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Adam", "Maya", "Zoe"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let repo = setup_test().await;
        for name in ["Sarah Connor", "Jonas Sarault", "Mike Brown"] {
            repo.create_student(&new_student(name, 10, None)).await.unwrap();
        }

        let names: Vec<String> = repo
            .search_students("SAR")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Jonas Sarault", "Sarah Connor"]);

        // Wildcards in the term match literally
        assert!(repo.search_students("%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_folds_accented_names() {
        let repo = setup_test().await;
        for name in ["Élodie Durand", "Zoë Müller", "Eli Park"] {
            repo.create_student(&new_student(name, 10, None)).await.unwrap();
        }

        let hits = repo.search_students("élodie").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Élodie Durand");

        let hits = repo.search_students("MÜLLER").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Zoë Müller");
    }
}

use std::collections::HashMap;

use chrono::NaiveDate;
use shared::{AttendanceRecord, MonthlyReportRow};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::calendar::format_date;
use crate::storage::connection::DbConnection;
use crate::storage::error::{map_constraint, RepositoryError, RepositoryResult};

/// Attendance joined with the student and class names
const RECORD_SELECT: &str = r#"
    SELECT a.id, a.student_id, a.class_id, a.date, a.check_in_time,
           s.name AS student_name, c.name AS class_name
    FROM attendance a
    INNER JOIN students s ON a.student_id = s.id
    INNER JOIN classes c ON a.class_id = c.id
"#;

const NEWEST_FIRST: &str = "ORDER BY a.date DESC, a.check_in_time DESC, a.id DESC";
const OLDEST_FIRST: &str = "ORDER BY a.date, a.check_in_time, a.id";

/// Repository for check-ins and the reports built on them
#[derive(Clone)]
pub struct AttendanceRepository {
    db: DbConnection,
}

impl AttendanceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Every record, most recent first
    pub async fn list_attendance(&self) -> RepositoryResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query(&format!("{} {}", RECORD_SELECT, NEWEST_FIRST))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    pub async fn get_attendance(&self, attendance_id: i64) -> RepositoryResult<Option<AttendanceRecord>> {
        let row = sqlx::query(&format!("{} WHERE a.id = ?", RECORD_SELECT))
            .bind(attendance_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    /// Record a check-in and return its id.
    ///
    /// The unique index on (student_id, class_id, date) is what rejects a
    /// second check-in for the same day, so concurrent check-ins cannot both
    /// succeed.
    pub async fn check_in(
        &self,
        student_id: i64,
        class_id: i64,
        date: NaiveDate,
        check_in_time: &str,
    ) -> RepositoryResult<i64> {
        let result = sqlx::query(
            "INSERT INTO attendance (student_id, class_id, date, check_in_time) VALUES (?, ?, ?, ?)",
        )
        .bind(student_id)
        .bind(class_id)
        .bind(format_date(date))
        .bind(check_in_time)
        .execute(self.db.pool())
        .await
        .map_err(|e| map_constraint(e, RepositoryError::DuplicateCheckIn))?;

        Ok(result.last_insert_rowid())
    }

    /// Records dated within [start, end], most recent first
    pub async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query(&format!(
            "{} WHERE a.date BETWEEN ? AND ? {}",
            RECORD_SELECT, NEWEST_FIRST
        ))
        .bind(format_date(start))
        .bind(format_date(end))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    pub async fn list_by_student(&self, student_id: i64) -> RepositoryResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query(&format!("{} WHERE a.student_id = ? {}", RECORD_SELECT, NEWEST_FIRST))
            .bind(student_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    pub async fn list_by_class(&self, class_id: i64) -> RepositoryResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query(&format!("{} WHERE a.class_id = ? {}", RECORD_SELECT, NEWEST_FIRST))
            .bind(class_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    /// Per-student totals for the window [start, end], including students
    /// who never attended. Ordered by student name.
    pub async fn monthly_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<MonthlyReportRow>> {
        let start = format_date(start);
        let end = format_date(end);

        // Both reads see the same snapshot
        let mut tx = self.db.pool().begin().await?;

        let totals = sqlx::query(
            r#"
            SELECT s.id AS student_id, s.name AS student_name, s.age AS student_age,
                   COUNT(a.id) AS total_attendance
            FROM students s
            LEFT JOIN attendance a
                ON s.id = a.student_id AND a.date BETWEEN ? AND ?
            GROUP BY s.id, s.name, s.age
            ORDER BY s.name, s.id
            "#,
        )
        .bind(&start)
        .bind(&end)
        .fetch_all(&mut *tx)
        .await?;

        let attended = sqlx::query(
            r#"
            SELECT DISTINCT a.student_id, c.name AS class_name
            FROM attendance a
            INNER JOIN classes c ON a.class_id = c.id
            WHERE a.date BETWEEN ? AND ?
            ORDER BY c.name
            "#,
        )
        .bind(&start)
        .bind(&end)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut classes_by_student: HashMap<i64, Vec<String>> = HashMap::new();
        for row in &attended {
            classes_by_student
                .entry(row.get("student_id"))
                .or_default()
                .push(row.get("class_name"));
        }

        let report = totals
            .iter()
            .map(|row| {
                let student_id: i64 = row.get("student_id");
                MonthlyReportRow {
                    student_id,
                    student_name: row.get("student_name"),
                    student_age: row.get("student_age"),
                    total_attendance: row.get("total_attendance"),
                    classes_attended: classes_by_student.remove(&student_id).unwrap_or_default(),
                }
            })
            .collect();

        Ok(report)
    }

    /// One student's records within [start, end], oldest first
    pub async fn student_attendance_between(
        &self,
        student_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query(&format!(
            "{} WHERE a.student_id = ? AND a.date BETWEEN ? AND ? {}",
            RECORD_SELECT, OLDEST_FIRST
        ))
        .bind(student_id)
        .bind(format_date(start))
        .bind(format_date(end))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    /// Delete a single record. Returns false when no such record exists.
    pub async fn delete_attendance(&self, attendance_id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(attendance_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn record_from_row(row: &SqliteRow) -> AttendanceRecord {
    AttendanceRecord {
        id: row.get("id"),
        student_id: row.get("student_id"),
        class_id: row.get("class_id"),
        date: row.get("date"),
        check_in_time: row.get("check_in_time"),
        student_name: row.get("student_name"),
        class_name: row.get("class_name"),
    }
}

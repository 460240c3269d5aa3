use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// DbConnection owns the SQLite pool shared by every repository
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Connect to the database at `url`, creating the file and schema if needed
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::setup_schema(&pool).await?;

        info!("Connected to database at {}", url);
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database for tests.
    ///
    /// The pool is pinned to one connection that never expires, since an
    /// in-memory database disappears with its last connection.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Answers whether the store responds to a trivial query
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(self.pool()).await.is_ok()
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                nfc_token TEXT UNIQUE,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS classes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                day_of_week INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                CHECK (day_of_week >= 0 AND day_of_week <= 6)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS class_students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                class_id INTEGER NOT NULL,
                student_id INTEGER NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (class_id) REFERENCES classes (id) ON DELETE CASCADE,
                FOREIGN KEY (student_id) REFERENCES students (id) ON DELETE CASCADE,
                UNIQUE (class_id, student_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS attendance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id INTEGER NOT NULL,
                class_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                check_in_time TEXT NOT NULL,
                FOREIGN KEY (student_id) REFERENCES students (id) ON DELETE CASCADE,
                FOREIGN KEY (class_id) REFERENCES classes (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Date-range reports and per-student history
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance (date);")
            .execute(pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_attendance_student ON attendance (student_id);")
            .execute(pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_attendance_class ON attendance (class_id);")
            .execute(pool)
            .await?;

        // One check-in per student, class and day
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_one_per_day
            ON attendance (student_id, class_id, date);
            "#,
        )
        .execute(pool)
        .await?;

        // Current/upcoming class lookups
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_class_schedule ON classes (day_of_week, start_time);",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_creates_all_tables() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .expect("Failed to list tables");
        let tables: Vec<String> = rows.iter().map(|row| row.get("name")).collect();

        for table in ["attendance", "class_students", "classes", "students"] {
            assert!(tables.contains(&table.to_string()), "missing table {}", table);
        }
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let enabled: i64 = sqlx::query("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .expect("Failed to read pragma")
            .get(0);
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_ping() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        assert!(db.ping().await);
    }
}

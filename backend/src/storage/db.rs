use anyhow::Result;
use shared::Habit;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// The fixed habit catalog installed on first run
pub fn seed_catalog() -> Vec<Habit> {
    let entries = [
        ("1", "Sleep Well", "Get a consistent good night of sleep", "moon"),
        ("2", "Exercise", "Physical activity to strengthen the body", "dumbbell"),
        ("3", "Mind Care", "Meditation and mindfulness", "brain"),
        ("4", "Self Care", "Grooming and personal hygiene", "sparkles"),
        ("5", "Eat Well", "Healthy and nutritious meals", "utensils"),
        ("6", "Study", "Learn something new and grow", "book"),
        ("7", "Plan Ahead", "Long-term planning and vision", "rocket"),
        ("8", "Tidy Up", "Organize and clean the environment", "trash"),
    ];

    entries
        .iter()
        .map(|(id, name, description, icon)| Habit {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        })
        .collect()
}

/// DbConnection manages the SQLite pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection and bootstrap the schema
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;
        Self::seed_habits(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema. Idempotent, run on every connect.
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS habits (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                icon TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                id TEXT PRIMARY KEY,
                habit_id TEXT NOT NULL REFERENCES habits(id),
                date TEXT NOT NULL,
                completed_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // One completion record per habit per day, enforced by the store
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_history_habit_date
            ON history(habit_id, date);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS problems (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT DEFAULT 'open',
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS problem_steps (
                id TEXT PRIMARY KEY,
                problem_id TEXT NOT NULL REFERENCES problems(id) ON DELETE CASCADE,
                description TEXT NOT NULL,
                completed INTEGER DEFAULT 0,
                status TEXT DEFAULT 'pending',
                observations TEXT,
                completed_at TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Marker table gating one-time operations such as catalog seeding
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Self::migrate_step_status(pool).await?;

        Ok(())
    }

    /// Additive migration: databases created before the step status column
    /// existed get it added, defaulting every legacy row to 'pending'.
    async fn migrate_step_status(pool: &SqlitePool) -> Result<()> {
        let columns = sqlx::query("PRAGMA table_info(problem_steps)")
            .fetch_all(pool)
            .await?;

        let has_status = columns
            .iter()
            .any(|row| row.get::<String, _>("name") == "status");

        if !has_status {
            info!("Adding status column to problem_steps");
            sqlx::query("ALTER TABLE problem_steps ADD COLUMN status TEXT DEFAULT 'pending'")
                .execute(pool)
                .await?;
        }

        Ok(())
    }

    /// Install the fixed habit catalog exactly once, gated by an explicit
    /// marker row rather than a row-count check.
    async fn seed_habits(pool: &SqlitePool) -> Result<()> {
        let seeded = sqlx::query("SELECT value FROM schema_meta WHERE key = 'habit_catalog_seeded'")
            .fetch_optional(pool)
            .await?;

        if seeded.is_some() {
            return Ok(());
        }

        info!("Seeding habit catalog");
        for habit in seed_catalog() {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO habits (id, name, description, icon)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&habit.id)
            .bind(&habit.name)
            .bind(&habit.description)
            .bind(&habit.icon)
            .execute(pool)
            .await?;
        }

        sqlx::query(
            "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('habit_catalog_seeded', '1')",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &*self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_bootstrap_seeds_catalog_once() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let rows = sqlx::query("SELECT id FROM habits ORDER BY id ASC")
            .fetch_all(db.pool())
            .await
            .expect("Failed to query habits");
        assert_eq!(rows.len(), 8);

        // Emptying the catalog must not trigger a silent re-seed on the next
        // bootstrap run; the marker row gates it.
        sqlx::query("DELETE FROM habits")
            .execute(db.pool())
            .await
            .expect("Failed to clear habits");

        DbConnection::setup_schema(db.pool()).await.expect("Re-running schema failed");
        DbConnection::seed_habits(db.pool()).await.expect("Re-running seed failed");

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM habits")
            .fetch_one(db.pool())
            .await
            .expect("Failed to count habits")
            .get("n");
        assert_eq!(count, 0, "Seed must run exactly once");
    }

    #[tokio::test]
    async fn test_step_status_migration_is_idempotent() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        // The column already exists; running the migration again must not fail
        DbConnection::migrate_step_status(db.pool())
            .await
            .expect("Migration should be idempotent");
    }

    #[tokio::test]
    async fn test_history_unique_per_habit_and_day() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        sqlx::query("INSERT INTO history (id, habit_id, date, completed_at) VALUES (?, ?, ?, ?)")
            .bind("h1")
            .bind("1")
            .bind("2026-08-26")
            .bind("2026-08-26T10:00:00+00:00")
            .execute(db.pool())
            .await
            .expect("First insert should succeed");

        let duplicate =
            sqlx::query("INSERT INTO history (id, habit_id, date, completed_at) VALUES (?, ?, ?, ?)")
                .bind("h2")
                .bind("1")
                .bind("2026-08-26")
                .bind("2026-08-26T11:00:00+00:00")
                .execute(db.pool())
                .await;
        assert!(duplicate.is_err(), "Second record for the same habit and day must be rejected");
    }
}

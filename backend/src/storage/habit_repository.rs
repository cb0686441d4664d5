use anyhow::Result;
use shared::{Habit, HistoryRecord};
use sqlx::Row;

use crate::storage::db::DbConnection;

/// Repository for the habit catalog and its completion log
#[derive(Clone)]
pub struct HabitRepository {
    db: DbConnection,
}

impl HabitRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// List the full habit catalog in stable order
    pub async fn list_habits(&self) -> Result<Vec<Habit>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, icon
            FROM habits
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let habits = rows
            .iter()
            .map(|row| Habit {
                id: row.get("id"),
                name: row.get("name"),
                description: row.get::<Option<String>, _>("description").unwrap_or_default(),
                icon: row.get::<Option<String>, _>("icon").unwrap_or_default(),
            })
            .collect();

        Ok(habits)
    }

    /// List all completion records for one calendar day
    pub async fn list_history(&self, date: &str) -> Result<Vec<HistoryRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, habit_id, date, completed_at
            FROM history
            WHERE date = ?
            "#,
        )
        .bind(date)
        .fetch_all(self.db.pool())
        .await?;

        let records = rows
            .iter()
            .map(|row| HistoryRecord {
                id: row.get("id"),
                habit_id: row.get("habit_id"),
                date: row.get("date"),
                completed_at: row.get("completed_at"),
            })
            .collect();

        Ok(records)
    }

    /// Toggle a habit's completion record for the given day.
    ///
    /// Deletes the record when one exists; otherwise inserts one. The unique
    /// index on (habit_id, date) keeps concurrent toggles from ever producing
    /// two records for the same day. Returns whether the habit is completed
    /// after the toggle.
    pub async fn toggle_habit(
        &self,
        habit_id: &str,
        date: &str,
        completed_at: &str,
    ) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM history WHERE habit_id = ? AND date = ?")
            .bind(habit_id)
            .bind(date)
            .execute(self.db.pool())
            .await?;

        if deleted.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO history (id, habit_id, date, completed_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(habit_id)
        .bind(date)
        .bind(completed_at)
        .execute(self.db.pool())
        .await?;

        Ok(true)
    }
}

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use shared::{Habit, HistoryRecord, ToggleHabitResponse};
use tracing::{info, warn};

use crate::storage::{seed_catalog, DbConnection, HabitRepository};

/// Service for the daily habit tracker
#[derive(Clone)]
pub struct HabitService {
    repository: Option<HabitRepository>,
}

impl HabitService {
    /// Create a new HabitService. `None` means storage is not configured and
    /// the service runs degraded on the fixed seed catalog.
    pub fn new(db: Option<DbConnection>) -> Self {
        Self {
            repository: db.map(HabitRepository::new),
        }
    }

    /// List the habit catalog. Falls back to the seed catalog when storage is
    /// missing or unreachable, so the habits page always renders.
    pub async fn list_habits(&self) -> Vec<Habit> {
        let Some(repository) = &self.repository else {
            warn!("Storage not configured, returning seed catalog");
            return seed_catalog();
        };

        match repository.list_habits().await {
            Ok(habits) => habits,
            Err(e) => {
                warn!("Failed to list habits, falling back to seed catalog: {}", e);
                seed_catalog()
            }
        }
    }

    /// List completion records for one calendar day (YYYY-MM-DD). Returns an
    /// empty list, never an error, when storage is missing or unreachable.
    pub async fn list_history(&self, date: &str) -> Result<Vec<HistoryRecord>> {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            bail!("Invalid date '{}', expected YYYY-MM-DD", date);
        }

        let Some(repository) = &self.repository else {
            return Ok(Vec::new());
        };

        match repository.list_history(date).await {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!("Failed to list history for {}: {}", date, e);
                Ok(Vec::new())
            }
        }
    }

    /// Toggle a habit's completion for today (UTC). Storage failures
    /// propagate; the caller surfaces them and the next read reconciles.
    pub async fn toggle_habit(&self, habit_id: &str) -> Result<ToggleHabitResponse> {
        let Some(repository) = &self.repository else {
            bail!("Storage not configured, cannot record habit completion");
        };

        let now = Utc::now();
        let date = now.format("%Y-%m-%d").to_string();
        let completed = repository
            .toggle_habit(habit_id, &date, &now.to_rfc3339())
            .await?;

        info!("Toggled habit {} on {}: completed={}", habit_id, date, completed);

        Ok(ToggleHabitResponse {
            habit_id: habit_id.to_string(),
            date,
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> HabitService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        HabitService::new(Some(db))
    }

    #[tokio::test]
    async fn test_toggle_is_an_idempotent_pair() {
        let service = setup_test().await;

        let first = service.toggle_habit("3").await.expect("First toggle failed");
        assert!(first.completed);

        let history = service.list_history(&first.date).await.expect("history failed");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].habit_id, "3");

        let second = service.toggle_habit("3").await.expect("Second toggle failed");
        assert!(!second.completed);
        assert_eq!(second.date, first.date);

        let history = service.list_history(&first.date).await.expect("history failed");
        assert!(history.is_empty(), "Toggling twice restores the original state");
    }

    #[tokio::test]
    async fn test_list_history_rejects_malformed_dates() {
        let service = setup_test().await;

        assert!(service.list_history("26-08-2026").await.is_err());
        assert!(service.list_history("not-a-date").await.is_err());
        assert!(service.list_history("2026-08-26").await.is_ok());
    }

    #[tokio::test]
    async fn test_degraded_mode_without_storage() {
        let service = HabitService::new(None);

        let habits = service.list_habits().await;
        assert_eq!(habits, seed_catalog(), "Seed catalog is served unchanged");
        assert_eq!(habits.len(), 8);

        let history = service.list_history("2026-08-26").await.expect("history failed");
        assert!(history.is_empty());

        assert!(service.toggle_habit("1").await.is_err(), "Writes must fail loudly");
    }
}

use anyhow::Result;
use shared::{Problem, ProblemStatus, ProblemStep, StepStatus};
use sqlx::{sqlite::SqliteRow, Row};

use crate::storage::db::DbConnection;

/// Repository for problems and their resolution steps
#[derive(Clone)]
pub struct ProblemRepository {
    db: DbConnection,
}

impl ProblemRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new problem (without steps)
    pub async fn store_problem(&self, problem: &Problem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO problems (id, title, description, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&problem.id)
        .bind(&problem.title)
        .bind(&problem.description)
        .bind(problem.status.as_str())
        .bind(&problem.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// List all problems, newest first. Steps are omitted in list views.
    pub async fn list_problems(&self) -> Result<Vec<Problem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, status, created_at
            FROM problems
            ORDER BY created_at DESC, ROWID DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(map_problem_row).collect())
    }

    /// Get a problem with its full step collection in creation order
    pub async fn get_problem(&self, problem_id: &str) -> Result<Option<Problem>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, status, created_at
            FROM problems
            WHERE id = ?
            "#,
        )
        .bind(problem_id)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let step_rows = sqlx::query(
            r#"
            SELECT id, problem_id, description, completed, status, observations, completed_at
            FROM problem_steps
            WHERE problem_id = ?
            ORDER BY ROWID ASC
            "#,
        )
        .bind(problem_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut problem = map_problem_row(&row);
        problem.steps = step_rows.iter().map(map_step_row).collect();

        Ok(Some(problem))
    }

    /// Append a step to a problem
    pub async fn store_step(&self, step: &ProblemStep) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO problem_steps (id, problem_id, description, completed, status, observations, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&step.id)
        .bind(&step.problem_id)
        .bind(&step.description)
        .bind(step.is_completed() as i64)
        .bind(step.status.as_str())
        .bind(&step.observations)
        .bind(&step.completed_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Get a single step by ID
    pub async fn get_step(&self, step_id: &str) -> Result<Option<ProblemStep>> {
        let row = sqlx::query(
            r#"
            SELECT id, problem_id, description, completed, status, observations, completed_at
            FROM problem_steps
            WHERE id = ?
            "#,
        )
        .bind(step_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(map_step_row))
    }

    /// Update a step's status and observations. The legacy completed column
    /// is written in sync with the status for older readers of the schema.
    /// Returns false when no step with that ID exists.
    pub async fn update_step(
        &self,
        step_id: &str,
        status: StepStatus,
        observations: &str,
        completed_at: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE problem_steps
            SET status = ?, completed = ?, observations = ?, completed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind((status == StepStatus::Completed) as i64)
        .bind(observations)
        .bind(completed_at)
        .bind(step_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set a problem's overall status. Returns false when the problem is unknown.
    pub async fn update_problem_status(
        &self,
        problem_id: &str,
        status: ProblemStatus,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE problems SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(problem_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace a problem's description. Returns false when the problem is unknown.
    pub async fn update_problem_description(
        &self,
        problem_id: &str,
        description: &str,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE problems SET description = ? WHERE id = ?")
            .bind(description)
            .bind(problem_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_problem_row(row: &SqliteRow) -> Problem {
    Problem {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get::<Option<String>, _>("description").unwrap_or_default(),
        status: ProblemStatus::parse(&row.get::<String, _>("status")),
        created_at: row.get("created_at"),
        steps: Vec::new(),
    }
}

fn map_step_row(row: &SqliteRow) -> ProblemStep {
    let legacy_completed = row.get::<i64, _>("completed") != 0;
    let status = StepStatus::from_row(
        row.get::<Option<String>, _>("status").as_deref(),
        legacy_completed,
    );

    ProblemStep {
        id: row.get("id"),
        problem_id: row.get("problem_id"),
        description: row.get("description"),
        status,
        // Derived from status; the stored boolean only matters for
        // pre-migration rows with no status value.
        completed: status == StepStatus::Completed,
        observations: row.get::<Option<String>, _>("observations").unwrap_or_default(),
        completed_at: row.get("completed_at"),
    }
}

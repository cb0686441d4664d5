use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use shared::{Problem, ProblemStatus, ProblemStep, StepStatus};
use tracing::{info, warn};
use uuid::Uuid;

use crate::storage::{DbConnection, ProblemRepository};

/// Service for the problem tracker and its resolution plans
#[derive(Clone)]
pub struct ProblemService {
    repository: Option<ProblemRepository>,
}

impl ProblemService {
    /// Create a new ProblemService. `None` means storage is not configured;
    /// reads degrade to empty results and writes fail.
    pub fn new(db: Option<DbConnection>) -> Self {
        Self {
            repository: db.map(ProblemRepository::new),
        }
    }

    fn repository(&self) -> Result<&ProblemRepository> {
        self.repository
            .as_ref()
            .ok_or_else(|| anyhow!("Storage not configured"))
    }

    /// List all problems, newest first, steps omitted
    pub async fn list_problems(&self) -> Vec<Problem> {
        let Some(repository) = &self.repository else {
            return Vec::new();
        };

        match repository.list_problems().await {
            Ok(problems) => problems,
            Err(e) => {
                warn!("Failed to list problems: {}", e);
                Vec::new()
            }
        }
    }

    /// Get a problem with its full step collection
    pub async fn get_problem(&self, problem_id: &str) -> Result<Option<Problem>> {
        let Some(repository) = &self.repository else {
            return Ok(None);
        };

        repository.get_problem(problem_id).await
    }

    /// Create a new open problem and return its ID. Title presence is the
    /// caller's concern (spec'd as a UI-side check).
    pub async fn create_problem(&self, title: &str, description: &str) -> Result<String> {
        let problem = Problem {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            description: description.to_string(),
            status: ProblemStatus::Open,
            created_at: Utc::now().to_rfc3339(),
            steps: Vec::new(),
        };

        self.repository()?.store_problem(&problem).await?;

        info!("Created problem {} ({})", problem.id, problem.title);
        Ok(problem.id)
    }

    /// Append a pending step to an existing problem and return its ID
    pub async fn create_step(
        &self,
        problem_id: &str,
        description: &str,
        observations: &str,
    ) -> Result<String> {
        let repository = self.repository()?;

        if repository.get_problem(problem_id).await?.is_none() {
            bail!("Problem not found: {}", problem_id);
        }

        let step = ProblemStep {
            id: Uuid::new_v4().to_string(),
            problem_id: problem_id.to_string(),
            description: description.to_string(),
            status: StepStatus::Pending,
            completed: false,
            observations: observations.to_string(),
            completed_at: None,
        };

        repository.store_step(&step).await?;

        info!("Added step {} to problem {}", step.id, problem_id);
        Ok(step.id)
    }

    /// Set a step's status and observations. Completing stamps the step with
    /// the current time; any other status clears the stamp, so re-completing
    /// later starts from scratch. Returns the updated step, or `None` when
    /// the step is unknown.
    pub async fn update_step(
        &self,
        step_id: &str,
        status: StepStatus,
        observations: &str,
    ) -> Result<Option<ProblemStep>> {
        let repository = self.repository()?;

        let completed_at = match status {
            StepStatus::Completed => Some(Utc::now().to_rfc3339()),
            _ => None,
        };

        let matched = repository
            .update_step(step_id, status, observations, completed_at.as_deref())
            .await?;
        if !matched {
            return Ok(None);
        }

        info!("Updated step {} to {}", step_id, status);
        repository.get_step(step_id).await
    }

    /// Set a problem's overall status. Returns the refreshed problem, or
    /// `None` when the problem is unknown. Resolving while steps are still
    /// open is allowed; it is only worth a warning.
    pub async fn update_problem_status(
        &self,
        problem_id: &str,
        status: ProblemStatus,
    ) -> Result<Option<Problem>> {
        let repository = self.repository()?;

        let matched = repository.update_problem_status(problem_id, status).await?;
        if !matched {
            return Ok(None);
        }

        let problem = repository.get_problem(problem_id).await?;

        if status == ProblemStatus::Resolved {
            if let Some(problem) = &problem {
                let open_steps = problem.steps.iter().filter(|s| !s.is_completed()).count();
                if open_steps > 0 {
                    warn!(
                        "Problem {} resolved with {} incomplete step(s)",
                        problem_id, open_steps
                    );
                }
            }
        }

        info!("Updated problem {} status to {}", problem_id, status);
        Ok(problem)
    }

    /// Replace a problem's description. Returns the refreshed problem, or
    /// `None` when the problem is unknown.
    pub async fn update_problem_description(
        &self,
        problem_id: &str,
        description: &str,
    ) -> Result<Option<Problem>> {
        let repository = self.repository()?;

        let matched = repository
            .update_problem_description(problem_id, description)
            .await?;
        if !matched {
            return Ok(None);
        }

        info!("Updated problem {} description", problem_id);
        repository.get_problem(problem_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> ProblemService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        ProblemService::new(Some(db))
    }

    #[tokio::test]
    async fn test_fresh_problem_has_no_steps_and_is_open() {
        let service = setup_test().await;

        let id = service
            .create_problem("Fix sink", "Leaking pipe")
            .await
            .expect("Failed to create problem");

        let problem = service
            .get_problem(&id)
            .await
            .expect("Failed to get problem")
            .expect("Problem should exist");

        assert_eq!(problem.title, "Fix sink");
        assert_eq!(problem.status, ProblemStatus::Open);
        assert!(problem.steps.is_empty());
    }

    #[tokio::test]
    async fn test_fix_sink_scenario() {
        let service = setup_test().await;

        let problem_id = service
            .create_problem("Fix sink", "Leaking pipe")
            .await
            .expect("Failed to create problem");

        let step_id = service
            .create_step(&problem_id, "Buy wrench", "")
            .await
            .expect("Failed to create step");

        let problem = service
            .get_problem(&problem_id)
            .await
            .expect("Failed to get problem")
            .expect("Problem should exist");
        assert_eq!(problem.steps.len(), 1);
        let step = &problem.steps[0];
        assert_eq!(step.id, step_id);
        assert_eq!(step.description, "Buy wrench");
        assert_eq!(step.status, StepStatus::Pending);
        assert!(!step.completed);

        let updated = service
            .update_step(&step_id, StepStatus::Completed, "Done at hardware store")
            .await
            .expect("Failed to update step")
            .expect("Step should exist");
        assert_eq!(updated.status, StepStatus::Completed);
        assert!(updated.completed);
        assert_eq!(updated.observations, "Done at hardware store");
        assert!(updated.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_appending_steps_preserves_creation_order() {
        let service = setup_test().await;

        let problem_id = service
            .create_problem("Organize desk", "")
            .await
            .expect("Failed to create problem");

        let mut expected = Vec::new();
        for i in 1..=3 {
            let description = format!("Step {}", i);
            service
                .create_step(&problem_id, &description, "")
                .await
                .expect("Failed to create step");
            expected.push(description);
        }

        let problem = service
            .get_problem(&problem_id)
            .await
            .expect("Failed to get problem")
            .expect("Problem should exist");

        let descriptions: Vec<String> =
            problem.steps.iter().map(|s| s.description.clone()).collect();
        assert_eq!(descriptions, expected);
    }

    #[tokio::test]
    async fn test_step_for_unknown_problem_is_rejected() {
        let service = setup_test().await;

        let result = service.create_step("does-not-exist", "Orphan step", "").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_reverting_completion_clears_timestamp() {
        let service = setup_test().await;

        let problem_id = service
            .create_problem("Fix sink", "")
            .await
            .expect("Failed to create problem");
        let step_id = service
            .create_step(&problem_id, "Buy wrench", "")
            .await
            .expect("Failed to create step");

        service
            .update_step(&step_id, StepStatus::Completed, "")
            .await
            .expect("Failed to complete step");

        let reverted = service
            .update_step(&step_id, StepStatus::Pending, "")
            .await
            .expect("Failed to revert step")
            .expect("Step should exist");
        assert_eq!(reverted.status, StepStatus::Pending);
        assert!(!reverted.completed);
        assert!(reverted.completed_at.is_none(), "Reverting erases the completion time");
    }

    #[tokio::test]
    async fn test_resolving_with_open_steps_is_allowed() {
        let service = setup_test().await;

        let problem_id = service
            .create_problem("Fix sink", "")
            .await
            .expect("Failed to create problem");
        service
            .create_step(&problem_id, "Buy wrench", "")
            .await
            .expect("Failed to create step");

        let problem = service
            .update_problem_status(&problem_id, ProblemStatus::Resolved)
            .await
            .expect("Failed to update status")
            .expect("Problem should exist");
        assert_eq!(problem.status, ProblemStatus::Resolved);
    }

    #[tokio::test]
    async fn test_updates_on_unknown_problem_return_none() {
        let service = setup_test().await;

        let status = service
            .update_problem_status("missing", ProblemStatus::Resolved)
            .await
            .expect("Query failed");
        assert!(status.is_none());

        let description = service
            .update_problem_description("missing", "text")
            .await
            .expect("Query failed");
        assert!(description.is_none());
    }

    #[tokio::test]
    async fn test_degraded_mode_without_storage() {
        let service = ProblemService::new(None);

        assert!(service.list_problems().await.is_empty());
        assert!(service
            .get_problem("any")
            .await
            .expect("Reads degrade, not fail")
            .is_none());
        assert!(service.create_problem("Fix sink", "").await.is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed catalog entry for a daily habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Free-form key into the client-side icon lookup; unknown keys render a generic icon
    pub icon: String,
}

/// Proof that a habit was completed on a specific calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub habit_id: String,
    /// Calendar day in YYYY-MM-DD form (UTC)
    pub date: String,
    /// Completion timestamp (RFC 3339)
    pub completed_at: String,
}

/// Overall status of a tracked problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemStatus {
    Open,
    InProgress,
    Resolved,
}

impl ProblemStatus {
    /// Storage/wire form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemStatus::Open => "open",
            ProblemStatus::InProgress => "in_progress",
            ProblemStatus::Resolved => "resolved",
        }
    }

    /// Parse the storage form; unknown values fall back to `Open`
    pub fn parse(value: &str) -> Self {
        match value {
            "in_progress" => ProblemStatus::InProgress,
            "resolved" => ProblemStatus::Resolved,
            _ => ProblemStatus::Open,
        }
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a single step within a problem's resolution plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
}

impl StepStatus {
    /// Storage/wire form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
        }
    }

    /// Parse the storage form; rows written before the status column existed
    /// carry only the legacy boolean, so absent/unknown values fall back to it.
    pub fn from_row(status: Option<&str>, legacy_completed: bool) -> Self {
        match status {
            Some("pending") => StepStatus::Pending,
            Some("in_progress") => StepStatus::InProgress,
            Some("completed") => StepStatus::Completed,
            _ => {
                if legacy_completed {
                    StepStatus::Completed
                } else {
                    StepStatus::Pending
                }
            }
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of work with a resolution plan made of steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ProblemStatus,
    /// Creation timestamp (RFC 3339), set once
    pub created_at: String,
    /// Full step collection; empty placeholder in list views
    pub steps: Vec<ProblemStep>,
}

/// One action item within a problem's resolution plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStep {
    pub id: String,
    pub problem_id: String,
    pub description: String,
    pub status: StepStatus,
    /// Legacy boolean view of completion, derived from `status`
    pub completed: bool,
    pub observations: String,
    /// Set when status becomes completed, cleared on any other transition
    pub completed_at: Option<String>,
}

impl ProblemStep {
    /// Whether this step's status counts as completed
    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }
}

// ---------------------------------------------------------------------------
// Request/response DTOs for the REST API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitListResponse {
    pub habits: Vec<Habit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryListResponse {
    pub records: Vec<HistoryRecord>,
}

/// Result of toggling a habit for today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleHabitResponse {
    pub habit_id: String,
    /// The day the toggle applied to (YYYY-MM-DD, UTC)
    pub date: String,
    /// Whether the habit is completed for that day after the toggle
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemListResponse {
    pub problems: Vec<Problem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProblemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProblemResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStepRequest {
    pub description: String,
    #[serde(default)]
    pub observations: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStepResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStepRequest {
    pub status: StepStatus,
    #[serde(default)]
    pub observations: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProblemStatusRequest {
    pub status: ProblemStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProblemDescriptionRequest {
    pub description: String,
}

/// Short text produced from a voice note; empty when no suggestion is available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_status_wire_form() {
        let json = serde_json::to_string(&StepStatus::InProgress).expect("serialize status");
        assert_eq!(json, "\"in_progress\"");

        let parsed: StepStatus = serde_json::from_str("\"completed\"").expect("parse status");
        assert_eq!(parsed, StepStatus::Completed);
    }

    #[test]
    fn test_step_status_legacy_backfill() {
        // Rows written before the status column existed only have the boolean
        assert_eq!(StepStatus::from_row(None, true), StepStatus::Completed);
        assert_eq!(StepStatus::from_row(None, false), StepStatus::Pending);

        // An explicit status wins over the legacy boolean
        assert_eq!(StepStatus::from_row(Some("in_progress"), true), StepStatus::InProgress);
        assert_eq!(StepStatus::from_row(Some("garbage"), true), StepStatus::Completed);
    }

    #[test]
    fn test_problem_status_parse_defaults_to_open() {
        assert_eq!(ProblemStatus::parse("resolved"), ProblemStatus::Resolved);
        assert_eq!(ProblemStatus::parse("unknown"), ProblemStatus::Open);
    }
}

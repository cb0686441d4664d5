//! # Domain Module
//!
//! Business logic for the daily tracker, independent of the HTTP layer.
//!
//! - **habit_service**: the daily habit catalog and its completion log
//! - **problem_service**: problems and their resolution plans
//! - **suggestion_service**: adapter for the external voice-note suggestion API
//!
//! Services take an optional [`DbConnection`](crate::storage::DbConnection);
//! when storage is not configured, reads degrade (seed catalog, empty lists)
//! and writes fail, so the process never dies over a missing database.

pub mod habit_service;
pub mod problem_service;
pub mod suggestion_service;

pub use habit_service::HabitService;
pub use problem_service::ProblemService;
pub use suggestion_service::SuggestionService;

//! # Storage Module
//!
//! Data persistence for the daily tracker. A single [`DbConnection`] wraps
//! the SQLite pool; repositories own all SQL for their table family. The
//! schema is bootstrapped idempotently on connect, and the habit catalog is
//! seeded exactly once behind a marker row.

pub mod db;
pub mod habit_repository;
pub mod problem_repository;

pub use db::{seed_catalog, DbConnection};
pub use habit_repository::HabitRepository;
pub use problem_repository::ProblemRepository;

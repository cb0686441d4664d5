//! # REST API Interface Layer
//!
//! HTTP endpoints for the daily tracker. This layer only translates between
//! HTTP and the domain services: JSON (de)serialization, status-code mapping,
//! presence checks, and request logging. No business logic lives here.

pub mod habit_apis;
pub mod problem_apis;
pub mod suggestion_apis;

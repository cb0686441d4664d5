//! # IO Module
//!
//! The interface layer between clients and the domain logic. Currently a
//! single REST adapter built on axum; the domain layer underneath is
//! transport-agnostic.

pub mod rest;

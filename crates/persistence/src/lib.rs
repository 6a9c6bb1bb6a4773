//! Persistence layer for the Taskhive backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod repositories;

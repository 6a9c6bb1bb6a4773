//! Domain layer for the Taskhive backend.
//!
//! This crate contains:
//! - Domain models (Team, Membership, PendingMember, Todo, UserProfile)
//! - Request/response DTOs with validation

pub mod models;

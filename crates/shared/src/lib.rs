//! Shared utilities and common types for the Taskhive backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Team join identifier generation (salted hashing)
//! - JWT token utilities

pub mod identifier;
pub mod jwt;

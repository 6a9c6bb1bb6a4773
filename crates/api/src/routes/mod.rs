//! HTTP route handlers.

pub mod health;
pub mod profile;
pub mod teams;
pub mod todos;

//! Application services.

pub mod team_cache;

pub use team_cache::TeamCache;

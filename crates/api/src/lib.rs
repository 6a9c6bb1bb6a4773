pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod routes;
pub mod services;

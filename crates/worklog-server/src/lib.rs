//! Worklog Server Library
//!
//! This crate provides the worklog HTTP service: an in-memory log store,
//! the service layer that validates and mutates it, and the axum router
//! that exposes logs and summaries.

pub mod config;
pub mod http;
pub mod metrics;
pub mod service;
pub mod state;

pub use config::Config;
pub use service::LogService;
pub use state::AppState;

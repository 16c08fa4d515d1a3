//! Service layer between the HTTP handlers and the log store.

pub mod log_service;

pub use log_service::LogService;

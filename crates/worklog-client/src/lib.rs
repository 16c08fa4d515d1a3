//! Client library for the worklog HTTP service.
//!
//! Wraps every route of the service in a typed async method. Request and
//! response bodies are the types from `worklog-core`.

pub mod error;
pub mod http;

pub use error::ClientError;
pub use http::WorklogClient;

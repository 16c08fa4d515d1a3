//! Server configuration.

/// Origins the bundled web UI is served from in development.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:4173", "http://localhost:5173"];

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address.
    pub bind_addr: String,

    /// Origins allowed by CORS. Requests from other origins get no CORS
    /// headers.
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Builder method to replace the allowed origins.
    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

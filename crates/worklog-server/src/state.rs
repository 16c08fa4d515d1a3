//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use worklog_core::{Log, LogId};

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// Logs indexed by LogId.
    pub logs: RwLock<HashMap<LogId, Log>>,

    /// Configuration the server was started with.
    pub config: Config,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a new AppState with the given configuration.
    pub fn with_config(config: Config) -> Arc<Self> {
        Arc::new(Self {
            logs: RwLock::new(HashMap::new()),
            config,
        })
    }

    /// Get the number of stored logs.
    #[cfg(test)]
    pub(crate) async fn log_count(&self) -> usize {
        self.logs.read().await.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
            config: Config::default(),
        }
    }
}

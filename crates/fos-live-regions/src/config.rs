//! Monitor Configuration

use serde::{Deserialize, Serialize};

/// Live region monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Deepest ancestor chain or subtree walked for one event
    pub max_depth: usize,
    /// Only accept events from visible windows in the foreground hierarchy
    pub require_foreground: bool,
    /// Process events at all
    pub enabled: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            require_foreground: true,
            enabled: true,
        }
    }
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_require_foreground(mut self, require: bool) -> Self {
        self.require_foreground = require;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

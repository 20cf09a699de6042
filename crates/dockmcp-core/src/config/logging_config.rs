//! Logging configuration

use crate::error::{DockmcpError, DockmcpResult};
use serde::{Deserialize, Serialize};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, compact, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Merge with another logging config
    pub fn merge(&mut self, other: LoggingConfig) {
        if !other.level.is_empty() {
            self.level = other.level;
        }

        if !other.format.is_empty() {
            self.format = other.format;
        }
    }

    /// Check level and format against the supported values
    pub fn validate(&self) -> DockmcpResult<()> {
        if !LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(DockmcpError::config(format!(
                "Unknown log level '{}'",
                self.level
            )));
        }

        if !FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(DockmcpError::config(format!(
                "Unknown log format '{}' (expected pretty, compact or json)",
                self.format
            )));
        }

        Ok(())
    }
}

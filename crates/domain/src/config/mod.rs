mod chat;
mod llm;
mod observability;
mod server;

pub use chat::*;
pub use llm::*;
pub use observability::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn error(field: &str, message: &str) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: &str) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError::error(
                "server.port",
                "port must be greater than 0",
            ));
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError::error("server.host", "host must not be empty"));
        }

        if self.server.cors.allowed_origins.is_empty() {
            errors.push(ConfigError::warning(
                "server.cors.allowed_origins",
                "no origins listed; browsers will reject cross-origin calls",
            ));
        }

        if self.llm.base_url.is_empty() {
            errors.push(ConfigError::error(
                "llm.base_url",
                "base_url must not be empty",
            ));
        }

        if self.llm.model.is_empty() {
            errors.push(ConfigError::error("llm.model", "model must not be empty"));
        }

        if self.llm.api_key_env.is_empty() {
            errors.push(ConfigError::error(
                "llm.api_key_env",
                "api_key_env must name an environment variable",
            ));
        }

        // One exchange is two turns; anything smaller would drop the
        // reply that was just stored.
        if self.chat.max_turns < 2 {
            errors.push(ConfigError::error(
                "chat.max_turns",
                "max_turns must be at least 2",
            ));
        }

        if self.chat.default_session_id.is_empty() {
            errors.push(ConfigError::error(
                "chat.default_session_id",
                "default_session_id must not be empty",
            ));
        }

        if self.chat.upstream_failure == UpstreamFailurePolicy::Surface {
            errors.push(ConfigError::warning(
                "chat.upstream_failure",
                "upstream failures return HTTP 502 instead of an apology reply",
            ));
        }

        errors
    }
}

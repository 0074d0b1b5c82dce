mod card;
mod links;
mod observability;
mod server;
mod upstream;

pub use card::*;
pub use links::*;
pub use observability::*;
pub use server::*;
pub use upstream::*;

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
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub card: CardConfig,
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
    /// An `Error`-severity issue aborts startup; this is the only
    /// unrecoverable failure mode in the whole service.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.port".into(),
                message: "port must be greater than 0".into(),
            });
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.host".into(),
                message: "host must not be empty".into(),
            });
        }

        if self.server.public_base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.public_base_url".into(),
                message: "public_base_url must not be empty".into(),
            });
        }

        for (field, value) in [
            ("upstream.points_base_url", &self.upstream.points_base_url),
            (
                "upstream.allowance_base_url",
                &self.upstream.allowance_base_url,
            ),
            ("upstream.identity_base_url", &self.upstream.identity_base_url),
        ] {
            if value.is_empty() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: field.into(),
                    message: "base URL must not be empty".into(),
                });
            }
        }

        // The hub credential is required to resolve interactors; without it
        // the "My State" path cannot work at all, so boot refuses to start.
        if self.upstream.resolve_hub_api_key().is_none() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "upstream.hub_api_key".into(),
                message: format!(
                    "hub API key missing — set upstream.hub_api_key or the {} env var",
                    self.upstream.hub_api_key_env
                ),
            });
        }

        if self.upstream.timeout_ms == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "upstream.timeout_ms".into(),
                message: "timeout must be greater than 0".into(),
            });
        }

        if let Some(0) = self.links.max_entries {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "links.max_entries".into(),
                message: "max_entries must be greater than 0 when set".into(),
            });
        }

        if self.links.max_entries.is_none() && self.links.ttl_minutes.is_none() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "links".into(),
                message: "link store is unbounded — entries live for the process lifetime".into(),
            });
        }

        if self.server.cors.allowed_origins.len() == 1
            && self.server.cors.allowed_origins[0] == "*"
        {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "server.cors.allowed_origins".into(),
                message: "wildcard \"*\" allows all origins (not recommended for production)"
                    .into(),
            });
        }

        errors
    }
}

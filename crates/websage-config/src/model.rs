// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the WebSage gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelt key is
//! reported at startup instead of silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level WebSage configuration.
///
/// Loaded once at process start and never mutated afterwards.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebsageConfig {
    /// Analysis backend location and credentials.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Gateway HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analysis backend configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the analysis backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Shared secret sent as a bearer credential. `None` leaves the gateway
    /// misconfigured: protected routes answer 500 and listing degrades to `[]`.
    #[serde(default)]
    pub shared_secret: Option<String>,
}

impl BackendConfig {
    /// The shared secret, treating an empty or whitespace-only value as unset.
    pub fn shared_secret(&self) -> Option<&str> {
        self.shared_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            shared_secret: None,
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field(
                "shared_secret",
                &self.shared_secret.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

/// Gateway listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level for websage crates (trace, debug, info, warn, error).
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use url::Url;

use crate::diagnostic::ConfigError;
use crate::model::WebsageConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first. A missing shared
/// secret is not an error here; the proxy reports it per request.
pub fn validate_config(config: &WebsageConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Err(message) = check_base_url(&config.backend.base_url) {
        errors.push(ConfigError::Validation { message });
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::Validation {
            message: format!("server.host `{host}` is not a valid IP address or hostname"),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` must be one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw.trim())
        .map_err(|e| format!("backend.base_url `{raw}` is not a valid URL: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!(
            "backend.base_url `{raw}` must use http or https, got `{}`",
            url.scheme()
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("backend.base_url `{raw}` has no host"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&WebsageConfig::default()).is_ok());
    }

    #[test]
    fn missing_secret_is_not_a_validation_error() {
        let config = WebsageConfig::default();
        assert!(config.backend.shared_secret().is_none());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn relative_base_url_fails() {
        let mut config = WebsageConfig::default();
        config.backend.base_url = "localhost:8000/api".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "backend.base_url"));
    }

    #[test]
    fn non_http_scheme_fails() {
        let mut config = WebsageConfig::default();
        config.backend.base_url = "ftp://backend.internal".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "http or https"));
    }

    #[test]
    fn errors_are_collected_not_short_circuited() {
        let mut config = WebsageConfig::default();
        config.backend.base_url = "nope".to_string();
        config.server.host = "  ".to_string();
        config.logging.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "logging.level"));
        assert!(has_error(&errors, "server.host"));
    }

    #[test]
    fn hostname_and_ipv6_hosts_pass() {
        let mut config = WebsageConfig::default();
        config.server.host = "gateway.internal".to_string();
        assert!(validate_config(&config).is_ok());
        config.server.host = "::1".to_string();
        assert!(validate_config(&config).is_ok());
    }
}

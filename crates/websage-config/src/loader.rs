// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Search order: `/etc/websage/websage.toml` < `~/.config/websage/websage.toml`
//! < `./websage.toml`, then environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::WebsageConfig;

/// Config files consulted by [`load_config`], lowest precedence first.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/websage/websage.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("websage/websage.toml"));
    }
    paths.push(PathBuf::from("websage.toml"));
    paths
}

/// Build the Figment used for config loading, before extraction.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. The files from [`config_file_paths`]
/// 3. Legacy `BACKEND_URL` / `API_SECRET_KEY` variables
/// 4. `WEBSAGE_*` environment variables
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(WebsageConfig::default()));
    for path in config_file_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(legacy_env_provider()).merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<WebsageConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<WebsageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WebsageConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WebsageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WebsageConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// `WEBSAGE_<SECTION>_<KEY>` variables.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `WEBSAGE_BACKEND_SHARED_SECRET` must become
/// `backend.shared_secret`, not `backend.shared.secret`.
fn env_provider() -> Env {
    Env::prefixed("WEBSAGE_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("backend_", "backend.", 1)
            .replacen("server_", "server.", 1)
            .replacen("logging_", "logging.", 1)
            .into()
    })
}

/// The unprefixed variables the web front end has always used.
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&["BACKEND_URL", "API_SECRET_KEY"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "backend_url" => "backend.base_url".into(),
            "api_secret_key" => "backend.shared_secret".into(),
            other => other.to_string().into(),
        })
}

// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated pass-through to the analysis backend.
//!
//! [`BackendProxy`] implements [`AnalysisBackend`]: it attaches the shared
//! secret as a bearer token, forwards bodies byte-for-byte, and hands back the
//! upstream status and body untouched. The secret never leaves this crate.

pub mod client;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use secrecy::SecretString;
use tracing::{error, warn};

use websage_config::model::BackendConfig;
use websage_core::{AnalysisBackend, ProxyResponse, Resource, WebsageError};

pub use client::BackendClient;

/// The production [`AnalysisBackend`].
pub struct BackendProxy {
    client: BackendClient,
    secret: Option<SecretString>,
}

impl BackendProxy {
    /// Creates a proxy for `base_url`. A blank secret counts as absent.
    pub fn new(base_url: &str, shared_secret: Option<&str>) -> Result<Self, WebsageError> {
        let secret = shared_secret
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| SecretString::from(s.to_string()));
        if secret.is_none() {
            warn!("no shared secret configured, backend calls will be refused");
        }
        Ok(Self {
            client: BackendClient::new(base_url)?,
            secret,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, WebsageError> {
        Self::new(&config.base_url, config.shared_secret())
    }

    /// Scheme and host of the backend, for error reports.
    pub fn backend_host(&self) -> &str {
        self.client.backend_host()
    }

    fn secret(&self, resource: Resource) -> Result<&SecretString, WebsageError> {
        self.secret.as_ref().ok_or_else(|| {
            error!(%resource, "refusing to forward: shared secret missing");
            WebsageError::ServerMisconfigured
        })
    }

    async fn forward(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Bytes>,
        resource: Resource,
    ) -> Result<ProxyResponse, WebsageError> {
        let secret = self.secret(resource)?;
        self.client
            .send(method, segments, secret, body, resource)
            .await
    }
}

impl std::fmt::Debug for BackendProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendProxy")
            .field("backend", &self.client.backend_host())
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[async_trait]
impl AnalysisBackend for BackendProxy {
    async fn forward_analyze(&self, body: Bytes) -> Result<ProxyResponse, WebsageError> {
        self.forward(Method::POST, &["analyze"], Some(body), Resource::Analyze)
            .await
    }

    async fn forward_list_sessions(&self) -> Result<ProxyResponse, WebsageError> {
        if self.secret.is_none() {
            warn!("shared secret missing, reporting an empty session list");
            return Ok(ProxyResponse::empty_list());
        }
        self.forward(
            Method::GET,
            &["analyze", "sessions"],
            None,
            Resource::SessionList,
        )
        .await
    }

    async fn forward_get_session_detail(&self, id: &str) -> Result<ProxyResponse, WebsageError> {
        self.forward(
            Method::GET,
            &["analyze", "sessions", id],
            None,
            Resource::SessionDetail,
        )
        .await
    }

    async fn forward_converse(&self, body: Bytes) -> Result<ProxyResponse, WebsageError> {
        self.forward(Method::POST, &["converse"], Some(body), Resource::Converse)
            .await
    }

    async fn forward_get_history(
        &self,
        session_id: &str,
    ) -> Result<ProxyResponse, WebsageError> {
        self.forward(
            Method::GET,
            &["converse", "history", session_id],
            None,
            Resource::History,
        )
        .await
    }

    fn is_configured(&self) -> bool {
        self.secret.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_secret_is_unconfigured() {
        let proxy = BackendProxy::new("http://localhost:8000", Some("   ")).unwrap();
        assert!(!proxy.is_configured());
        let proxy = BackendProxy::new("http://localhost:8000", Some("k")).unwrap();
        assert!(proxy.is_configured());
    }

    #[test]
    fn debug_redacts_secret() {
        let proxy = BackendProxy::new("http://localhost:8000", Some("hunter2")).unwrap();
        let out = format!("{proxy:?}");
        assert!(!out.contains("hunter2"));
        assert!(out.contains("REDACTED"));
    }

    #[test]
    fn from_config_uses_backend_section() {
        let config = BackendConfig {
            base_url: "http://analysis:9000".into(),
            shared_secret: Some("k".into()),
        };
        let proxy = BackendProxy::from_config(&config).unwrap();
        assert_eq!(proxy.backend_host(), "http://analysis:9000");
    }
}

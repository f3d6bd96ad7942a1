// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the analysis backend.
//!
//! [`BackendClient`] owns the connection pool and URL construction. It sends
//! exactly one request per call and never retries.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;
use tracing::{debug, warn};
use url::Url;

use websage_core::{ProxyResponse, Resource, WebsageError};

/// Low-level HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
    backend_host: String,
}

impl BackendClient {
    /// Creates a client for `base_url`.
    ///
    /// Every request carries `Cache-Control: no-store` so intermediaries never
    /// serve a stale backend state.
    pub fn new(base_url: &str) -> Result<Self, WebsageError> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            WebsageError::Config(format!("invalid backend base URL `{base_url}`: {e}"))
        })?;
        if base_url.cannot_be_a_base() || base_url.host_str().is_none() {
            return Err(WebsageError::Config(format!(
                "backend base URL `{base_url}` cannot carry a path"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| WebsageError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            backend_host: host_of(&base_url),
            base_url,
        })
    }

    /// Scheme, host, and port of the backend. Safe to show to clients.
    pub fn backend_host(&self) -> &str {
        &self.backend_host
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, WebsageError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| WebsageError::Config("backend base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one authenticated request and returns the upstream status and body.
    ///
    /// A body that is not JSON is replaced by the resource's empty shape; the
    /// status is kept as received.
    pub async fn send(
        &self,
        method: Method,
        segments: &[&str],
        secret: &SecretString,
        body: Option<Bytes>,
        resource: Resource,
    ) -> Result<ProxyResponse, WebsageError> {
        let url = self.endpoint(segments)?;
        debug!(%resource, %method, path = url.path(), "forwarding to backend");

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(secret.expose_secret());
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        let response = request.send().await.map_err(|e| self.unreachable(e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.unreachable(e))?;
        debug!(%resource, status, bytes = body.len(), "backend responded");

        let body = if serde_json::from_slice::<IgnoredAny>(&body).is_ok() {
            body
        } else {
            warn!(%resource, status, "backend body is not JSON, substituting empty value");
            resource.fallback_body()
        };

        Ok(ProxyResponse::new(status, body))
    }

    fn unreachable(&self, err: reqwest::Error) -> WebsageError {
        let message = error_chain(&err);
        warn!(backend = %self.backend_host, error = %message, "analysis backend unreachable");
        WebsageError::UpstreamUnreachable {
            backend_url: self.backend_host.clone(),
            message,
            source: Some(Box::new(err)),
        }
    }
}

/// `scheme://host[:port]`, dropping any userinfo, path, or query.
fn host_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    }
}

/// Joins an error with its sources; reqwest's top-level message alone is vague.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn secret() -> SecretString {
        SecretString::from("test-secret".to_string())
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let client = BackendClient::new("http://backend:8000/api/").unwrap();
        let url = client.endpoint(&["analyze", "sessions"]).unwrap();
        assert_eq!(url.as_str(), "http://backend:8000/api/analyze/sessions");
    }

    #[test]
    fn endpoint_encodes_path_parameters() {
        let client = BackendClient::new("http://backend:8000").unwrap();
        let url = client.endpoint(&["analyze", "sessions", "../admin?x=1"]).unwrap();
        assert_eq!(url.path(), "/analyze/sessions/..%2Fadmin%3Fx=1");
        assert!(url.query().is_none());
    }

    #[test]
    fn backend_host_drops_credentials_and_path() {
        let client = BackendClient::new("https://user:pw@backend.example:9443/v1").unwrap();
        assert_eq!(client.backend_host(), "https://backend.example:9443");
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            BackendClient::new("mailto:ops@example.com"),
            Err(WebsageError::Config(_))
        ));
        assert!(matches!(
            BackendClient::new("not a url"),
            Err(WebsageError::Config(_))
        ));
    }

    #[tokio::test]
    async fn send_sets_bearer_cache_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/converse"))
            .and(header("authorization", "Bearer test-secret"))
            .and(header("cache-control", "no-store"))
            .and(header("content-type", "application/json"))
            .and(body_bytes(br#"{"query":"hi","extra":[1,2]}"#.to_vec()))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = BackendClient::new(&server.uri()).unwrap();
        let resp = client
            .send(
                Method::POST,
                &["converse"],
                &secret(),
                Some(Bytes::from_static(br#"{"query":"hi","extra":[1,2]}"#)),
                Resource::Converse,
            )
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(&resp.body[..], br#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn non_json_body_is_replaced_but_status_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/converse/history/s1"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = BackendClient::new(&server.uri()).unwrap();
        let resp = client
            .send(Method::GET, &["converse", "history", "s1"], &secret(), None, Resource::History)
            .await
            .unwrap();
        assert_eq!(resp.status, 502);
        assert_eq!(&resp.body[..], b"[]");
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = BackendClient::new(&format!("http://127.0.0.1:{port}")).unwrap();
        let err = client
            .send(Method::GET, &["analyze", "sessions"], &secret(), None, Resource::SessionList)
            .await
            .unwrap_err();
        match err {
            WebsageError::UpstreamUnreachable { backend_url, message, .. } => {
                assert_eq!(backend_url, format!("http://127.0.0.1:{port}"));
                assert!(!message.contains("test-secret"));
            }
            other => panic!("expected UpstreamUnreachable, got {other:?}"),
        }
    }
}

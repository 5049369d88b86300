//! HTTP transport
//!
//! [`HttpSession`] keeps one connection-pooling `reqwest::Client` for the
//! whole run. Steps only see the [`Transport`] trait so they can be driven
//! against a fake in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use crate::common::{Error, Result};

use super::types::{ApiRequest, ApiResponse, Method};

/// Something that can carry an [`ApiRequest`] to the server under test
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request
    ///
    /// Returns `Ok` for every HTTP status; `Err` only when the server
    /// could not be reached.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;

    async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.execute(ApiRequest::new(Method::Get, path)).await
    }

    async fn post(
        &self,
        path: &str,
        body: Option<Value>,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let mut request = ApiRequest::new(Method::Post, path);
        for (key, value) in query {
            request = request.with_query(*key, *value);
        }
        request.body = body;
        self.execute(request).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        let mut request = ApiRequest::new(Method::Put, path);
        request.body = body;
        self.execute(request).await
    }
}

/// Persistent HTTP session bound to a base URL
pub struct HttpSession {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpSession {
    /// Create a session for `base_url`
    ///
    /// The URL must be absolute `http` or `https`. A trailing slash is
    /// dropped so request paths can always start with `/`. The timeout
    /// must be at least one second.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        if timeout_secs == 0 {
            return Err(Error::Config(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        let parsed = Url::parse(base_url).map_err(|_| Error::InvalidUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(Error::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("crop-smoke/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn map_send_error(&self, url: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            Error::connection(url, e)
        }
    }
}

#[async_trait]
impl Transport for HttpSession {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, %url, "sending request");

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_send_error(&url, e))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_send_error(&url, e))?;

        tracing::debug!(method = %request.method, %url, status, bytes = text.len(), "received response");

        Ok(ApiResponse::from_text(status, text))
    }
}

//! HTTP Transport Layer
//!
//! This module defines the transport abstraction used to reach the API.
//! The transport is responsible only for carrying requests and surfacing
//! status plus body text; endpoint semantics (auth exchange, document
//! submission) live in the layers above it.

use crate::config::ClientConfig;

/// Maximum body bytes quoted in error messages and logs
const BODY_EXCERPT_LEN: usize = 256;

/// Response surfaced by the transport
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Bounded body excerpt safe to embed in error messages
    pub fn body_excerpt(&self) -> String {
        if self.body.len() <= BODY_EXCERPT_LEN {
            return self.body.clone();
        }
        let mut end = BODY_EXCERPT_LEN;
        while !self.body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &self.body[..end])
    }
}

/// Error from the HTTP transport
///
/// Carries the URL and a failure description rather than any HTTP crate's
/// error type, so alternative transports can produce it too.
#[derive(Debug, thiserror::Error)]
#[error("Request to {url} failed: {reason}")]
pub struct TransportError {
    /// Request URL
    pub url: String,

    /// Failure description
    pub reason: String,
}

impl TransportError {
    /// Create a transport error for the given URL
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Transport trait for API communication
///
/// All transports must implement this trait, enabling the client to work
/// with the real HTTP stack or with test doubles.
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Send a GET request
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, TransportError>;

    /// Send a POST request with a form-urlencoded body
    async fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
        bearer: Option<&str>,
    ) -> Result<HttpResponse, TransportError>;

    /// Send a POST request with a multipart/form-data body of text parts
    async fn post_multipart(
        &self,
        url: &str,
        parts: &[(&str, &str)],
        bearer: Option<&str>,
    ) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport used by the real client
pub struct ReqwestTransport {
    /// Shared HTTP client with connection pooling
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the configured timeouts
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Drain a reqwest response into status plus body text
    async fn read_response(
        url: &str,
        response: reqwest::Response,
    ) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        tracing::debug!("Response from {}: status {}", url, status);

        Ok(HttpResponse { status, body })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, TransportError> {
        tracing::debug!("Sending GET to {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        Self::read_response(url, response).await
    }

    async fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
        bearer: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        tracing::debug!("Sending form POST to {}", url);

        let mut request = self.client.post(url).form(fields);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        Self::read_response(url, response).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        parts: &[(&str, &str)],
        bearer: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        tracing::debug!("Sending multipart POST to {}", url);

        let mut form = reqwest::multipart::Form::new();
        for (name, value) in parts {
            form = form.text(name.to_string(), value.to_string());
        }

        let mut request = self.client.post(url).multipart(form);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        Self::read_response(url, response).await
    }
}

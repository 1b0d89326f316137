//! HTTP client trait and implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::ai::config::parse_var;
use crate::ai::ConfigError;
use crate::error::FetchError;

use super::charset::decode_bytes_to_utf8;
use super::DEFAULT_USER_AGENT;

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch a page and return its body decoded as text.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

/// Configuration for BrowserClient.
#[derive(Clone, Debug)]
pub struct BrowserClientBuilder {
    timeout: Option<Duration>,
    user_agent: String,
}

impl Default for BrowserClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserClientBuilder {
    /// Create a builder with a desktop browser identity and no timeout.
    pub fn new() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create a builder from environment variables.
    ///
    /// - `POTLUCK_FETCH_USER_AGENT`: override the browser User-Agent
    /// - `POTLUCK_FETCH_TIMEOUT_SECS`: request timeout in seconds (unset = none)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create a builder through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut builder = Self::new();

        if let Some(user_agent) = var("POTLUCK_FETCH_USER_AGENT") {
            builder = builder.user_agent(user_agent);
        }

        if let Some(secs) = parse_var::<u64, _>(&var, "POTLUCK_FETCH_TIMEOUT_SECS")? {
            builder = builder.timeout(Some(Duration::from_secs(secs)));
        }

        Ok(builder)
    }

    /// Set the request timeout. None waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Build the BrowserClient.
    pub fn build(self) -> Result<BrowserClient, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(BrowserClient {
            inner: builder.build()?,
        })
    }
}

/// Production HTTP client that presents itself as a desktop browser.
///
/// Some recipe sites refuse requests from obvious bots, so the default
/// User-Agent mimics Chrome.
pub struct BrowserClient {
    inner: reqwest::Client,
}

impl BrowserClient {
    /// Create a new BrowserClient with default configuration.
    pub fn new() -> Result<Self, reqwest::Error> {
        BrowserClientBuilder::new().build()
    }

    /// Get a builder for custom configuration.
    pub fn builder() -> BrowserClientBuilder {
        BrowserClientBuilder::new()
    }
}

/// Whether a Content-Type header value describes something we can read as text.
pub fn is_text_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/")
        || mime.ends_with("+xml")
        || matches!(
            mime.as_str(),
            "application/xhtml+xml" | "application/xml" | "application/json"
        )
}

#[async_trait]
impl HttpClient for BrowserClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        tracing::debug!(url, "network: fetching");
        let response = self.inner.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = %status, "network: request failed");
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if let Some(ct) = &content_type {
            if !is_text_content_type(ct) {
                return Err(FetchError::NonTextResponse(ct.clone()));
            }
        }

        let bytes = response.bytes().await?;
        tracing::debug!(url, status = %status, bytes = bytes.len(), "network: fetched successfully");

        Ok(decode_bytes_to_utf8(&bytes, content_type.as_deref()))
    }
}

/// Mock response for testing.
#[derive(Clone)]
pub enum MockResponse {
    Html(String),
    Status(u16),
    Error(String),
}

/// Mock HTTP client for testing. Counts every fetch attempt.
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
    fetch_count: AtomicUsize,
}

impl MockClient {
    /// Create a new empty mock client.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Add a response for a URL.
    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    /// Add an HTML response for a URL.
    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with_response(url, MockResponse::Html(html.to_string()))
    }

    /// Add a non-success status for a URL.
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with_response(url, MockResponse::Status(status))
    }

    /// Add a transport error for a URL.
    pub fn with_error(self, url: &str, error: &str) -> Self {
        self.with_response(url, MockResponse::Error(error.to_string()))
    }

    /// Number of fetches attempted so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        match self.responses.get(url) {
            Some(MockResponse::Html(html)) => Ok(html.clone()),
            Some(MockResponse::Status(status)) => Err(FetchError::BadStatus {
                status: *status,
                url: url.to_string(),
            }),
            Some(MockResponse::Error(e)) => Err(FetchError::Transport(e.clone())),
            None => Err(FetchError::Transport(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}

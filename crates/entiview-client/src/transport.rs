//! HTTP transport seam
//!
//! The clients build a [`Request`] and hand it to a [`Transport`]. The
//! production implementation is [`HttpTransport`] over `reqwest`; tests
//! substitute a mock or point the real transport at a stub server.

use crate::config::ApiConfig;
use crate::dns::FallbackResolver;
use crate::error::{ConfigError, Rejection, TransportError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::Arc;

/// Longest server message carried into a [`Rejection`]
const MAX_MESSAGE_CHARS: usize = 200;

/// JSON fields that may carry a server error message, in priority order
const MESSAGE_FIELDS: [&str; 3] = ["error", "message", "detail"];

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

/// Transport-neutral request
///
/// `segments` are appended to the base URL as individually encoded path
/// segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Path segments below the base URL
    pub segments: Vec<String>,
    /// JSON body
    pub body: Option<Value>,
}

impl Request {
    /// GET request
    #[must_use]
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::Get,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
        }
    }

    /// POST request with a JSON body
    #[must_use]
    pub fn post<I, S>(segments: I, body: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::Post,
            segments: segments.into_iter().map(Into::into).collect(),
            body: Some(body),
        }
    }

    /// First path segment, safe to log
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.segments.first().map_or("", String::as_str)
    }
}

/// Status and body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase for the status
    pub reason: Option<String>,
    /// Body text
    pub body: String,
}

impl RawResponse {
    /// Create a response
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    /// With reason phrase
    #[inline]
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Check for a 2xx status
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Rejection carrying the server's own words where possible
    ///
    /// Looks for a string `error`, `message` or `detail` field in a JSON
    /// body, then the raw body text, then the reason phrase.
    #[must_use]
    pub fn rejection(&self) -> Rejection {
        Rejection::new(self.status, self.server_message())
    }

    fn server_message(&self) -> String {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&self.body) {
            let field = MESSAGE_FIELDS.iter().find_map(|key| match map.get(*key) {
                Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim()),
                _ => None,
            });
            if let Some(text) = field {
                return truncate(text);
            }
        }

        let body = self.body.trim();
        if !body.is_empty() {
            return truncate(body);
        }

        self.reason
            .clone()
            .unwrap_or_else(|| format!("HTTP {}", self.status))
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_MESSAGE_CHARS).collect()
}

/// Sends requests to the API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one exchange; no retries
    async fn send(&self, request: Request) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build the HTTP client from configuration
    ///
    /// Timeouts are bounded, DNS goes through [`FallbackResolver`], and no
    /// retry happens above connection establishment.
    ///
    /// # Errors
    /// - Any error from [`ApiConfig::validate`]
    /// - `ConfigError::Client` if the TLS backend cannot be initialized
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let base_url = config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.request_timeout())
            .dns_resolver(Arc::new(FallbackResolver::new(&config.dns_fallback)))
            .user_agent(concat!("entiview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ConfigError::Client(error_chain(&err)))?;

        tracing::debug!(base_url = %base_url, "http transport ready");
        Ok(Self { client, base_url })
    }

    /// Normalized base URL
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a request
    ///
    /// # Errors
    /// - `TransportError::InvalidTarget` if the base URL cannot take path segments
    pub fn url_for(&self, request: &Request) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidTarget(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<RawResponse, TransportError> {
        let url = self.url_for(&request)?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(endpoint = request.endpoint(), method = ?request.method, "sending request");
        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let reason = status.canonical_reason().map(str::to_string);
        let body = response.text().await.map_err(map_reqwest_error)?;

        tracing::debug!(endpoint = request.endpoint(), status = status.as_u16(), "response received");
        Ok(RawResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

/// The URL is stripped first; its last segment may be a keypass.
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    let timed_out = err.is_timeout();
    let detail = error_chain(&err.without_url());
    if timed_out {
        TransportError::Timeout(detail)
    } else {
        TransportError::Network(detail)
    }
}

/// Flatten an error and its sources into one line
fn error_chain(err: &dyn StdError) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.contains(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    detail
}

//! User API HTTP Client
//!
//! Thin wrapper over `reqwest` for the user REST API: builds absolute URLs
//! from the resolved domain, sends JSON, attaches the bearer token and maps
//! non-2xx responses to [`ApiError`]. One attempt per call, no retries.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::error::{parse_json_body, ApiError, ApiResult};

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the API, without trailing slash
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::domain::default_api_domain(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Raw session token sent as `Authorization: <token>`
    pub token: Option<String>,
    /// Extra headers
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying a bearer token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            headers: Vec::new(),
        }
    }

    /// Builder method: add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A completed response, body already read
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether the body is JSON (declared or recognizable)
    pub fn is_json(&self) -> bool {
        self.json_value().is_some()
    }

    /// Body parsed as a JSON value, if it is JSON
    pub fn json_value(&self) -> Option<serde_json::Value> {
        parse_json_body(self.content_type.as_deref(), &self.body)
    }

    /// Decode the body. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Turn a non-2xx response into an [`ApiError::Status`]
    pub fn error_for_status(self) -> ApiResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_response(
                self.status,
                self.content_type.as_deref(),
                &self.body,
            ))
        }
    }
}

/// User REST API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        let config = ClientConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> ApiResult<Url> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.config.base_url, path)
        } else {
            format!("{}/{}", self.config.base_url, path)
        };
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))
    }

    /// GET and decode a JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> ApiResult<T> {
        self.send(Method::GET, path, None::<&()>, options)
            .await?
            .error_for_status()?
            .json()
    }

    /// POST a JSON body and decode the JSON answer
    pub async fn post<B, T>(&self, path: &str, body: &B, options: &RequestOptions) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body), options)
            .await?
            .error_for_status()?
            .json()
    }

    /// PUT a JSON body. The raw response is returned so callers can tell
    /// `204 No Content` from a JSON answer.
    pub async fn put<B>(&self, path: &str, body: &B, options: &RequestOptions) -> ApiResult<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, Some(body), options)
            .await?
            .error_for_status()
    }

    /// Issue a single request and read the whole body
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> ApiResult<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("api_request", %request_id, %method, path = %path);

        async move {
            let mut request = self
                .client
                .request(method, url)
                .header(CONTENT_TYPE, "application/json");

            if let Some(token) = options.token.as_deref() {
                request = request.header(AUTHORIZATION, token);
            }
            for (name, value) in &options.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            tracing::debug!(authorized = options.token.is_some(), "Sending request");

            let response = request.send().await.map_err(ApiError::from_transport)?;
            let status = response.status();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.map_err(ApiError::from_transport)?;

            tracing::debug!(status = status.as_u16(), "Received response");

            Ok(ApiResponse {
                status,
                content_type,
                body,
            })
        }
        .instrument(span)
        .await
    }
}

//! REST client for the Fusion control plane.
//!
//! [`FusionClient`] speaks JSON to the public API. Resource payloads move
//! through it as untyped [`serde_json::Value`]s; the one resource the rest
//! of this crate cares about, the [`Operation`], is typed. Anything that
//! needs to fetch operations does so through the [`OperationsClient`]
//! trait, so tests can substitute fakes without touching global state.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

use crate::operation::Operation;

/// Public API root, appended to the configured endpoint.
const API_PREFIX: &str = "/api/1.2";

/// Structured errors the backend answers with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("400 Bad Request: {message}")]
    BadRequest { message: String },

    #[error("401 Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("403 Forbidden: {message}")]
    Forbidden { message: String },

    #[error("404 Not Found: {message}")]
    NotFound { message: String },

    #[error("409 Conflict: {message}")]
    Conflict { message: String },

    /// Any other non-success status.
    #[error("HTTP {code}: {message}")]
    Response { code: u16, message: String },
}

impl ApiError {
    /// Map an HTTP status and error body onto the taxonomy.
    #[must_use]
    pub fn from_status(code: u16, message: String) -> Self {
        match code {
            400 => ApiError::BadRequest { message },
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            409 => ApiError::Conflict { message },
            _ => ApiError::Response { code, message },
        }
    }

    /// The HTTP status this error was built from.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest { .. } => 400,
            ApiError::Unauthorized { .. } => 401,
            ApiError::Forbidden { .. } => 403,
            ApiError::NotFound { .. } => 404,
            ApiError::Conflict { .. } => 409,
            ApiError::Response { code, .. } => *code,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. } | ApiError::Forbidden { .. })
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status() >= 500
    }
}

/// Client-level failure, split by kind: the backend answered with a
/// structured API error, or the request never produced a usable response.
///
/// Callers that await operations depend on this split: API errors keep
/// their own type all the way up, transport errors get wrapped together
/// with the last-known operation state.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

/// Capability required to await operations: fetch one by id.
#[async_trait]
pub trait OperationsClient: Send + Sync {
    async fn get_operation(&self, id: &str) -> Result<Operation, ClientError>;
}

/// Authenticated client for one Fusion endpoint.
#[derive(Clone)]
pub struct FusionClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl FusionClient {
    pub fn builder() -> FusionClientBuilder {
        FusionClientBuilder::default()
    }

    /// Issue a request against an API path (e.g. `/operations/op1`) and
    /// decode the JSON response body.
    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        trace!(%method, %url, "sending request");

        let mut request = self.http.request(method, &url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            Ok(response.json::<Value>().await?)
        } else {
            let code = status.as_u16();
            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&text, status);
            debug!(code, %message, "API error response");
            Err(ApiError::from_status(code, message).into())
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.request(reqwest::Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.request(reqwest::Method::POST, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.request(reqwest::Method::PATCH, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.request(reqwest::Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.request(reqwest::Method::DELETE, path, None).await
    }

    /// List recent operations, newest first.
    pub async fn list_operations(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<Operation>, ClientError> {
        let path = match limit {
            Some(limit) => format!("/operations?limit={limit}"),
            None => "/operations".to_string(),
        };
        let value = self.get(&path).await?;
        // List endpoints wrap results in an "items" array.
        let items = value.get("items").cloned().unwrap_or(value);
        serde_json::from_value(items).map_err(|e| ClientError::Transport(Box::new(e)))
    }
}

#[async_trait]
impl OperationsClient for FusionClient {
    async fn get_operation(&self, id: &str) -> Result<Operation, ClientError> {
        let value = self.get(&format!("/operations/{id}")).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Transport(Box::new(e)))
    }
}

/// Builder for [`FusionClient`].
#[derive(Default)]
pub struct FusionClientBuilder {
    base_url: Option<String>,
    api_token: Option<String>,
    user_agent: Option<String>,
    insecure: bool,
    ca_cert: Option<String>,
}

impl FusionClientBuilder {
    /// Endpoint of the control plane, e.g. `https://fusion.example.com`.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Bearer token sent with every request.
    pub fn api_token(mut self, token: &str) -> Self {
        self.api_token = Some(token.to_string());
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Skip TLS certificate verification.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Path to a custom CA certificate in PEM format.
    pub fn ca_cert(mut self, path: &str) -> Self {
        self.ca_cert = Some(path.to_string());
        self
    }

    pub fn build(self) -> Result<FusionClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidConfig("base URL is required".to_string()))?;
        Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("invalid base URL '{base_url}': {e}")))?;

        let mut http = reqwest::Client::builder().user_agent(
            self.user_agent
                .unwrap_or_else(|| format!("fusionctl-core/{}", env!("CARGO_PKG_VERSION"))),
        );
        if self.insecure {
            http = http.danger_accept_invalid_certs(true);
        }
        if let Some(path) = &self.ca_cert {
            let pem = std::fs::read(path).map_err(|e| {
                ClientError::InvalidConfig(format!("failed to read CA certificate {path}: {e}"))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                ClientError::InvalidConfig(format!("invalid CA certificate {path}: {e}"))
            })?;
            http = http.add_root_certificate(cert);
        }
        let http = http
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(FusionClient {
            http,
            base_url,
            api_token: self.api_token,
        })
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend usually answers with `{"error": {"message": ...}}`, but raw
/// proxies in front of it may return `{"message": ...}` or plain text.
fn extract_error_message(body: &str, status: reqwest::StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        })
}

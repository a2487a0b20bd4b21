//! HTTP client for the board API.
//!
//! All endpoints go through [`ApiClient::request`], which attaches JSON
//! headers, turns non-success responses into [`ApiError::Rejected`] and
//! decodes the body into the caller's type.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::types::{
    CardPayload, CardUpdatePayload, CategoryPayload, ErrorPayload, HealthStatus,
    MoveCardPayload, NewCardPayload,
};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Message used when an error response carries nothing better.
const GENERIC_FAILURE: &str = "API request failed";

/// API client error types.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Rejected {
        status: StatusCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// The human-readable message, without the status suffix.
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Per-call request options.
///
/// Headers given here are merged over the default JSON headers, so a caller
/// can override `Content-Type` if it really needs to.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options carrying a JSON body.
    pub fn json<B: Serialize>(body: &B) -> ApiResult<Self> {
        Ok(Self {
            body: Some(serde_json::to_value(body)?),
            ..Default::default()
        })
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Board API client.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client against the given base URL (e.g. `http://host:5000/api`).
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "ApiClient initialized");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request to `base_url + endpoint` and decode the JSON response.
    ///
    /// Every failure is logged before it is returned.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let url = Url::parse(&url).map_err(|e| invalid_url(&url, &e.to_string()))?;
        self.request_url(method, url, options).await
    }

    /// Build `base_url/seg/seg…`, percent-encoding each segment so an id
    /// can never add path, query or fragment parts.
    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| invalid_url(&self.base_url, &e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid_url(&self.base_url, "cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request_url<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let result = self.send(method.clone(), url.clone(), options).await;
        if let Err(e) = &result {
            error!(method = %method, url = %url, error = %e, "API request error");
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.extend(options.headers);

        let mut builder = self.client.request(method, url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let payload: ErrorPayload = serde_json::from_slice(&bytes).unwrap_or_default();
            let message = payload
                .best_message()
                .unwrap_or(GENERIC_FAILURE)
                .to_string();
            return Err(ApiError::Rejected {
                status,
                message,
                details: payload.details,
            });
        }

        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        Ok(serde_json::from_slice(body)?)
    }

    // ── Categories ──

    pub async fn get_categories(&self) -> ApiResult<Vec<CategoryPayload>> {
        self.request(Method::GET, "/categories", RequestOptions::default())
            .await
    }

    // ── Cards ──

    /// List cards, optionally only those of one category.
    pub async fn get_cards(&self, category_id: Option<&str>) -> ApiResult<Vec<CardPayload>> {
        let mut options = RequestOptions::default();
        if let Some(category_id) = category_id {
            options = options.query("categoryId", category_id);
        }
        self.request(Method::GET, "/cards", options).await
    }

    pub async fn get_card(&self, id: &str) -> ApiResult<CardPayload> {
        self.request_url(Method::GET, self.url(&["cards", id])?, RequestOptions::default())
            .await
    }

    pub async fn create_card(&self, card: &NewCardPayload) -> ApiResult<CardPayload> {
        self.request(Method::POST, "/cards", RequestOptions::json(card)?)
            .await
    }

    pub async fn update_card(
        &self,
        id: &str,
        updates: &CardUpdatePayload,
    ) -> ApiResult<CardPayload> {
        self.request_url(
            Method::PUT,
            self.url(&["cards", id])?,
            RequestOptions::json(updates)?,
        )
        .await
    }

    /// Move a card to another column. Only the column is sent.
    pub async fn move_card(&self, id: &str, column_id: &str) -> ApiResult<CardPayload> {
        let body = MoveCardPayload {
            column_id: column_id.to_string(),
        };
        self.request_url(
            Method::PATCH,
            self.url(&["cards", id, "move"])?,
            RequestOptions::json(&body)?,
        )
        .await
    }

    pub async fn delete_card(&self, id: &str) -> ApiResult<()> {
        let _: serde_json::Value = self
            .request_url(
                Method::DELETE,
                self.url(&["cards", id])?,
                RequestOptions::default(),
            )
            .await?;
        Ok(())
    }

    // ── Health ──

    pub async fn health_check(&self) -> ApiResult<HealthStatus> {
        self.request(Method::GET, "/health", RequestOptions::default())
            .await
    }
}

fn invalid_url(url: &str, reason: &str) -> ApiError {
    error!(url = %url, reason = %reason, "Invalid API URL");
    ApiError::InvalidUrl(format!("{}: {}", url, reason))
}

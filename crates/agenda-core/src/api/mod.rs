//! REST client for the scheduling backend.
//!
//! One method per endpoint, grouped by resource in the submodules. All calls
//! except login and register carry `Authorization: Bearer <token>`; calling
//! them on a client without a token fails with [`ApiError::NotSignedIn`]
//! before touching the network.

mod error;
mod events;
mod pending_events;
mod submission;
mod users;

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

pub use error::{parse_api_error, ApiError, ApiResult, GENERIC_FAILURE_MESSAGE};
pub use submission::{extract_existing_event, ConflictRecord, Submission};

use crate::auth::Session;
use crate::models::Event;
use crate::util::normalize_base_url;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Build a client; `timeout` of `None` keeps reqwest's defaults.
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Option<Duration>) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url.as_ref()).ok_or_else(|| {
            ApiError::InvalidConfiguration(
                "API base URL must be non-empty and include http:// or https://".to_string(),
            )
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
            token: None,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        self.token = if token.is_empty() { None } else { Some(token) };
        self
    }

    #[must_use]
    pub fn with_session(self, session: &Session) -> Self {
        self.with_token(session.token.clone())
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn public_request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "Sending API request");
        self.client
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    fn authed_request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ApiError::NotSignedIn)?;
        Ok(self.public_request(method, path).bearer_auth(token))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
        let body = Self::send_checked(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_unit(request: RequestBuilder) -> ApiResult<()> {
        Self::send_checked(request).await.map(|_| ())
    }

    async fn send_checked(request: RequestBuilder) -> ApiResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            let message = parse_api_error(status, &body);
            tracing::warn!(status = status.as_u16(), "API request failed: {}", message);
            Err(ApiError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Send a write that the backend may refuse with 409.
    async fn send_submission<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> ApiResult<Submission<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::CONFLICT {
            let value: serde_json::Value = serde_json::from_str(&body).map_err(|_| {
                ApiError::MalformedConflict(crate::util::compact_text(&body))
            })?;
            let existing: Event = extract_existing_event(&value)
                .ok_or_else(|| ApiError::MalformedConflict(crate::util::compact_text(&body)))?;
            tracing::info!(existing_id = %existing.id, "Backend reported a scheduling conflict");
            return Ok(Submission::Conflict(ConflictRecord {
                existing,
                body: value,
            }));
        }

        if !status.is_success() {
            let message = parse_api_error(status, &body);
            tracing::warn!(status = status.as_u16(), "API request failed: {}", message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Submission::Accepted(None));
        }
        match serde_json::from_str::<T>(&body) {
            Ok(record) => Ok(Submission::Accepted(Some(record))),
            Err(error) => {
                tracing::debug!("Accepted response body did not decode: {}", error);
                Ok(Submission::Accepted(None))
            }
        }
    }
}

/// Percent-encode an id for use as a path segment.
fn segment(id: &str) -> String {
    urlencoding::encode(id.trim()).into_owned()
}

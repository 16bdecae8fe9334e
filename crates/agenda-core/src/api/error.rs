//! Errors raised by the REST client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Generic alert shown for any failure that is not a validation error or a
/// conflict.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Não foi possível concluir a operação. Tente novamente.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),
    #[error("No active session; sign in first")]
    NotSignedIn,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error: {message}")]
    Status { status: u16, message: String },
    #[error("Conflict response did not include the existing event: {0}")]
    MalformedConflict(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status of the failed response, when there was one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Text for the user-facing alert.
    ///
    /// Transport and HTTP failures collapse into the same generic message;
    /// only an expired or missing session gets its own wording.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotSignedIn => "Sessão não encontrada. Faça login novamente.".to_string(),
            error if error.is_unauthorized() => {
                "Sessão expirada ou sem permissão para esta ação.".to_string()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
    detail: Option<String>,
}

/// Condense an error response into `message (status)`.
pub fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.detail).or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = crate::util::compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

//! Error types for agenda-core

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::conflict::FlowError;
use crate::form::{FormError, ValidationErrors};

/// Errors that can occur in agenda-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// REST call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Sign-in, sign-up or session storage failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Conflict flow failed or was driven out of order
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// Form edit addressed a missing field or item
    #[error(transparent)]
    Form(#[from] FormError),

    /// Input rejected before any request was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl Error {
    /// Field errors when the input was rejected before any request.
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) | Self::Auth(AuthError::Validation(errors)) => Some(errors),
            _ => None,
        }
    }

    /// Text suitable for an alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(error) | Self::Flow(FlowError::Api(error)) => error.user_message(),
            Self::Auth(AuthError::Api(error)) => error.user_message(),
            Self::Validation(errors) | Self::Auth(AuthError::Validation(errors)) => {
                errors.to_string()
            }
            other => other.to_string(),
        }
    }
}

use std::io;

use agenda_core::api::ApiError;
use agenda_core::auth::AuthError;
use agenda_core::conflict::FlowError;
use agenda_core::form::{FormError, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] agenda_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
    #[error("{0} cannot be empty")]
    EmptyIdentifier(&'static str),
    #[error("Form document must be a JSON object of field names to values")]
    InvalidFormDocument,
    #[error("Field '{0}' must be text, a number or a list of text")]
    InvalidFormValue(String),
    #[error("Edited form is empty; nothing was sent")]
    EmptyEditedForm,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Scheduling conflict needs a decision; rerun with --replace or --cancel")]
    DecisionRequired,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "API base URL is not configured. Run `agenda config init --api-base-url <URL>` or set AGENDA_API_BASE_URL."
    )]
    ApiNotConfigured,
}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        Self::Core(error.into())
    }
}

impl From<AuthError> for CliError {
    fn from(error: AuthError) -> Self {
        Self::Core(error.into())
    }
}

impl From<FlowError> for CliError {
    fn from(error: FlowError) -> Self {
        Self::Core(error.into())
    }
}

impl From<FormError> for CliError {
    fn from(error: FormError) -> Self {
        Self::Core(error.into())
    }
}

impl From<ValidationErrors> for CliError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Core(errors.into())
    }
}

impl CliError {
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Core(error) => error.validation_errors(),
            _ => None,
        }
    }

    /// Failures the conflict flow already showed through its navigator.
    pub const fn already_alerted(&self) -> bool {
        matches!(self, Self::Core(agenda_core::Error::Flow(FlowError::Api(_))))
    }

    /// What the terminal shows. Backend failures collapse into the generic
    /// alert; the raw error goes to the debug log.
    pub fn user_message(&self) -> String {
        if let Some(errors) = self.validation_errors() {
            return format!("Dados inválidos:\n{}", render_validation(errors));
        }
        match self {
            Self::Core(error) => error.user_message(),
            other => other.to_string(),
        }
    }
}

fn render_validation(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

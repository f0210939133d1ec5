//! Gateway error type.

use thiserror::Error;

use crate::provider::ProviderError;

use super::models::AuthStep;

/// Recoverable authentication failures, each with a fixed user-facing
/// message.
///
/// This is the typed replacement for the loose `{success:false, error}`
/// shape: callers match on the variant, views render `to_string()`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Registration hit an already-registered username.
    #[error("Account already exists.")]
    AccountExists,

    /// Wrong email or password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account exists but was never confirmed.
    #[error("Please verify your email first")]
    AccountNotConfirmed,

    /// The pool demands a step this crate does not handle.
    #[error("Additional steps required")]
    AdditionalStepRequired(AuthStep),

    /// Any other provider failure; carries the provider's own message.
    #[error("{0}")]
    Provider(String),
}

impl GatewayError {
    /// The message a form should render, verbatim.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Wrap a provider error when nothing more specific matched.
    pub(crate) fn from_provider(err: ProviderError) -> Self {
        match err {
            ProviderError::Api { message, .. } => GatewayError::Provider(message),
            other => GatewayError::Provider(other.to_string()),
        }
    }
}

//! Provider client error types.

use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur talking to the identity provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed before a response was produced.
    #[error("request to identity provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider returned a structured error response.
    #[error("identity provider error {code:?}: {message}")]
    Api {
        /// Structured error code parsed from the response.
        code: ErrorCode,
        /// Provider-supplied message.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("failed to parse provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Structured code for API errors, `None` for transport/decode faults.
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            ProviderError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Structured error codes the provider distinguishes.
///
/// Parsed from the `__type` field of the error body; matching on these
/// replaces matching on exception-name strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// Username is already registered.
    UsernameExists,
    /// Wrong credentials or revoked token.
    NotAuthorized,
    /// Account exists but the confirmation step was never completed.
    UserNotConfirmed,
    /// No such account.
    UserNotFound,
    /// Confirmation code does not match.
    CodeMismatch,
    /// Confirmation code is no longer valid.
    ExpiredCode,
    /// Call requires an authenticated principal but none is present.
    NotAuthenticated,
    /// Password rejected by the pool's policy.
    InvalidPassword,
    /// Malformed request parameter.
    InvalidParameter,
    /// Too many requests.
    LimitExceeded,
    /// Any other provider error type, kept verbatim.
    Other(String),
}

impl ErrorCode {
    /// Parse a `__type` value, stripping any `#`-prefixed namespace
    /// (e.g. `com.amazonaws...#NotAuthorizedException`).
    pub fn parse(error_type: &str) -> Self {
        let name = error_type.rsplit('#').next().unwrap_or(error_type);
        match name {
            "UsernameExistsException" => ErrorCode::UsernameExists,
            "NotAuthorizedException" => ErrorCode::NotAuthorized,
            "UserNotConfirmedException" => ErrorCode::UserNotConfirmed,
            "UserNotFoundException" => ErrorCode::UserNotFound,
            "CodeMismatchException" => ErrorCode::CodeMismatch,
            "ExpiredCodeException" => ErrorCode::ExpiredCode,
            "UserUnAuthenticatedException" => ErrorCode::NotAuthenticated,
            "InvalidPasswordException" => ErrorCode::InvalidPassword,
            "InvalidParameterException" => ErrorCode::InvalidParameter,
            "LimitExceededException" | "TooManyRequestsException" => ErrorCode::LimitExceeded,
            other => ErrorCode::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(
            ErrorCode::parse("UsernameExistsException"),
            ErrorCode::UsernameExists
        );
        assert_eq!(
            ErrorCode::parse("NotAuthorizedException"),
            ErrorCode::NotAuthorized
        );
        assert_eq!(
            ErrorCode::parse("UserUnAuthenticatedException"),
            ErrorCode::NotAuthenticated
        );
    }

    #[test]
    fn test_parse_strips_namespace() {
        assert_eq!(
            ErrorCode::parse("com.amazonaws.cognito#UserNotConfirmedException"),
            ErrorCode::UserNotConfirmed
        );
    }

    #[test]
    fn test_parse_unknown_kept_verbatim() {
        assert_eq!(
            ErrorCode::parse("SomethingNewException"),
            ErrorCode::Other("SomethingNewException".to_string())
        );
    }
}

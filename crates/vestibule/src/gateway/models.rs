//! Gateway request and result models.

use serde::{Deserialize, Serialize};

use crate::token::Role;

/// Input for account registration.
#[derive(Debug, Clone)]
pub struct SignUpParams {
    /// Email address, doubles as the pool username.
    pub email: String,
    /// Password.
    pub password: String,
    /// Display name.
    pub name: String,
}

impl SignUpParams {
    /// Convenience constructor.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone)]
pub struct SignUpReceipt {
    /// Pool-assigned id of the new account.
    pub user_id: String,
    /// Whether the pool auto-confirmed the account.
    pub user_confirmed: bool,
    /// Masked destination the confirmation code was sent to.
    pub code_destination: Option<String>,
}

/// Additional step the pool demands before sign-in can complete.
///
/// None of these are handled by this crate; they are surfaced as an
/// explicit variant so callers can tell "wrong password" from "pool
/// wants MFA".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStep {
    /// SMS one-time code.
    SmsMfa,
    /// Authenticator-app one-time code.
    SoftwareTokenMfa,
    /// Pool forces a password change.
    NewPasswordRequired,
    /// Pool-defined custom challenge.
    CustomChallenge,
    /// Challenge this crate does not know about, kept verbatim.
    Other(String),
}

impl AuthStep {
    /// Parse a wire challenge name.
    pub fn parse(challenge_name: &str) -> Self {
        match challenge_name {
            "SMS_MFA" => AuthStep::SmsMfa,
            "SOFTWARE_TOKEN_MFA" => AuthStep::SoftwareTokenMfa,
            "NEW_PASSWORD_REQUIRED" => AuthStep::NewPasswordRequired,
            "CUSTOM_CHALLENGE" => AuthStep::CustomChallenge,
            other => AuthStep::Other(other.to_string()),
        }
    }
}

/// The signed-in user as observed at the last refresh.
///
/// A point-in-time snapshot: replaced wholesale on refresh, cleared on
/// sign-out, never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Pool user id (token subject).
    pub user_id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Groups from the identity token's group claim.
    pub groups: Vec<String>,
    /// Coarse role derived from the groups.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_step_parse() {
        assert_eq!(AuthStep::parse("SMS_MFA"), AuthStep::SmsMfa);
        assert_eq!(
            AuthStep::parse("SOFTWARE_TOKEN_MFA"),
            AuthStep::SoftwareTokenMfa
        );
        assert_eq!(
            AuthStep::parse("NEW_PASSWORD_REQUIRED"),
            AuthStep::NewPasswordRequired
        );
        assert_eq!(
            AuthStep::parse("DEVICE_SRP_AUTH"),
            AuthStep::Other("DEVICE_SRP_AUTH".to_string())
        );
    }
}

//! Wire types for the user-pool JSON protocol.
//!
//! Field names are PascalCase on the wire; only the fields this crate
//! consumes are modeled.

use serde::{Deserialize, Serialize};

/// A named profile attribute (`email`, `name`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeType {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl AttributeType {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// `SignUp` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SignUpRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub user_attributes: Vec<AttributeType>,
}

/// Where a confirmation code was delivered.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDelivery {
    /// Masked destination, e.g. "a***@b***.com".
    #[serde(default)]
    pub destination: Option<String>,
    /// Delivery medium ("EMAIL" or "SMS").
    #[serde(default)]
    pub delivery_medium: Option<String>,
}

/// `SignUp` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignUpResponse {
    /// Whether the account is already confirmed (pools can auto-confirm).
    #[serde(default)]
    pub user_confirmed: bool,
    /// New account's pool-assigned id.
    #[serde(default)]
    pub user_sub: String,
    /// Where the confirmation code went.
    #[serde(default)]
    pub code_delivery_details: Option<CodeDelivery>,
}

/// `ConfirmSignUp` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ConfirmSignUpRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub confirmation_code: &'a str,
}

/// `InitiateAuth` request body (USER_PASSWORD_AUTH flow only).
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct InitiateAuthRequest<'a> {
    pub client_id: &'a str,
    pub auth_flow: &'a str,
    pub auth_parameters: AuthParameters<'a>,
}

/// Credential parameters for USER_PASSWORD_AUTH.
#[derive(Debug, Serialize)]
pub(crate) struct AuthParameters<'a> {
    #[serde(rename = "USERNAME")]
    pub username: &'a str,
    #[serde(rename = "PASSWORD")]
    pub password: &'a str,
}

/// Issued tokens inside a successful `InitiateAuth` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    /// Identity token.
    pub id_token: String,
    /// Access token.
    pub access_token: String,
    /// Refresh token, absent on some flows.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access-token TTL in seconds.
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// `InitiateAuth` response: either tokens or a named challenge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuthResponse {
    /// Tokens, present when authentication completed in one step.
    #[serde(default)]
    pub authentication_result: Option<AuthenticationResult>,
    /// Challenge demanded by the pool (MFA, forced password change, ...).
    #[serde(default)]
    pub challenge_name: Option<String>,
}

/// `GetUser` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetUserRequest<'a> {
    pub access_token: &'a str,
}

/// `GetUser` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetUserResponse {
    /// Pool username of the principal.
    pub username: String,
    /// Profile attributes.
    #[serde(default)]
    pub user_attributes: Vec<AttributeType>,
}

impl GetUserResponse {
    /// Look up a profile attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.user_attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// `GlobalSignOut` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GlobalSignOutRequest<'a> {
    pub access_token: &'a str,
}

/// `ForgotPassword` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ForgotPasswordRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
}

/// `ForgotPassword` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ForgotPasswordResponse {
    #[serde(default)]
    pub code_delivery_details: Option<CodeDelivery>,
}

/// `ConfirmForgotPassword` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ConfirmForgotPasswordRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub confirmation_code: &'a str,
    pub password: &'a str,
}

/// Error body returned by the provider on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(rename = "__type", default)]
    pub error_type: String,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_user_attribute_lookup() {
        let response = GetUserResponse {
            username: "a-b-c".to_string(),
            user_attributes: vec![
                AttributeType::new("email", "a@b.com"),
                AttributeType::new("name", "A"),
            ],
        };
        assert_eq!(response.attribute("email"), Some("a@b.com"));
        assert_eq!(response.attribute("phone_number"), None);
    }

    #[test]
    fn test_initiate_auth_challenge_deserialization() {
        let json = r#"{"ChallengeName":"SOFTWARE_TOKEN_MFA","ChallengeParameters":{}}"#;
        let response: InitiateAuthResponse = serde_json::from_str(json).unwrap();
        assert!(response.authentication_result.is_none());
        assert_eq!(response.challenge_name.as_deref(), Some("SOFTWARE_TOKEN_MFA"));
    }

    #[test]
    fn test_authentication_result_defaults_expiry() {
        let json = r#"{"IdToken":"i","AccessToken":"a"}"#;
        let result: AuthenticationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.expires_in, 3600);
        assert!(result.refresh_token.is_none());
    }
}

//! HTTP client for the user-pool API.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::{ConfigError, PoolConfig};

use super::IdentityProvider;
use super::error::{ErrorCode, ProviderError, ProviderResult};
use super::types::*;

/// Prefix of every `X-Amz-Target` operation header.
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";

/// Content type of the user-pool JSON protocol.
const AMZ_JSON: &str = "application/x-amz-json-1.1";

/// Client for the user-pool identity-provider API.
///
/// Stateless request/response wrapper; all session state lives with the
/// caller. Construction fails fast on an incomplete [`PoolConfig`] so a
/// half-configured pool never sees a network call.
#[derive(Debug, Clone)]
pub struct UserPoolClient {
    /// HTTP client.
    client: Client,
    /// Provider endpoint, e.g. "https://cognito-idp.eu-west-1.amazonaws.com".
    endpoint: String,
    /// Application-client id sent with unauthenticated calls.
    client_id: String,
}

impl UserPoolClient {
    /// Create a client for the given pool.
    pub fn new(config: &PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            client_id: config.client_id.clone(),
        })
    }

    /// POST one operation and decode its JSON response.
    async fn call<Req, Resp>(&self, operation: &str, body: &Req) -> ProviderResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        debug!("provider call: {}", operation);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", AMZ_JSON)
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, operation))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            // Some operations answer with an empty body; let unit-like
            // targets decode from "{}".
            let payload: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
            serde_json::from_slice(payload).map_err(|e| {
                ProviderError::Decode(format!("{} response: {}", operation, e))
            })
        } else {
            let body: ApiErrorBody = serde_json::from_slice(&bytes).map_err(|e| {
                ProviderError::Decode(format!("{} error response: {}", operation, e))
            })?;
            Err(ProviderError::Api {
                code: ErrorCode::parse(&body.error_type),
                message: body
                    .message
                    .unwrap_or_else(|| format!("{} failed with status {}", operation, status)),
            })
        }
    }
}

/// Empty response body for operations that return nothing of interest.
#[derive(serde::Deserialize)]
struct Empty {}

#[async_trait]
impl IdentityProvider for UserPoolClient {
    async fn sign_up(
        &self,
        username: &str,
        password: &str,
        attributes: Vec<AttributeType>,
    ) -> ProviderResult<SignUpResponse> {
        self.call(
            "SignUp",
            &SignUpRequest {
                client_id: &self.client_id,
                username,
                password,
                user_attributes: attributes,
            },
        )
        .await
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> ProviderResult<()> {
        let _: Empty = self
            .call(
                "ConfirmSignUp",
                &ConfirmSignUpRequest {
                    client_id: &self.client_id,
                    username,
                    confirmation_code: code,
                },
            )
            .await?;
        Ok(())
    }

    async fn initiate_auth(
        &self,
        username: &str,
        password: &str,
    ) -> ProviderResult<InitiateAuthResponse> {
        self.call(
            "InitiateAuth",
            &InitiateAuthRequest {
                client_id: &self.client_id,
                auth_flow: "USER_PASSWORD_AUTH",
                auth_parameters: AuthParameters { username, password },
            },
        )
        .await
    }

    async fn get_user(&self, access_token: &str) -> ProviderResult<GetUserResponse> {
        self.call("GetUser", &GetUserRequest { access_token }).await
    }

    async fn global_sign_out(&self, access_token: &str) -> ProviderResult<()> {
        let _: Empty = self
            .call("GlobalSignOut", &GlobalSignOutRequest { access_token })
            .await?;
        Ok(())
    }

    async fn forgot_password(&self, username: &str) -> ProviderResult<Option<CodeDelivery>> {
        let response: ForgotPasswordResponse = self
            .call(
                "ForgotPassword",
                &ForgotPasswordRequest {
                    client_id: &self.client_id,
                    username,
                },
            )
            .await?;
        Ok(response.code_delivery_details)
    }

    async fn confirm_forgot_password(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> ProviderResult<()> {
        let _: Empty = self
            .call(
                "ConfirmForgotPassword",
                &ConfirmForgotPasswordRequest {
                    client_id: &self.client_id,
                    username,
                    confirmation_code: code,
                    password: new_password,
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PoolConfig {
        PoolConfig {
            user_pool_id: "eu-west-1_h7Xp2Qa".to_string(),
            client_id: "client-abc".to_string(),
            endpoint: None,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = UserPoolClient::new(&test_config()).unwrap();
        assert_eq!(client.endpoint, "https://cognito-idp.eu-west-1.amazonaws.com");
        assert_eq!(client.client_id, "client-abc");
    }

    #[test]
    fn test_client_creation_rejects_missing_config() {
        let config = PoolConfig::default();
        assert_eq!(
            UserPoolClient::new(&config).unwrap_err(),
            ConfigError::MissingUserPoolId
        );
    }
}

//! Identity-provider wire client.
//!
//! Talks the user-pool JSON protocol (`x-amz-json-1.1` with
//! `X-Amz-Target` operation routing). The [`IdentityProvider`] trait is
//! the seam the gateway is built against; tests substitute a fake.

mod client;
mod error;
mod types;

pub use client::UserPoolClient;
pub use error::{ErrorCode, ProviderError, ProviderResult};
pub use types::{
    AttributeType, AuthenticationResult, CodeDelivery, GetUserResponse, InitiateAuthResponse,
    SignUpResponse,
};

use async_trait::async_trait;

/// Operations consumed from the external identity provider.
///
/// One method per provider call; no retries, no local state. Every
/// method returns the provider's structured error codes so callers
/// never match on message strings.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account. The provider sends a confirmation code
    /// out-of-band.
    async fn sign_up(
        &self,
        username: &str,
        password: &str,
        attributes: Vec<AttributeType>,
    ) -> ProviderResult<SignUpResponse>;

    /// Submit the registration confirmation code.
    async fn confirm_sign_up(&self, username: &str, code: &str) -> ProviderResult<()>;

    /// Authenticate with username and password.
    async fn initiate_auth(
        &self,
        username: &str,
        password: &str,
    ) -> ProviderResult<InitiateAuthResponse>;

    /// Fetch the authenticated principal's profile attributes.
    async fn get_user(&self, access_token: &str) -> ProviderResult<GetUserResponse>;

    /// Invalidate the session's tokens provider-side.
    async fn global_sign_out(&self, access_token: &str) -> ProviderResult<()>;

    /// Request a password-reset code.
    async fn forgot_password(&self, username: &str) -> ProviderResult<Option<CodeDelivery>>;

    /// Complete a password reset with the delivered code.
    async fn confirm_forgot_password(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> ProviderResult<()>;
}

//! The authentication gateway.

use log::{debug, warn};
use std::sync::Arc;

use crate::config::{ConfigError, PoolConfig};
use crate::provider::{
    AttributeType, CodeDelivery, ErrorCode, IdentityProvider, ProviderError, UserPoolClient,
};
use crate::token::{IdTokenClaims, Role, TokenSet, TokenStore};

use super::error::GatewayError;
use super::models::{AuthStep, AuthenticatedUser, SignUpParams, SignUpReceipt};

/// Normalized authentication operations against one user pool.
///
/// Operations are one-shot and non-retrying. Every provider fault is
/// caught, logged, and mapped; the only panics possible here are lock
/// poisoning inside the token store.
#[derive(Clone)]
pub struct AuthGateway {
    provider: Arc<dyn IdentityProvider>,
    tokens: TokenStore,
}

impl AuthGateway {
    /// Create a gateway over an injected provider.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            tokens: TokenStore::new(),
        }
    }

    /// Create a gateway with the real HTTP client for the given pool.
    ///
    /// Fails fast on an incomplete config; no network call is made.
    pub fn from_config(config: &PoolConfig) -> Result<Self, ConfigError> {
        let client = UserPoolClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// The shared token store backing this gateway.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Register a new account. The provider sends a confirmation code
    /// out-of-band to the given email.
    pub async fn sign_up(&self, params: SignUpParams) -> Result<SignUpReceipt, GatewayError> {
        let email = params.email.trim();
        let password = params.password.trim();
        let name = params.name.trim();

        let attributes = vec![
            AttributeType::new("email", email),
            AttributeType::new("name", name),
        ];

        match self.provider.sign_up(email, password, attributes).await {
            Ok(response) => {
                debug!("sign-up accepted for {}", mask_email(email));
                Ok(SignUpReceipt {
                    user_id: response.user_sub,
                    user_confirmed: response.user_confirmed,
                    code_destination: response
                        .code_delivery_details
                        .and_then(|d| d.destination),
                })
            }
            Err(err) => {
                warn!("sign-up failed: {}", err);
                match err.code() {
                    Some(ErrorCode::UsernameExists) => Err(GatewayError::AccountExists),
                    _ => Err(GatewayError::from_provider(err)),
                }
            }
        }
    }

    /// Submit the registration confirmation code.
    pub async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), GatewayError> {
        match self.provider.confirm_sign_up(email.trim(), code.trim()).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("sign-up confirmation failed: {}", err);
                Err(GatewayError::from_provider(err))
            }
        }
    }

    /// Authenticate with email and password.
    ///
    /// On success the token set is cached and the freshly fetched user
    /// is returned. A pool challenge (MFA, forced password change) is
    /// surfaced as [`GatewayError::AdditionalStepRequired`].
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, GatewayError> {
        let response = match self
            .provider
            .initiate_auth(email.trim(), password.trim())
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("sign-in failed: {}", err);
                return Err(match err.code() {
                    Some(ErrorCode::NotAuthorized) => GatewayError::InvalidCredentials,
                    Some(ErrorCode::UserNotConfirmed) => GatewayError::AccountNotConfirmed,
                    _ => GatewayError::from_provider(err),
                });
            }
        };

        let Some(result) = response.authentication_result else {
            let step = response
                .challenge_name
                .as_deref()
                .map(AuthStep::parse)
                .unwrap_or_else(|| AuthStep::Other("UNKNOWN".to_string()));
            warn!("sign-in requires additional step: {:?}", step);
            return Err(GatewayError::AdditionalStepRequired(step));
        };

        self.tokens.replace(TokenSet::new(
            result.id_token,
            result.access_token,
            result.refresh_token,
            result.expires_in,
        ));

        // Fetch the fresh profile for the caller; failure here leaves
        // the token set in place for a later refresh.
        match self.load_user().await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(GatewayError::Provider("Sign in failed".to_string())),
            Err(err) => Err(err),
        }
    }

    /// Terminate the session.
    ///
    /// Best-effort: the provider call is always attempted when a token
    /// set exists, and the local token set is cleared no matter how
    /// that call went. The local cache must never keep claiming a
    /// session the UI has given up on.
    pub async fn sign_out(&self) -> Result<(), GatewayError> {
        let outcome = match self.tokens.get() {
            Some(tokens) => self.provider.global_sign_out(&tokens.access_token).await,
            None => Ok(()),
        };
        self.tokens.clear();

        match outcome {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("provider sign-out failed (local tokens cleared): {}", err);
                Err(GatewayError::from_provider(err))
            }
        }
    }

    /// The currently signed-in user, or `None` when signed out.
    ///
    /// Never fails on the logged-out case: an empty token store
    /// short-circuits without any provider call, and an unauthenticated
    /// answer from the provider clears the stale tokens and yields
    /// `None`.
    pub async fn current_user(&self) -> Result<Option<AuthenticatedUser>, GatewayError> {
        if !self.tokens.is_present() {
            debug!("no session tokens cached, skipping user fetch");
            return Ok(None);
        }
        self.load_user().await
    }

    /// Request a password-reset code.
    pub async fn reset_password(&self, email: &str) -> Result<Option<String>, GatewayError> {
        match self.provider.forgot_password(email.trim()).await {
            Ok(delivery) => Ok(delivery.and_then(|d: CodeDelivery| d.destination)),
            Err(err) => {
                warn!("password reset request failed: {}", err);
                Err(GatewayError::from_provider(err))
            }
        }
    }

    /// Complete a password reset with the delivered code.
    pub async fn confirm_reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), GatewayError> {
        match self
            .provider
            .confirm_forgot_password(email.trim(), code.trim(), new_password)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("password reset confirmation failed: {}", err);
                Err(GatewayError::from_provider(err))
            }
        }
    }

    /// Fetch profile attributes for the cached tokens and merge them
    /// with the identity token's claims.
    async fn load_user(&self) -> Result<Option<AuthenticatedUser>, GatewayError> {
        let Some(tokens) = self.tokens.get() else {
            return Ok(None);
        };

        let profile = match self.provider.get_user(&tokens.access_token).await {
            Ok(profile) => profile,
            Err(ProviderError::Api { code, message })
                if matches!(code, ErrorCode::NotAuthorized | ErrorCode::NotAuthenticated) =>
            {
                debug!("session no longer authenticated: {}", message);
                self.tokens.clear();
                return Ok(None);
            }
            Err(err) => {
                warn!("fetching current user failed: {}", err);
                return Err(GatewayError::from_provider(err));
            }
        };

        // Group membership comes from the identity token, not the
        // profile. A payload we cannot read downgrades to no groups.
        let claims = match IdTokenClaims::decode(&tokens.id_token) {
            Ok(claims) => Some(claims),
            Err(err) => {
                warn!("could not decode identity token payload: {}", err);
                None
            }
        };

        let groups = claims
            .as_ref()
            .map(|c| c.groups.clone())
            .unwrap_or_default();
        let role = Role::from_groups(&groups);
        let user_id = claims
            .as_ref()
            .map(|c| c.sub.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| profile.username.clone());
        let email = profile
            .attribute("email")
            .map(str::to_string)
            .or_else(|| claims.as_ref().and_then(|c| c.email.clone()))
            .unwrap_or_default();
        let name = profile
            .attribute("name")
            .map(str::to_string)
            .or_else(|| claims.as_ref().and_then(|c| c.name.clone()))
            .unwrap_or_default();

        Ok(Some(AuthenticatedUser {
            user_id,
            email,
            name,
            groups,
            role,
        }))
    }
}

/// Keep addresses out of the logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", head, domain)
        }
        None => "***".to_string(),
    }
}

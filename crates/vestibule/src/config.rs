//! User-pool configuration.

use serde::{Deserialize, Serialize};

/// Environment variable for the user-pool identifier.
pub const ENV_USER_POOL_ID: &str = "VESTIBULE_USER_POOL_ID";
/// Environment variable for the application-client identifier.
pub const ENV_CLIENT_ID: &str = "VESTIBULE_CLIENT_ID";
/// Environment variable for an endpoint override (testing / local stacks).
pub const ENV_ENDPOINT: &str = "VESTIBULE_ENDPOINT";

/// Connection settings for the user-pool identity provider.
///
/// Both identifiers are REQUIRED before any gateway operation is
/// attempted; `validate()` must pass before a client is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// User-pool identifier, `<region>_<suffix>` (e.g. "eu-west-1_h7Xp2Qa").
    pub user_pool_id: String,

    /// Application-client identifier issued for this app by the pool.
    pub client_id: String,

    /// Endpoint override. When unset the endpoint is derived from the
    /// pool's region.
    pub endpoint: Option<String>,
}

impl PoolConfig {
    /// Build a config from the `VESTIBULE_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            user_pool_id: std::env::var(ENV_USER_POOL_ID).unwrap_or_default(),
            client_id: std::env::var(ENV_CLIENT_ID).unwrap_or_default(),
            endpoint: std::env::var(ENV_ENDPOINT).ok().filter(|v| !v.is_empty()),
        }
    }

    /// Validate the configuration.
    ///
    /// Fails fast when either identifier is missing so that no network
    /// call is ever attempted against a half-configured pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_pool_id.trim().is_empty() {
            return Err(ConfigError::MissingUserPoolId);
        }
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::MissingClientId);
        }
        // Region is derived from the pool id prefix; a pool id without
        // one cannot be routed unless an endpoint override is present.
        if self.endpoint.is_none() && self.region().is_none() {
            return Err(ConfigError::MalformedUserPoolId(self.user_pool_id.clone()));
        }
        Ok(())
    }

    /// Region encoded in the pool id prefix, if well-formed.
    pub fn region(&self) -> Option<&str> {
        let (region, suffix) = self.user_pool_id.split_once('_')?;
        if region.is_empty() || suffix.is_empty() {
            return None;
        }
        Some(region)
    }

    /// Base URL for the provider endpoint.
    ///
    /// Callers must have run `validate()` first; an unroutable config
    /// is reported there, not here.
    pub fn endpoint(&self) -> String {
        if let Some(ref endpoint) = self.endpoint {
            return endpoint.trim_end_matches('/').to_string();
        }
        format!(
            "https://cognito-idp.{}.amazonaws.com",
            self.region().unwrap_or_default()
        )
    }
}

/// Configuration errors. All are fatal: the gateway refuses to start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// User-pool identifier is not set.
    #[error("user pool id is not configured. Set {ENV_USER_POOL_ID} or pool.user_pool_id in config.")]
    MissingUserPoolId,

    /// Application-client identifier is not set.
    #[error("app client id is not configured. Set {ENV_CLIENT_ID} or pool.client_id in config.")]
    MissingClientId,

    /// Pool id does not carry a `<region>_<suffix>` prefix.
    #[error("user pool id '{0}' is malformed, expected <region>_<suffix>")]
    MalformedUserPoolId(String),
}

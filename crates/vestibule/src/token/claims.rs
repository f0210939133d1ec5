//! Identity-token payload and user roles.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Name of the group-membership claim in the identity token.
pub const GROUPS_CLAIM: &str = "cognito:groups";

/// Group name that grants the admin role.
pub const ADMIN_GROUP: &str = "admin";

/// User role, derived from group membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user.
    #[default]
    User,
    /// Administrator.
    Admin,
}

impl Role {
    /// Derive the role from a group list: membership of the privileged
    /// group yields admin, anything else (including no groups) is user.
    pub fn from_groups(groups: &[String]) -> Self {
        if groups.iter().any(|g| g == ADMIN_GROUP) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}

/// Payload of the identity token, as far as this crate reads it.
///
/// The token is never validated locally; it arrived from the provider
/// over TLS and resource servers do their own verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Subject (user ID in the pool).
    pub sub: String,

    /// User's email.
    #[serde(default)]
    pub email: Option<String>,

    /// User's display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Groups the user belongs to.
    #[serde(default, rename = "cognito:groups")]
    pub groups: Vec<String>,
}

impl IdTokenClaims {
    /// Decode the payload segment of a compact JWT.
    pub fn decode(id_token: &str) -> Result<Self, TokenDecodeError> {
        let mut segments = id_token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) => payload,
            _ => return Err(TokenDecodeError::Malformed),
        };
        let bytes = URL_SAFE_NO_PAD.decode(payload)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Role implied by the group claim.
    pub fn role(&self) -> Role {
        Role::from_groups(&self.groups)
    }
}

/// Errors decoding an identity-token payload.
#[derive(Debug, thiserror::Error)]
pub enum TokenDecodeError {
    /// Token is not a three-segment compact JWT.
    #[error("token is not a compact JWT")]
    Malformed,

    /// Payload segment is not valid base64url.
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload is not the expected JSON shape.
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

//! Session token set and identity-token claims.
//!
//! Tokens are held verbatim as issued by the provider; nothing here
//! verifies signatures. Claims are read for display and coarse role
//! derivation only.

mod claims;
mod store;

pub use claims::{IdTokenClaims, Role, TokenDecodeError, ADMIN_GROUP, GROUPS_CLAIM};
pub use store::{TokenSet, TokenStore};

//! Vestibule - user-pool authentication client and session coordinator.
//!
//! Wraps a managed user-pool identity provider behind a typed gateway
//! (sign-up, confirmation, sign-in, sign-out, password reset), caches
//! the issued token set, and keeps a process-wide snapshot of the
//! signed-in user with a coarse role derived from the identity token's
//! group claim.
//!
//! The provider stays a black box: no token verification, no password
//! handling, no session renewal happens here.

pub mod config;
pub mod gateway;
pub mod provider;
pub mod session;
pub mod token;

pub use config::{ConfigError, PoolConfig};
pub use gateway::{AuthGateway, AuthStep, AuthenticatedUser, GatewayError, SignUpParams, SignUpReceipt};
pub use session::{SessionCoordinator, SessionSnapshot};
pub use token::{Role, TokenSet, TokenStore};

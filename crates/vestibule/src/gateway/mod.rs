//! Normalized authentication operations.
//!
//! Translates UI-level requests into provider calls and maps every
//! provider fault into a [`GatewayError`] with a stable user-facing
//! message. Nothing below this boundary ever reaches callers raw.

mod error;
mod models;
mod service;

pub use error::GatewayError;
pub use models::{AuthStep, AuthenticatedUser, SignUpParams, SignUpReceipt};
pub use service::AuthGateway;

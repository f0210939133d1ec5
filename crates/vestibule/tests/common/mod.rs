//! Test utilities and common setup.
#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use vestibule::{AuthGateway, PoolConfig, TokenSet};

/// Build an unsigned compact JWT with the given profile and groups.
pub fn encode_id_token(sub: &str, email: &str, name: &str, groups: &[&str]) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({
            "sub": sub,
            "email": email,
            "name": name,
            "cognito:groups": groups,
        })
        .to_string()
        .as_bytes(),
    );
    format!("{}.{}.sig", header, payload)
}

/// A token set pointing at the given identity token.
pub fn token_set(id_token: String) -> TokenSet {
    TokenSet::new(id_token, "access-token".to_string(), None, 3600)
}

/// Pool config routed at a mock server.
pub fn test_pool_config(endpoint: &str) -> PoolConfig {
    PoolConfig {
        user_pool_id: "local_test".to_string(),
        client_id: "test-client".to_string(),
        endpoint: Some(endpoint.to_string()),
    }
}

/// Gateway wired to a mock server endpoint.
pub fn test_gateway(endpoint: &str) -> AuthGateway {
    AuthGateway::from_config(&test_pool_config(endpoint)).unwrap()
}

/// Provider error body as it appears on the wire.
pub fn error_body(error_type: &str, message: &str) -> serde_json::Value {
    json!({ "__type": error_type, "message": message })
}

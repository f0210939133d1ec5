//! Gateway integration tests against a mocked provider endpoint.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vestibule::{AuthStep, GatewayError, Role, SignUpParams};

mod common;
use common::{encode_id_token, error_body, test_gateway, token_set};

const TARGET: &str = "X-Amz-Target";
const SVC: &str = "AWSCognitoIdentityProviderService";

fn target(operation: &str) -> String {
    format!("{}.{}", SVC, operation)
}

/// Invalid credentials map to the fixed message, never a raw fault.
#[tokio::test]
async fn test_sign_in_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header(TARGET, target("InitiateAuth")))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "NotAuthorizedException",
            "Incorrect username or password.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    let err = gateway.sign_in("a@b.com", "wrong").await.unwrap_err();

    assert_eq!(err, GatewayError::InvalidCredentials);
    assert_eq!(err.user_message(), "Invalid email or password");
    assert!(!gateway.tokens().is_present());
}

/// Unconfirmed accounts are distinguished from wrong passwords.
#[tokio::test]
async fn test_sign_in_unconfirmed_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("InitiateAuth")))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "UserNotConfirmedException",
            "User is not confirmed.",
        )))
        .mount(&server)
        .await;

    let err = test_gateway(&server.uri())
        .sign_in("a@b.com", "Abc12345!")
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::AccountNotConfirmed);
    assert_eq!(err.user_message(), "Please verify your email first");
}

/// Successful sign-in trims inputs, caches tokens, and returns the
/// freshly fetched user with the role derived from the group claim.
#[tokio::test]
async fn test_sign_in_success_returns_admin_user() {
    let server = MockServer::start().await;
    let id_token = encode_id_token("u-123", "a@b.com", "A", &["admin", "staff"]);

    Mock::given(method("POST"))
        .and(header(TARGET, target("InitiateAuth")))
        .and(body_partial_json(json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "AuthParameters": { "USERNAME": "a@b.com", "PASSWORD": "Abc12345!" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AuthenticationResult": {
                "IdToken": id_token,
                "AccessToken": "access-token",
                "RefreshToken": "refresh-token",
                "ExpiresIn": 3600,
            },
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("GetUser")))
        .and(body_partial_json(json!({ "AccessToken": "access-token" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Username": "a-b-com",
            "UserAttributes": [
                { "Name": "email", "Value": "a@b.com" },
                { "Name": "name", "Value": "A" },
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    // Padded inputs must be trimmed before they reach the wire.
    let user = gateway.sign_in("  a@b.com  ", " Abc12345! ").await.unwrap();

    assert_eq!(user.user_id, "u-123");
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.name, "A");
    assert_eq!(user.groups, vec!["admin", "staff"]);
    assert_eq!(user.role, Role::Admin);
    assert!(gateway.tokens().is_present());
}

/// A pool challenge is surfaced as an explicit step, not a success.
#[tokio::test]
async fn test_sign_in_challenge_surfaces_step() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("InitiateAuth")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ChallengeName": "SOFTWARE_TOKEN_MFA",
            "ChallengeParameters": {},
        })))
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    let err = gateway.sign_in("a@b.com", "Abc12345!").await.unwrap_err();

    assert_eq!(
        err,
        GatewayError::AdditionalStepRequired(AuthStep::SoftwareTokenMfa)
    );
    assert_eq!(err.user_message(), "Additional steps required");
    assert!(!gateway.tokens().is_present());
}

/// With no cached tokens, current_user answers None without a single
/// provider call.
#[tokio::test]
async fn test_current_user_short_circuits_when_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    let user = gateway.current_user().await.unwrap();
    assert!(user.is_none());
}

/// An unauthenticated answer clears the stale token set and maps to
/// "no user" rather than an error.
#[tokio::test]
async fn test_current_user_clears_stale_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("GetUser")))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "NotAuthorizedException",
            "Access Token has been revoked",
        )))
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    gateway
        .tokens()
        .replace(token_set(encode_id_token("u-1", "a@b.com", "A", &[])));

    let user = gateway.current_user().await.unwrap();
    assert!(user.is_none());
    assert!(!gateway.tokens().is_present());
}

/// Group claim carrying "admin" yields the admin role on fetch.
#[tokio::test]
async fn test_current_user_derives_role_from_groups() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("GetUser")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Username": "a-b-com",
            "UserAttributes": [{ "Name": "email", "Value": "a@b.com" }],
        })))
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    gateway.tokens().replace(token_set(encode_id_token(
        "u-1",
        "a@b.com",
        "A",
        &["admin", "staff"],
    )));
    let user = gateway.current_user().await.unwrap().unwrap();
    assert_eq!(user.role, Role::Admin);

    gateway
        .tokens()
        .replace(token_set(encode_id_token("u-2", "c@d.com", "C", &["staff"])));
    let user = gateway.current_user().await.unwrap().unwrap();
    assert_eq!(user.role, Role::User);
}

/// Duplicate registration yields the fixed message.
#[tokio::test]
async fn test_sign_up_duplicate_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("SignUp")))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "UsernameExistsException",
            "An account with the given email already exists.",
        )))
        .mount(&server)
        .await;

    let err = test_gateway(&server.uri())
        .sign_up(SignUpParams::new("a@b.com", "Abc12345!", "A"))
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::AccountExists);
    assert_eq!(err.user_message(), "Account already exists.");
}

/// Registration reports the code destination; a wrong confirmation
/// code comes back as a non-empty provider message.
#[tokio::test]
async fn test_sign_up_then_confirm_with_wrong_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("SignUp")))
        .and(body_partial_json(json!({
            "Username": "a@b.com",
            "UserAttributes": [
                { "Name": "email", "Value": "a@b.com" },
                { "Name": "name", "Value": "A" },
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserConfirmed": false,
            "UserSub": "u-900",
            "CodeDeliveryDetails": {
                "Destination": "a***@b***.com",
                "DeliveryMedium": "EMAIL",
            },
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("ConfirmSignUp")))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "CodeMismatchException",
            "Invalid verification code provided, please try again.",
        )))
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    let receipt = gateway
        .sign_up(SignUpParams::new("a@b.com", "Abc12345!", "A"))
        .await
        .unwrap();
    assert_eq!(receipt.user_id, "u-900");
    assert!(!receipt.user_confirmed);
    assert_eq!(receipt.code_destination.as_deref(), Some("a***@b***.com"));

    let err = gateway.confirm_sign_up("a@b.com", "000000").await.unwrap_err();
    assert!(!err.user_message().is_empty());
    assert_eq!(
        err,
        GatewayError::Provider("Invalid verification code provided, please try again.".to_string())
    );
}

/// Local tokens are dropped even when the provider sign-out call fails.
#[tokio::test]
async fn test_sign_out_clears_tokens_on_provider_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("GlobalSignOut")))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body(
            "InternalErrorException",
            "Something went wrong",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    gateway
        .tokens()
        .replace(token_set(encode_id_token("u-1", "a@b.com", "A", &[])));

    assert!(gateway.sign_out().await.is_err());
    assert!(!gateway.tokens().is_present());
}

/// Signing out while already signed out is a quiet no-op.
#[tokio::test]
async fn test_sign_out_without_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    assert!(gateway.sign_out().await.is_ok());
}

/// Password reset request and confirmation round uniform results.
#[tokio::test]
async fn test_password_reset_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("ForgotPassword")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "CodeDeliveryDetails": {
                "Destination": "a***@b***.com",
                "DeliveryMedium": "EMAIL",
            },
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header(TARGET, target("ConfirmForgotPassword")))
        .and(body_partial_json(json!({
            "Username": "a@b.com",
            "ConfirmationCode": "123456",
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri());
    let destination = gateway.reset_password("a@b.com").await.unwrap();
    assert_eq!(destination.as_deref(), Some("a***@b***.com"));

    gateway
        .confirm_reset_password("a@b.com", "123456", "NewAbc12345!")
        .await
        .unwrap();
}

use super::*;
use mockito::Matcher;

// Credentials header values

#[test]
fn test_anonymous_credentials_have_no_header() {
    let creds = Credentials::anonymous();
    assert_eq!(creds.to_header_value(), None);
}

#[test]
fn test_basic_credentials_header_value() {
    let creds = Credentials::basic("user", "pass");
    // base64("user:pass")
    assert_eq!(
        creds.to_header_value(),
        Some("Basic dXNlcjpwYXNz".to_string())
    );
}

#[test]
fn test_bearer_credentials_header_value() {
    let creds = Credentials::bearer("token123");
    assert_eq!(creds.to_header_value(), Some("Bearer token123".to_string()));
}

// CredentialsConfig

#[test]
fn test_default_config_is_empty() {
    let config = CredentialsConfig::default();
    assert!(config.is_empty());
}

#[test]
fn test_config_with_token_is_not_empty() {
    let config = CredentialsConfig {
        token: Some("tok".to_string()),
        ..Default::default()
    };
    assert!(!config.is_empty());
}

#[test]
fn test_config_deserializes_with_partial_fields() {
    let config: CredentialsConfig =
        serde_json::from_str(r#"{"username": "sandbox"}"#).unwrap();
    assert_eq!(config.username.as_deref(), Some("sandbox"));
    assert_eq!(config.auth_url, None);
    assert_eq!(config.token, None);
}

// CredentialClient

#[test]
fn test_authenticate_with_preset_token_skips_network() {
    let config = CredentialsConfig {
        token: Some("preset-token".to_string()),
        ..Default::default()
    };

    let client = CredentialClient::new(config).unwrap();
    let session = client.authenticate().unwrap();
    assert_eq!(session.token(), "preset-token");
    assert_eq!(client.get_token(&session), "preset-token");
}

#[test]
fn test_authenticate_missing_auth_url_fails() {
    let config = CredentialsConfig {
        username: Some("sandbox".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    };

    let client = CredentialClient::new(config).unwrap();
    let result = client.authenticate();
    assert!(matches!(result.unwrap_err(), ImageError::Config { .. }));
}

#[test]
fn test_authenticate_missing_username_fails() {
    let config = CredentialsConfig {
        auth_url: Some("http://localhost:5000".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    };

    let client = CredentialClient::new(config).unwrap();
    let result = client.authenticate();
    assert!(matches!(result.unwrap_err(), ImageError::Config { .. }));
}

#[test]
fn test_authenticate_success() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v3/auth/tokens")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": { "user": { "name": "sandbox" } }
                }
            }
        })))
        .with_status(201)
        .with_header("X-Subject-Token", "issued-token")
        .with_body("{}")
        .create();

    let config = CredentialsConfig {
        auth_url: Some(server.url()),
        username: Some("sandbox".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    };

    let client = CredentialClient::new(config).unwrap();
    let session = client.authenticate().unwrap();

    mock.assert();
    assert_eq!(session.token(), "issued-token");
}

#[test]
fn test_authenticate_sends_project_scope() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v3/auth/tokens")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "auth": { "scope": { "project": { "name": "sandboxes" } } }
        })))
        .with_status(201)
        .with_header("X-Subject-Token", "scoped-token")
        .with_body("{}")
        .create();

    let config = CredentialsConfig {
        auth_url: Some(server.url()),
        username: Some("sandbox".to_string()),
        password: Some("secret".to_string()),
        project: Some("sandboxes".to_string()),
        ..Default::default()
    };

    let client = CredentialClient::new(config).unwrap();
    let session = client.authenticate().unwrap();

    mock.assert();
    assert_eq!(session.token(), "scoped-token");
}

#[test]
fn test_authenticate_unauthorized() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v3/auth/tokens")
        .with_status(401)
        .with_body("invalid credentials")
        .create();

    let config = CredentialsConfig {
        auth_url: Some(server.url()),
        username: Some("sandbox".to_string()),
        password: Some("wrong".to_string()),
        ..Default::default()
    };

    let client = CredentialClient::new(config).unwrap();
    let result = client.authenticate();

    mock.assert();
    assert!(matches!(
        result.unwrap_err(),
        ImageError::Authentication { .. }
    ));
}

#[test]
fn test_authenticate_missing_token_header() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v3/auth/tokens")
        .with_status(201)
        .with_body("{}")
        .create();

    let config = CredentialsConfig {
        auth_url: Some(server.url()),
        username: Some("sandbox".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    };

    let client = CredentialClient::new(config).unwrap();
    let result = client.authenticate();

    mock.assert();
    assert!(matches!(result.unwrap_err(), ImageError::Validation { .. }));
}

#[test]
fn test_authenticate_server_error() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v3/auth/tokens")
        .with_status(503)
        .with_body("service unavailable")
        .create();

    let config = CredentialsConfig {
        auth_url: Some(server.url()),
        username: Some("sandbox".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    };

    let client = CredentialClient::new(config).unwrap();
    let result = client.authenticate();

    mock.assert();
    assert!(matches!(result.unwrap_err(), ImageError::Server { .. }));
}

use super::*;

#[test]
fn test_not_found_error() {
    let err = ImageError::not_found("ubuntu-server");
    assert!(matches!(err, ImageError::NotFound { .. }));
    assert_eq!(err.to_string(), "not found: ubuntu-server");
}

#[test]
fn test_network_error() {
    let err = ImageError::network("connection refused");
    assert!(matches!(err, ImageError::Network { .. }));
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn test_network_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let err = ImageError::network_with_source("failed to connect", io_err);
    assert!(matches!(err, ImageError::Network { .. }));

    use std::error::Error;
    assert!(err.source().is_some());
}

#[test]
fn test_authentication_error() {
    let err = ImageError::authentication("invalid credentials", Some(401));
    match err {
        ImageError::Authentication {
            message,
            status_code,
        } => {
            assert_eq!(message, "invalid credentials");
            assert_eq!(status_code, Some(401));
        }
        _ => panic!("expected Authentication error"),
    }
}

#[test]
fn test_authentication_error_without_status() {
    let err = ImageError::authentication("token rejected", None);
    assert!(matches!(
        err,
        ImageError::Authentication {
            status_code: None,
            ..
        }
    ));
}

#[test]
fn test_server_error() {
    let err = ImageError::server("internal server error", 500);
    match err {
        ImageError::Server {
            message,
            status_code,
        } => {
            assert_eq!(message, "internal server error");
            assert_eq!(status_code, 500);
        }
        _ => panic!("expected Server error"),
    }
}

#[test]
fn test_validation_error() {
    let err = ImageError::validation("catalog URL cannot be empty");
    assert!(matches!(err, ImageError::Validation { .. }));
    assert!(err.to_string().starts_with("validation error"));
}

#[test]
fn test_validation_error_with_source() {
    let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err = ImageError::validation_with_source("failed to parse listing", parse_err);
    assert!(matches!(err, ImageError::Validation { .. }));

    use std::error::Error;
    assert!(err.source().is_some());
}

#[test]
fn test_config_error() {
    let err = ImageError::config("target_path is required");
    assert!(matches!(err, ImageError::Config { .. }));
}

#[test]
fn test_io_error_from() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: ImageError = io_err.into();
    assert!(matches!(err, ImageError::Io(_)));
    assert_eq!(err.to_string(), "denied");
}

#[test]
fn test_errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ImageError>();
}

//! Tests for the auth module

use super::*;
use crate::config::SourceConfig;
use crate::error::Error;

#[test]
fn test_oauth_header() {
    let auth = AuthConfig::oauth_api_key("abc123");
    let headers = auth.headers();

    assert_eq!(headers.len(), 1);
    assert_eq!(
        headers.get("Authorization"),
        Some(&"OAuth abc123".to_string())
    );
}

#[test]
fn test_from_config() {
    let config = SourceConfig::with_api_key("my-key");
    let auth = AuthConfig::from_config(&config).unwrap();

    assert_eq!(
        auth.headers().get(AUTHORIZATION_HEADER),
        Some(&"OAuth my-key".to_string())
    );
}

#[test]
fn test_from_config_missing_api_key() {
    let config = SourceConfig::default();
    let err = AuthConfig::from_config(&config).unwrap_err();

    assert!(matches!(err, Error::MissingConfigField { .. }));
    assert_eq!(err.to_string(), "Missing required config field: api_key");
}

#[test]
fn test_debug_hides_key() {
    let auth = AuthConfig::oauth_api_key("do-not-print");
    let debug = format!("{auth:?}");
    assert!(!debug.contains("do-not-print"));
    assert!(debug.contains("Authorization"));
}

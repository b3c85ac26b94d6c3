use rental_hub::HubError;
use rental_hub::config::{Config, MIN_SECRET_LEN, REQUIRED_KEYS, validate_environment};
use std::collections::HashMap;

fn complete_env() -> HashMap<String, String> {
    [
        ("DATABASE_URL", "sqlite:data/primary.db"),
        ("MEDIA_DATABASE_URL", "sqlite:data/media.db"),
        ("JWT_SECRET", "a-very-long-secret-value-for-tests-0123456789"),
        ("PORT", "5000"),
        ("FRONTEND_URL", "https://rent.example.com"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[test]
fn complete_environment_passes_without_warnings() {
    let report = validate_environment(&complete_env()).expect("valid environment");
    assert!(report.warnings.is_empty());

    let cfg = Config::from_vars(&complete_env()).expect("config extracts");
    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.frontend_url, "https://rent.example.com");
}

#[test]
fn each_missing_required_key_is_fatal_and_named() {
    for key in REQUIRED_KEYS {
        let mut vars = complete_env();
        vars.remove(key);

        let err = validate_environment(&vars).expect_err("missing key must fail");
        match &err {
            HubError::MissingEnv(missing) => assert_eq!(missing, &vec![key.to_string()]),
            other => panic!("unexpected error for {key}: {other:?}"),
        }
        assert!(err.to_string().contains(key));
    }
}

#[test]
fn missing_jwt_secret_is_reported_by_name() {
    let mut vars = complete_env();
    vars.remove("JWT_SECRET");
    let err = validate_environment(&vars).unwrap_err();
    assert!(err.to_string().contains("JWT_SECRET"));
}

#[test]
fn all_missing_keys_are_reported_together() {
    let err = validate_environment(&HashMap::new()).unwrap_err();
    match err {
        HubError::MissingEnv(missing) => assert_eq!(missing, REQUIRED_KEYS.to_vec()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn blank_value_counts_as_missing() {
    let mut vars = complete_env();
    vars.insert("PORT".into(), "   ".into());
    assert!(matches!(
        validate_environment(&vars),
        Err(HubError::MissingEnv(keys)) if keys == vec!["PORT".to_string()]
    ));
}

#[test]
fn short_secret_only_warns() {
    for len in [1, 10, MIN_SECRET_LEN - 1] {
        let mut vars = complete_env();
        vars.insert("JWT_SECRET".into(), "s".repeat(len));
        let report = validate_environment(&vars).expect("short secret is not fatal");
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("JWT_SECRET"));
    }

    let mut vars = complete_env();
    vars.insert("JWT_SECRET".into(), "s".repeat(MIN_SECRET_LEN));
    assert!(validate_environment(&vars).unwrap().warnings.is_empty());
}

#[test]
fn store_uri_with_wrong_scheme_is_fatal() {
    for key in ["DATABASE_URL", "MEDIA_DATABASE_URL"] {
        let mut vars = complete_env();
        vars.insert(key.into(), "postgres://localhost/rentals".into());
        match validate_environment(&vars) {
            Err(HubError::InvalidEnv { key: bad, .. }) => assert_eq!(bad, key),
            other => panic!("expected InvalidEnv for {key}, got {other:?}"),
        }
    }
}

#[test]
fn non_numeric_port_is_fatal() {
    let mut vars = complete_env();
    vars.insert("PORT".into(), "http".into());
    assert!(matches!(
        validate_environment(&vars),
        Err(HubError::InvalidEnv { key, .. }) if key == "PORT"
    ));
}

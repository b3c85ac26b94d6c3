use crate::error::HubError;
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Keys the process refuses to start without, in reporting order.
pub const REQUIRED_KEYS: [&str; 4] = ["DATABASE_URL", "MEDIA_DATABASE_URL", "JWT_SECRET", "PORT"];

/// Store URIs are served by the SQLite driver.
pub const STORE_URI_SCHEME: &str = "sqlite:";

/// Secrets shorter than this still boot, with a warning.
pub const MIN_SECRET_LEN: usize = 32;

const STORE_URI_KEYS: [&str; 2] = ["DATABASE_URL", "MEDIA_DATABASE_URL"];

/// Non-fatal findings from a successful validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvReport {
    pub warnings: Vec<String>,
}

/// Check the raw environment before anything else reads it.
///
/// Every missing key is reported at once. Store URIs must carry the
/// [`STORE_URI_SCHEME`] prefix and `PORT` must be a valid port number.
/// A short `JWT_SECRET` only produces a warning.
pub fn validate_environment(vars: &HashMap<String, String>) -> Result<EnvReport, HubError> {
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| vars.get(**key).is_none_or(|v| v.trim().is_empty()))
        .map(|key| key.to_string())
        .collect();

    if !missing.is_empty() {
        for key in &missing {
            error!(key = %key, "required environment variable {} is not set", key);
        }
        return Err(HubError::MissingEnv(missing));
    }

    for key in STORE_URI_KEYS {
        let value = vars.get(key).map(|v| v.trim()).unwrap_or_default();
        if !value.starts_with(STORE_URI_SCHEME) {
            error!(
                key = %key,
                expected = STORE_URI_SCHEME,
                "{} does not use the expected scheme", key
            );
            return Err(HubError::InvalidEnv {
                key: key.to_string(),
                reason: format!("must start with `{STORE_URI_SCHEME}`"),
            });
        }
    }

    let port = vars.get("PORT").map(|v| v.trim()).unwrap_or_default();
    if port.parse::<u16>().is_err() {
        error!(key = "PORT", value = %port, "PORT is not a valid port number");
        return Err(HubError::InvalidEnv {
            key: "PORT".to_string(),
            reason: format!("`{port}` is not a valid port number"),
        });
    }

    let mut report = EnvReport::default();
    let secret_len = vars
        .get("JWT_SECRET")
        .map(|v| v.trim().chars().count())
        .unwrap_or_default();
    if secret_len < MIN_SECRET_LEN {
        warn!(
            key = "JWT_SECRET",
            length = secret_len,
            minimum = MIN_SECRET_LEN,
            "JWT_SECRET is shorter than recommended"
        );
        report.warnings.push(format!(
            "JWT_SECRET is {secret_len} characters; at least {MIN_SECRET_LEN} recommended"
        ));
    }

    info!(warnings = report.warnings.len(), "environment validated");
    Ok(report)
}

//! Process configuration.
//!
//! The raw key/value environment is checked by [`validate::validate_environment`]
//! first; only a validated map is extracted into [`Config`] through figment,
//! layered over [`Config::default`]. The result is built once at boot and
//! passed around explicitly.

pub mod validate;

use crate::error::HubError;
use figment::{Figment, providers::Serialized};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;

pub use validate::{EnvReport, MIN_SECRET_LEN, REQUIRED_KEYS, STORE_URI_SCHEME, validate_environment};

/// Deployment mode; anything other than `production` runs as development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeployMode {
    Production,
    #[default]
    Development,
}

impl From<String> for DeployMode {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            DeployMode::Production
        } else {
            DeployMode::Development
        }
    }
}

impl From<DeployMode> for String {
    fn from(mode: DeployMode) -> Self {
        mode.as_str().to_string()
    }
}

impl DeployMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DeployMode::Production => "production",
            DeployMode::Development => "development",
        }
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmtpTls {
    /// TLS from the first byte (usually port 465).
    #[serde(rename = "implicit")]
    Implicit,
    #[serde(rename = "starttls")]
    StartTls,
    /// Plaintext; only for local relays and mail catchers.
    #[serde(rename = "none")]
    Plain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub media_database_url: String,
    pub jwt_secret: String,
    #[serde(deserialize_with = "flexible_u16")]
    pub port: u16,

    pub smtp_host: Option<String>,
    #[serde(deserialize_with = "flexible_u16")]
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub smtp_tls: Option<SmtpTls>,
    pub email_from: String,

    pub frontend_url: String,
    pub app_env: DeployMode,
    /// REST root used by [`ApiClient::from_config`](crate::api::ApiClient::from_config).
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            media_database_url: String::new(),
            jwt_secret: String::new(),
            port: 5000,
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
            smtp_tls: None,
            email_from: "Rental Hub <no-reply@rentalhub.local>".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            app_env: DeployMode::Development,
            api_base_url: "http://localhost:5000/api".to_string(),
        }
    }
}

impl Config {
    /// Validate the process environment and extract the configuration from it.
    pub fn from_env() -> Result<(Self, EnvReport), HubError> {
        let vars: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let report = validate_environment(&vars)?;
        let cfg = Self::from_vars(&vars)?;
        Ok((cfg, report))
    }

    /// Extract from an already validated key/value map. Keys are matched
    /// case-insensitively; blank values fall back to the defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, HubError> {
        let layered: HashMap<String, String> = vars
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        let cfg = Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::globals(layered))
            .extract::<Config>()?;
        Ok(cfg)
    }

    pub fn is_production(&self) -> bool {
        self.app_env == DeployMode::Production
    }

    /// Explicit `SMTP_TLS`, otherwise implicit TLS on 465 and STARTTLS elsewhere.
    pub fn smtp_tls(&self) -> SmtpTls {
        self.smtp_tls.unwrap_or(if self.smtp_port == 465 {
            SmtpTls::Implicit
        } else {
            SmtpTls::StartTls
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Accept a port either as a number or as its decimal string form.
fn flexible_u16<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u16),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse::<u16>().map_err(serde::de::Error::custom),
    }
}

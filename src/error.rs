use axum::http::StatusCode;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum HubError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("invalid environment variable {key}: {reason}")]
    InvalidEnv { key: String, reason: String },

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Mail build error: {0}")]
    MailBuild(#[from] lettre::error::Error),

    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("API responded with {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    ApiStatus {
        status: StatusCode,
        message: Option<String>,
    },

    /// Human readable failure for the UI layer; displays as the bare message.
    #[error("{0}")]
    Request(String),
}

impl From<figment::Error> for HubError {
    fn from(e: figment::Error) -> Self {
        HubError::Config(Box::new(e))
    }
}

impl HubError {
    /// Server-provided message carried by an API rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            HubError::ApiStatus {
                message: Some(m), ..
            } => Some(m.as_str()),
            HubError::Request(m) => Some(m.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_bare_message() {
        let err = HubError::Request("Invalid credentials".to_string());
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.server_message(), Some("Invalid credentials"));
    }

    #[test]
    fn missing_env_names_every_key() {
        let err = HubError::MissingEnv(vec!["JWT_SECRET".into(), "PORT".into()]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: JWT_SECRET, PORT"
        );
    }

    #[test]
    fn api_status_carries_upstream_message() {
        let err = HubError::ApiStatus {
            status: StatusCode::NOT_FOUND,
            message: Some("Deal not found".into()),
        };
        assert_eq!(err.server_message(), Some("Deal not found"));
        assert_eq!(err.to_string(), "API responded with 404 Not Found: Deal not found");

        let bare = HubError::ApiStatus {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        };
        assert_eq!(bare.server_message(), None);
    }
}

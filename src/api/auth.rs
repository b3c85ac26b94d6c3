use super::client::ApiClient;
use crate::error::HubError;
use crate::types::{AuthPayload, LoginRequest, RegisterRequest};
use serde_json::{Value, json};

/// `/auth/*` endpoints.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, HubError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post_typed("auth/login", &body).await
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<AuthPayload, HubError> {
        self.client.post_typed("auth/register", data).await
    }

    /// Profile of the bearer of the current token.
    pub async fn me(&self) -> Result<Value, HubError> {
        self.client.get("auth/me").await
    }

    /// Ask the backend to issue a reset token and mail it.
    pub async fn forgot_password(&self, email: &str) -> Result<Value, HubError> {
        self.client
            .post("auth/forgot-password", &json!({ "email": email }))
            .await
    }

    pub async fn reset_password(&self, reset_token: &str, password: &str) -> Result<Value, HubError> {
        self.client
            .post(
                &format!("auth/reset-password/{reset_token}"),
                &json!({ "password": password }),
            )
            .await
    }
}

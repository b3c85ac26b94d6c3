use crate::config::Config;
use crate::error::HubError;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;
use url::Url;

/// Bearer token shared between the session and every facade built from
/// the same client.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(Arc<RwLock<Option<String>>>);

impl BearerToken {
    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, token: Option<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    bearer: BearerToken,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `https://rent.example.com/api`.
    pub fn new(base_url: &str) -> Result<Self, HubError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rental-hub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_http(http, base_url)
    }

    /// Client for the configured `API_BASE_URL`.
    pub fn from_config(cfg: &Config) -> Result<Self, HubError> {
        Self::new(&cfg.api_base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Result<Self, HubError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            bearer: BearerToken::default(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn bearer(&self) -> &BearerToken {
        &self.bearer
    }

    pub fn set_token(&self, token: Option<String>) {
        self.bearer.set(token);
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, HubError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, HubError> {
        let url = self.endpoint(path)?;
        debug!(method = %method, url = %url, "api request");
        let builder = self
            .http
            .request(method, url)
            .header("Accept", "application/json");
        Ok(match self.bearer.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub async fn get(&self, path: &str) -> Result<Value, HubError> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn get_with<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Value, HubError> {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, HubError> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, HubError> {
        self.send(self.request(Method::PATCH, path)?.json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, HubError> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    /// POST and decode into a concrete type.
    pub async fn post_typed<B, T>(&self, path: &str, body: &B) -> Result<T, HubError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = checked(self.request(Method::POST, path)?.json(body).send().await?).await?;
        Ok(resp.json::<T>().await?)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, HubError> {
        let resp = checked(builder.send().await?).await?;
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Turn a non-2xx reply into `ApiStatus`, keeping the server's `message`.
async fn checked(resp: Response) -> Result<Response, HubError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| extract_message(&v));
    debug!(status = %status, message = ?message, "api request rejected");
    Err(HubError::ApiStatus { status, message })
}

fn extract_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error").and_then(|e| e.get("message")))
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

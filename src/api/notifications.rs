use super::client::ApiClient;
use crate::error::HubError;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unread_only: bool,
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    client: ApiClient,
}

impl NotificationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &NotificationListQuery) -> Result<Value, HubError> {
        self.client.get_with("notifications", query).await
    }

    pub async fn unread_count(&self) -> Result<Value, HubError> {
        self.client.get("notifications/unread-count").await
    }

    pub async fn mark_read(&self, notification_id: &str) -> Result<Value, HubError> {
        self.client
            .patch(&format!("notifications/{notification_id}/read"), &json!({}))
            .await
    }

    pub async fn mark_all_read(&self) -> Result<Value, HubError> {
        self.client.patch("notifications/read-all", &json!({})).await
    }

    pub async fn delete(&self, notification_id: &str) -> Result<Value, HubError> {
        self.client
            .delete(&format!("notifications/{notification_id}"))
            .await
    }
}

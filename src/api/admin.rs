use super::client::ApiClient;
use crate::error::HubError;
use crate::types::{PageQuery, PropertyListQuery, PropertyStatus, UserListQuery};
use serde_json::{Value, json};

/// Moderation endpoints under `/admin/*`.
#[derive(Debug, Clone)]
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Dashboard counters.
    pub async fn stats(&self) -> Result<Value, HubError> {
        self.client.get("admin/stats").await
    }

    pub async fn list_users(&self, query: &UserListQuery) -> Result<Value, HubError> {
        self.client.get_with("admin/users", query).await
    }

    /// Activate or block an account.
    pub async fn update_user_status(&self, user_id: &str, active: bool) -> Result<Value, HubError> {
        self.client
            .patch(
                &format!("admin/users/{user_id}/status"),
                &json!({ "isActive": active }),
            )
            .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<Value, HubError> {
        self.client.delete(&format!("admin/users/{user_id}")).await
    }

    pub async fn list_properties(&self, query: &PropertyListQuery) -> Result<Value, HubError> {
        self.client.get_with("admin/properties", query).await
    }

    /// Approve or reject a listing, with an optional note for the owner.
    pub async fn update_property_status(
        &self,
        property_id: &str,
        status: PropertyStatus,
        note: Option<&str>,
    ) -> Result<Value, HubError> {
        self.client
            .patch(
                &format!("admin/properties/{property_id}/status"),
                &json!({ "status": status, "note": note }),
            )
            .await
    }

    pub async fn delete_property(&self, property_id: &str) -> Result<Value, HubError> {
        self.client
            .delete(&format!("admin/properties/{property_id}"))
            .await
    }

    pub async fn list_deals(&self, page: PageQuery) -> Result<Value, HubError> {
        self.client.get_with("admin/deals", &page).await
    }
}

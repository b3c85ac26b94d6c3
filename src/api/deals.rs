use super::client::ApiClient;
use crate::error::HubError;
use crate::types::{CreateDealRequest, DealListQuery};
use serde_json::{Value, json};

/// `/deals/*` endpoints: confirmed agreements and their receipts.
#[derive(Debug, Clone)]
pub struct DealService {
    client: ApiClient,
}

impl DealService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, deal: &CreateDealRequest) -> Result<Value, HubError> {
        self.client.post("deals", deal).await
    }

    pub async fn list(&self, query: &DealListQuery) -> Result<Value, HubError> {
        self.client.get_with("deals", query).await
    }

    pub async fn get(&self, deal_id: &str) -> Result<Value, HubError> {
        self.client.get(&format!("deals/{deal_id}")).await
    }

    pub async fn confirm(&self, deal_id: &str) -> Result<Value, HubError> {
        self.client
            .patch(&format!("deals/{deal_id}/confirm"), &json!({}))
            .await
    }

    pub async fn cancel(&self, deal_id: &str, reason: Option<&str>) -> Result<Value, HubError> {
        self.client
            .patch(
                &format!("deals/{deal_id}/cancel"),
                &json!({ "reason": reason }),
            )
            .await
    }

    /// Receipt recorded when the deal was confirmed or cancelled.
    pub async fn receipt(&self, deal_id: &str) -> Result<Value, HubError> {
        self.client.get(&format!("deals/{deal_id}/receipt")).await
    }
}

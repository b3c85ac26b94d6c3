use super::client::ApiClient;
use crate::error::HubError;
use crate::types::{CreateLeadRequest, LeadListQuery, LeadStage};
use serde_json::{Value, json};

/// `/leads/*` endpoints of the owner CRM.
#[derive(Debug, Clone)]
pub struct LeadService {
    client: ApiClient,
}

impl LeadService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Tenant expresses interest in a property.
    pub async fn create(&self, lead: &CreateLeadRequest) -> Result<Value, HubError> {
        self.client.post("leads", lead).await
    }

    pub async fn list(&self, query: &LeadListQuery) -> Result<Value, HubError> {
        self.client.get_with("leads", query).await
    }

    pub async fn get(&self, lead_id: &str) -> Result<Value, HubError> {
        self.client.get(&format!("leads/{lead_id}")).await
    }

    pub async fn update_stage(&self, lead_id: &str, stage: LeadStage) -> Result<Value, HubError> {
        self.client
            .patch(&format!("leads/{lead_id}/stage"), &json!({ "stage": stage }))
            .await
    }

    pub async fn add_note(&self, lead_id: &str, note: &str) -> Result<Value, HubError> {
        self.client
            .post(&format!("leads/{lead_id}/notes"), &json!({ "text": note }))
            .await
    }

    /// Lead counts per stage.
    pub async fn stats(&self) -> Result<Value, HubError> {
        self.client.get("leads/stats").await
    }
}

use super::health::health_handler;
use crate::config::DeployMode;
use crate::db::Stores;
use crate::mailer::Mailer;
use axum::{Router, routing::get};
use std::sync::Arc;

#[derive(Clone)]
pub struct HubState {
    pub stores: Arc<Stores>,
    pub mailer: Arc<Mailer>,
    pub mode: DeployMode,
}

impl HubState {
    pub fn new(stores: Arc<Stores>, mailer: Mailer, mode: DeployMode) -> Self {
        Self {
            stores,
            mailer: Arc::new(mailer),
            mode,
        }
    }
}

pub fn hub_router(state: HubState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

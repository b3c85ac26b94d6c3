use super::connector::{StoreConnector, StoreHandle, StoreKind};
use crate::config::Config;
use crate::error::HubError;
use serde::Serialize;
use std::sync::Arc;

/// The primary and media connectors. They share nothing: a failure on one
/// side never touches the other's cached handle.
#[derive(Debug)]
pub struct Stores {
    primary: StoreConnector,
    media: StoreConnector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreReadiness {
    pub primary: bool,
    pub media: bool,
}

impl StoreReadiness {
    pub fn all_ready(&self) -> bool {
        self.primary && self.media
    }
}

impl Stores {
    pub fn new(primary: StoreConnector, media: StoreConnector) -> Self {
        Self { primary, media }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            StoreConnector::new(StoreKind::Primary, cfg.database_url.clone()),
            StoreConnector::new(StoreKind::Media, cfg.media_database_url.clone()),
        )
    }

    pub async fn primary(&self) -> Result<Arc<StoreHandle>, HubError> {
        self.primary.connect().await
    }

    pub async fn media(&self) -> Result<Arc<StoreHandle>, HubError> {
        self.media.connect().await
    }

    /// Connect (or reuse) both stores and report which ones are usable.
    pub async fn readiness(&self) -> StoreReadiness {
        let (primary, media) = tokio::join!(self.primary.connect(), self.media.connect());
        StoreReadiness {
            primary: primary.is_ok_and(|h| h.is_ready()),
            media: media.is_ok_and(|h| h.is_ready()),
        }
    }
}

use crate::error::HubError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub type SqlitePool = Pool<Sqlite>;

const MAX_CONNECTIONS: u32 = 5;

/// Which backing store a connector serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Primary,
    Media,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKind::Primary => "primary",
            StoreKind::Media => "media",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live, reusable link to one store.
#[derive(Debug)]
pub struct StoreHandle {
    kind: StoreKind,
    pool: SqlitePool,
}

impl StoreHandle {
    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Ready until the pool has been closed.
    pub fn is_ready(&self) -> bool {
        !self.pool.is_closed()
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!(store = %self.kind, "store connection closed");
    }
}

/// Opens a store on first use and hands out the cached handle afterwards.
///
/// At most one live handle exists per connector. A failed attempt leaves
/// the cache empty and is returned to the caller as is; nothing here retries.
pub struct StoreConnector {
    kind: StoreKind,
    url: String,
    cached: Mutex<Option<Arc<StoreHandle>>>,
}

impl StoreConnector {
    pub fn new(kind: StoreKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    /// Return the cached handle when it is still ready, otherwise open a new one.
    pub async fn connect(&self) -> Result<Arc<StoreHandle>, HubError> {
        let mut cached = self.cached.lock().await;

        if let Some(handle) = cached.as_ref() {
            if handle.is_ready() {
                return Ok(handle.clone());
            }
            warn!(store = %self.kind, "cached store connection is closed; reconnecting");
            *cached = None;
        }

        let handle = Arc::new(self.open().await.inspect_err(|e| {
            error!(store = %self.kind, error = %e, "store connection failed");
        })?);
        info!(store = %self.kind, "store connected");
        *cached = Some(handle.clone());
        Ok(handle)
    }

    /// The cached handle, if one has been opened and is still ready.
    pub async fn current(&self) -> Option<Arc<StoreHandle>> {
        self.cached
            .lock()
            .await
            .as_ref()
            .filter(|h| h.is_ready())
            .cloned()
    }

    /// Drop the cached handle without closing it; the next `connect` reopens.
    pub async fn reset(&self) {
        if self.cached.lock().await.take().is_some() {
            debug!(store = %self.kind, "store connector reset");
        }
    }

    async fn open(&self) -> Result<StoreHandle, HubError> {
        let kind = self.kind;
        let connect_opts = SqliteConnectOptions::from_str(&self.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .after_connect(move |_conn, meta| {
                Box::pin(async move {
                    debug!(store = %kind, age = ?meta.age, "opened physical store connection");
                    Ok(())
                })
            })
            .connect_with(connect_opts)
            .await?;
        Ok(StoreHandle { kind, pool })
    }
}

impl fmt::Debug for StoreConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConnector")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

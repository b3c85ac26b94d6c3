//! Backing store connections.
//!
//! Layout:
//! - `connector.rs`: lazily opened, cached pool per store
//! - `stores.rs`: the primary and media connectors bundled for the app

pub mod connector;
pub mod stores;

pub use connector::{StoreConnector, StoreHandle, StoreKind};
pub use stores::{StoreReadiness, Stores};

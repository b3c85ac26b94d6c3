//! HTTP surface of the backend process.

pub mod health;
pub mod router;

pub use router::{HubState, hub_router};

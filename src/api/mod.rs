//! Typed wrappers over the marketplace REST backend.
//!
//! Every call is one request/response round trip. Payloads come back as
//! decoded JSON exactly as the server sent them; nothing here retries,
//! caches or validates.

pub mod admin;
pub mod auth;
pub mod client;
pub mod deals;
pub mod leads;
pub mod notifications;

pub use admin::AdminService;
pub use auth::AuthService;
pub use client::{ApiClient, BearerToken};
pub use deals::DealService;
pub use leads::LeadService;
pub use notifications::{NotificationListQuery, NotificationService};

pub mod deal;
pub mod envelope;
pub mod lead;
pub mod listing;
pub mod user;

pub use deal::{CreateDealRequest, DealListQuery, DealStatus};
pub use envelope::{ApiEnvelope, PageQuery, Pagination};
pub use lead::{CreateLeadRequest, LeadListQuery, LeadStage};
pub use listing::{PropertyListQuery, PropertyStatus, UserListQuery};
pub use user::{AuthPayload, LoginRequest, RegisterRequest, Role, User};

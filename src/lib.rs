pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod mailer;
pub mod server;
pub mod session;
pub mod types;

pub use config::Config;
pub use error::HubError;
pub use mailer::Mailer;
pub use session::SessionContext;

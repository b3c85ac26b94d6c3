//! Client-side session: who is logged in, and the token their requests carry.
//!
//! Layout:
//! - `storage.rs`: persistence port plus in-memory and file backed stores
//! - `context.rs`: the session state machine on top of the port

pub mod context;
pub mod storage;

pub use context::{AuthStatus, LOGIN_PATH, Navigator, NoopNavigator, SessionContext};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};

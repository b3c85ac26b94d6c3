use super::storage::{SessionStorage, TOKEN_KEY, USER_KEY};
use crate::api::{AdminService, ApiClient, AuthService, DealService, LeadService, NotificationService};
use crate::error::HubError;
use crate::types::{AuthPayload, RegisterRequest, User};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// Where `logout` sends the user.
pub const LOGIN_PATH: &str = "/login";

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";

/// Full navigation to another surface of the app.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator for headless use; only logs the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, path: &str) {
        info!(path = %path, "navigation requested");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug)]
struct SessionState {
    user: Option<User>,
    token: Option<String>,
    loading: bool,
}

/// The single authority over who is logged in.
///
/// Every change is written to storage before memory is updated, so storage
/// never runs ahead of what this context reports. Concurrent `login` and
/// `logout` calls are not ordered; the last storage write wins.
pub struct SessionContext {
    client: ApiClient,
    auth: AuthService,
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<SessionState>,
}

impl SessionContext {
    /// A fresh context is unauthenticated and loading until [`hydrate`](Self::hydrate) runs.
    pub fn new(
        client: ApiClient,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            client,
            storage,
            navigator,
            state: RwLock::new(SessionState {
                user: None,
                token: None,
                loading: true,
            }),
        }
    }

    /// Restore a previous session from storage without asking the server.
    ///
    /// Both a token and a readable identity are needed; anything less leaves
    /// the context unauthenticated. A stored identity that no longer parses is
    /// removed from storage. Loading is over once this returns, whatever the outcome.
    pub fn hydrate(&self) -> Result<AuthStatus, HubError> {
        let restored = self.read_stored();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.loading = false;

        match restored? {
            Some((token, user)) => {
                info!(user_id = %user.id, role = %user.role, "session restored from storage");
                self.client.set_token(Some(token.clone()));
                state.token = Some(token);
                state.user = Some(user);
                Ok(AuthStatus::Authenticated)
            }
            None => Ok(AuthStatus::Unauthenticated),
        }
    }

    fn read_stored(&self) -> Result<Option<(String, User)>, HubError> {
        let token = self.storage.get(TOKEN_KEY).inspect_err(|e| {
            warn!(error = %e, "failed to read stored token");
        })?;
        let user_json = self.storage.get(USER_KEY).inspect_err(|e| {
            warn!(error = %e, "failed to read stored user");
        })?;

        let (Some(token), Some(user_json)) = (token, user_json) else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Ok(Some((token, user))),
            Err(e) => {
                warn!(error = %e, "discarding unreadable stored user");
                self.storage.remove(TOKEN_KEY)?;
                self.storage.remove(USER_KEY)?;
                Ok(None)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, HubError> {
        let payload = self
            .auth
            .login(email, password)
            .await
            .map_err(|e| request_error(e, LOGIN_FALLBACK))?;
        self.establish(payload)
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<User, HubError> {
        let payload = self
            .auth
            .register(data)
            .await
            .map_err(|e| request_error(e, REGISTER_FALLBACK))?;
        self.establish(payload)
    }

    /// Forget the session and navigate to [`LOGIN_PATH`].
    ///
    /// Memory is cleared and the navigation happens even when storage fails;
    /// the storage error is returned afterwards.
    pub fn logout(&self) -> Result<(), HubError> {
        let token_removed = self.storage.remove(TOKEN_KEY);
        let user_removed = self.storage.remove(USER_KEY);

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.token = None;
            state.user = None;
        }
        self.client.set_token(None);
        info!("session cleared");

        self.navigator.navigate(LOGIN_PATH);
        token_removed.and(user_removed).inspect_err(|e| {
            warn!(error = %e, "failed to clear stored session");
        })
    }

    fn establish(&self, payload: AuthPayload) -> Result<User, HubError> {
        let user_json = serde_json::to_string(&payload.user)?;
        let previous_token = self.storage.get(TOKEN_KEY)?;
        self.storage.set(TOKEN_KEY, &payload.token)?;
        if let Err(e) = self.storage.set(USER_KEY, &user_json) {
            warn!(error = %e, "failed to store identity; restoring previous token");
            self.restore_token(previous_token);
            return Err(e);
        }

        self.client.set_token(Some(payload.token.clone()));
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.token = Some(payload.token);
        state.user = Some(payload.user.clone());
        info!(user_id = %payload.user.id, role = %payload.user.role, "session established");
        Ok(payload.user)
    }

    /// Put the token that matches the stored identity back. If even that
    /// fails, drop the identity so no mismatched pair can be hydrated.
    fn restore_token(&self, previous: Option<String>) {
        let restored = match previous {
            Some(token) => self.storage.set(TOKEN_KEY, &token),
            None => self.storage.remove(TOKEN_KEY),
        };
        if let Err(e) = restored {
            warn!(error = %e, "failed to restore previous token; clearing stored identity");
            if let Err(e) = self.storage.remove(USER_KEY) {
                warn!(error = %e, "stored session may be inconsistent");
            }
        }
    }

    pub fn user(&self) -> Option<User> {
        self.read_state(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.read_state(|s| s.token.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.read_state(|s| s.loading)
    }

    pub fn status(&self) -> AuthStatus {
        self.read_state(|s| {
            if s.token.is_some() && s.user.is_some() {
                AuthStatus::Authenticated
            } else {
                AuthStatus::Unauthenticated
            }
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    fn read_state<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Client carrying this session's bearer token.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.client.clone())
    }

    pub fn deals(&self) -> DealService {
        DealService::new(self.client.clone())
    }

    pub fn leads(&self) -> LeadService {
        LeadService::new(self.client.clone())
    }

    pub fn notifications(&self) -> NotificationService {
        NotificationService::new(self.client.clone())
    }
}

/// Reduce a failed auth call to the message the UI shows.
fn request_error(err: HubError, fallback: &str) -> HubError {
    match err {
        HubError::ApiStatus {
            status,
            message: Some(message),
        } => {
            warn!(status = %status, message = %message, "auth request rejected");
            HubError::Request(message)
        }
        other => {
            warn!(error = %other, "auth request failed");
            HubError::Request(fallback.to_string())
        }
    }
}

use rental_hub::HubError;
use rental_hub::api::ApiClient;
use rental_hub::session::{
    AuthStatus, FileStorage, LOGIN_PATH, MemoryStorage, Navigator, SessionContext, SessionStorage,
    TOKEN_KEY, USER_KEY,
};
use rental_hub::types::{RegisterRequest, Role, User};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_string());
    }
}

/// Memory storage whose writes to chosen keys fail like a full disk.
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    failing_sets: Vec<&'static str>,
    failing_removes: Vec<&'static str>,
}

impl FlakyStorage {
    fn disk_full() -> HubError {
        HubError::Io(std::io::Error::other("disk full"))
    }
}

impl SessionStorage for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, HubError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HubError> {
        if self.failing_sets.iter().any(|k| *k == key) {
            return Err(Self::disk_full());
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), HubError> {
        if self.failing_removes.iter().any(|k| *k == key) {
            return Err(Self::disk_full());
        }
        self.inner.remove(key)
    }
}

fn tenant_json() -> Value {
    json!({
        "_id": "u-tenant-2",
        "name": "Tess Tenant",
        "email": "tess@x.com",
        "role": "tenant"
    })
}

fn owner_json() -> Value {
    json!({
        "_id": "u-owner-1",
        "name": "Olive Owner",
        "email": "owner@x.com",
        "phone": "+15550100",
        "role": "owner"
    })
}

fn session_for(
    server: &MockServer,
    storage: Arc<dyn SessionStorage>,
) -> (SessionContext, Arc<RecordingNavigator>) {
    let client = ApiClient::new(&format!("{}/api", server.uri())).unwrap();
    let navigator = Arc::new(RecordingNavigator::default());
    let session = SessionContext::new(client, storage, navigator.clone());
    (session, navigator)
}

#[tokio::test]
async fn login_persists_token_and_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "owner@x.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "tok-1",
            "user": owner_json()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let (session, _) = session_for(&server, storage.clone());
    assert!(session.is_loading());
    assert_eq!(session.hydrate().unwrap(), AuthStatus::Unauthenticated);
    assert!(!session.is_loading());

    let user = session.login("owner@x.com", "secret").await.expect("login");
    let expected: User = serde_json::from_value(owner_json()).unwrap();
    assert_eq!(user, expected);

    assert_eq!(session.status(), AuthStatus::Authenticated);
    assert_eq!(session.user(), Some(expected.clone()));
    assert_eq!(session.token().as_deref(), Some("tok-1"));
    assert_eq!(session.client().bearer().get().as_deref(), Some("tok-1"));

    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
    let stored: User = serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn login_failure_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let (session, _) = session_for(&server, storage.clone());
    session.hydrate().unwrap();

    let err = session.login("owner@x.com", "bad").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn login_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (session, _) = session_for(&server, Arc::new(MemoryStorage::new()));
    let err = session.login("owner@x.com", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "Login failed");
}

#[tokio::test]
async fn register_establishes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "token": "tok-new",
            "user": { "id": "u-tenant-9", "name": "Tess", "email": "tess@x.com", "role": "tenant" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let (session, _) = session_for(&server, storage.clone());
    let user = session
        .register(&RegisterRequest {
            name: "Tess".into(),
            email: "tess@x.com".into(),
            phone: None,
            password: "pw-123456".into(),
            role: Role::Tenant,
        })
        .await
        .expect("register");

    assert_eq!(user.role, Role::Tenant);
    assert_eq!(user.phone, None);
    assert!(session.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-new"));
}

#[tokio::test]
async fn register_conflict_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Email already registered" })),
        )
        .mount(&server)
        .await;

    let (session, _) = session_for(&server, Arc::new(MemoryStorage::new()));
    let err = session
        .register(&RegisterRequest {
            name: "Tess".into(),
            email: "tess@x.com".into(),
            phone: Some("+15550101".into()),
            password: "pw".into(),
            role: Role::Tenant,
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
}

#[tokio::test]
async fn logout_clears_everything_and_navigates_to_login() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::with_entries([
        (TOKEN_KEY, "tok-1".to_string()),
        (USER_KEY, owner_json().to_string()),
    ]));
    let (session, navigator) = session_for(&server, storage.clone());
    assert_eq!(session.hydrate().unwrap(), AuthStatus::Authenticated);

    session.logout().unwrap();

    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
    assert_eq!(session.user(), None);
    assert_eq!(session.token(), None);
    assert_eq!(session.client().bearer().get(), None);
    assert_eq!(navigator.visits(), vec![LOGIN_PATH.to_string()]);
}

#[tokio::test]
async fn logout_when_already_logged_out_is_harmless() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    let (session, navigator) = session_for(&server, storage.clone());
    session.hydrate().unwrap();

    session.logout().unwrap();
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(navigator.visits(), vec![LOGIN_PATH.to_string()]);
}

#[tokio::test]
async fn hydration_trusts_storage_without_a_round_trip() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::with_entries([
        (TOKEN_KEY, "tok-stale".to_string()),
        (USER_KEY, owner_json().to_string()),
    ]));
    let (session, _) = session_for(&server, storage);

    assert_eq!(session.hydrate().unwrap(), AuthStatus::Authenticated);
    assert!(!session.is_loading());
    assert_eq!(session.user().map(|u| u.id), Some("u-owner-1".to_string()));
    assert_eq!(session.token().as_deref(), Some("tok-stale"));
}

#[tokio::test]
async fn hydration_needs_both_token_and_identity() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::with_entries([(TOKEN_KEY, "tok-only")]));
    let (session, _) = session_for(&server, storage);

    assert_eq!(session.hydrate().unwrap(), AuthStatus::Unauthenticated);
    assert!(!session.is_loading());
    assert_eq!(session.user(), None);
}

#[tokio::test]
async fn unreadable_stored_identity_is_discarded() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::with_entries([
        (TOKEN_KEY, "tok-1"),
        (USER_KEY, "{not json"),
    ]));
    let (session, _) = session_for(&server, storage.clone());

    assert_eq!(session.hydrate().unwrap(), AuthStatus::Unauthenticated);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn facades_from_session_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-42",
            "user": owner_json()
        })))
        .mount(&server)
        .await;
    let receipt = json!({ "success": true, "data": { "receiptNo": "R-0001", "status": "confirmed" } });
    Mock::given(method("GET"))
        .and(path("/api/deals/d-1/receipt"))
        .and(header("authorization", "Bearer tok-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(receipt.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _) = session_for(&server, Arc::new(MemoryStorage::new()));
    session.login("owner@x.com", "secret").await.unwrap();

    let payload = session.deals().receipt("d-1").await.unwrap();
    assert_eq!(payload, receipt);
}

#[tokio::test]
async fn file_storage_session_survives_restart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-disk",
            "user": owner_json()
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let (first, _) = session_for(&server, Arc::new(FileStorage::new(&file)));
    first.hydrate().unwrap();
    first.login("owner@x.com", "secret").await.unwrap();
    drop(first);

    let (second, _) = session_for(&server, Arc::new(FileStorage::new(&file)));
    assert_eq!(second.hydrate().unwrap(), AuthStatus::Authenticated);
    assert_eq!(second.token().as_deref(), Some("tok-disk"));

    second.logout().unwrap();
    let (third, _) = session_for(&server, Arc::new(FileStorage::new(&file)));
    assert_eq!(third.hydrate().unwrap(), AuthStatus::Unauthenticated);
}

async fn mount_tenant_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-B",
            "user": tenant_json()
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn failed_identity_write_keeps_previous_session_pair() {
    let server = MockServer::start().await;
    mount_tenant_login(&server).await;

    let storage = Arc::new(FlakyStorage {
        inner: MemoryStorage::with_entries([
            (TOKEN_KEY, "tok-A".to_string()),
            (USER_KEY, owner_json().to_string()),
        ]),
        failing_sets: vec![USER_KEY],
        ..Default::default()
    });
    let (session, _) = session_for(&server, storage.clone());
    assert_eq!(session.hydrate().unwrap(), AuthStatus::Authenticated);

    let err = session.login("tess@x.com", "secret").await.unwrap_err();
    assert!(matches!(err, HubError::Io(_)));

    assert_eq!(session.token().as_deref(), Some("tok-A"));
    assert_eq!(session.user().map(|u| u.id), Some("u-owner-1".to_string()));
    assert_eq!(session.client().bearer().get().as_deref(), Some("tok-A"));

    let (reopened, _) = session_for(&server, storage);
    assert_eq!(reopened.hydrate().unwrap(), AuthStatus::Authenticated);
    assert_eq!(reopened.token().as_deref(), Some("tok-A"));
    assert_eq!(reopened.user().map(|u| u.id), Some("u-owner-1".to_string()));
}

#[tokio::test]
async fn failed_identity_write_on_fresh_storage_leaves_no_token() {
    let server = MockServer::start().await;
    mount_tenant_login(&server).await;

    let storage = Arc::new(FlakyStorage {
        failing_sets: vec![USER_KEY],
        ..Default::default()
    });
    let (session, _) = session_for(&server, storage.clone());
    session.hydrate().unwrap();

    assert!(session.login("tess@x.com", "secret").await.is_err());
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn unrestorable_token_never_hydrates() {
    let server = MockServer::start().await;
    mount_tenant_login(&server).await;

    let storage = Arc::new(FlakyStorage {
        failing_sets: vec![USER_KEY],
        failing_removes: vec![TOKEN_KEY],
        ..Default::default()
    });
    let (session, _) = session_for(&server, storage.clone());
    session.hydrate().unwrap();
    assert!(session.login("tess@x.com", "secret").await.is_err());
    assert_eq!(session.status(), AuthStatus::Unauthenticated);

    // The new token could not be taken back, but no identity sits next to it.
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
    let (reopened, _) = session_for(&server, storage);
    assert_eq!(reopened.hydrate().unwrap(), AuthStatus::Unauthenticated);
}

#[tokio::test]
async fn failed_token_write_changes_nothing() {
    let server = MockServer::start().await;
    mount_tenant_login(&server).await;

    let storage = Arc::new(FlakyStorage {
        failing_sets: vec![TOKEN_KEY],
        ..Default::default()
    });
    let (session, _) = session_for(&server, storage.clone());
    session.hydrate().unwrap();

    let err = session.login("tess@x.com", "secret").await.unwrap_err();
    assert_eq!(err.to_string(), "IO error: disk full");
    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert_eq!(session.client().bearer().get(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn logout_clears_memory_and_navigates_even_when_storage_fails() {
    let server = MockServer::start().await;
    let storage = Arc::new(FlakyStorage {
        inner: MemoryStorage::with_entries([
            (TOKEN_KEY, "tok-A".to_string()),
            (USER_KEY, owner_json().to_string()),
        ]),
        failing_removes: vec![TOKEN_KEY],
        ..Default::default()
    });
    let (session, navigator) = session_for(&server, storage.clone());
    assert_eq!(session.hydrate().unwrap(), AuthStatus::Authenticated);

    let err = session.logout().unwrap_err();
    assert!(matches!(err, HubError::Io(_)));

    assert_eq!(session.status(), AuthStatus::Unauthenticated);
    assert_eq!(session.token(), None);
    assert_eq!(session.client().bearer().get(), None);
    assert_eq!(navigator.visits(), vec![LOGIN_PATH.to_string()]);
    // The identity half still went away, so the leftover token cannot hydrate.
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
    let (reopened, _) = session_for(&server, storage);
    assert_eq!(reopened.hydrate().unwrap(), AuthStatus::Unauthenticated);
}

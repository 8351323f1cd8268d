//! Shared fixtures: an in-memory `UserStore` and a router wired to it.
#![allow(dead_code)]

use std::sync::{Arc, LazyLock, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::Utc;
use roster::{
    models::user::{NewUser, UserModel},
    startup::{AppState, router},
    store::{StoreError, UserStore},
    telemetry::{get_subscriber, init_subscriber},
};
use tower::ServiceExt;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            get_subscriber(subscriber_name, default_filter_level, std::io::stdout, None).unwrap();
        init_subscriber(subscriber).unwrap();
    } else {
        let subscriber =
            get_subscriber(subscriber_name, default_filter_level, std::io::sink, None).unwrap();
        init_subscriber(subscriber).unwrap();
    };
});

/// Keeps rows in a `Vec` and enforces email uniqueness like the real table.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<UserModel>>,
}

impl MemoryUserStore {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, new_user: &NewUser) -> Result<UserModel, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email()) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = UserModel {
            id: users.len() as i32 + 1,
            username: new_user.username().to_string(),
            email: new_user.email().to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<UserModel>, StoreError> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }
}

/// Never sees an existing email, so only the insert-time constraint can catch
/// a duplicate. Stands in for two requests racing each other.
#[derive(Debug, Default)]
pub struct RacingUserStore {
    inner: MemoryUserStore,
}

#[async_trait]
impl UserStore for RacingUserStore {
    async fn insert(&self, new_user: &NewUser) -> Result<UserModel, StoreError> {
        self.inner.insert(new_user).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<UserModel>, StoreError> {
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<UserModel>, StoreError> {
        self.inner.list_all().await
    }
}

/// Fails every call the way a dropped connection pool would.
#[derive(Debug, Default)]
pub struct BrokenUserStore;

#[async_trait]
impl UserStore for BrokenUserStore {
    async fn insert(&self, _new_user: &NewUser) -> Result<UserModel, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _id: i32) -> Result<Option<UserModel>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<UserModel>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list_all(&self) -> Result<Vec<UserModel>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryUserStore>,
}

pub fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let store = Arc::new(MemoryUserStore::default());
    let router = router(AppState::new(store.clone()));
    TestApp { router, store }
}

pub fn app_with_store(store: Arc<dyn UserStore>) -> Router {
    LazyLock::force(&TRACING);
    router(AppState::new(store))
}

pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn text_body(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(&self.router, request).await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(&self.router, request).await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(&self.router, request).await
    }

    /// Inserts through the store, bypassing the HTTP layer.
    pub async fn add_user(&self, username: &str, email: &str) -> UserModel {
        let new_user = NewUser::parse(username.to_string(), email.to_string()).unwrap();
        self.store.insert(&new_user).await.unwrap()
    }
}

pub fn assert_failure(status: StatusCode, body: &serde_json::Value, message: &str) {
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failure");
    assert_eq!(body["message"], message);
}

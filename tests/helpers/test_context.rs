//! Test context for unified test setup
//!
//! Builds the real router over either the test database or a lazy pool that
//! never connects, with the storage service pointed at a wiremock server.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;

use bakeshop::config::Settings;
use bakeshop::{router, AppState, DatabaseService};

use super::{database_helper::TestDatabase, storage_mock::StorageMockServer};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const ADMIN_EMAIL: &str = "owner@bakeshop.test";
pub const PASSWORD: &str = "sugar-and-spice";

const MULTIPART_BOUNDARY: &str = "bakeshop-test-boundary";

/// Unified test context that manages all test components
pub struct TestContext {
    pub database: Option<TestDatabase>,
    pub storage_mock: StorageMockServer,
    pub settings: Settings,
    pub state: AppState,
    pub app: Router,
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Context over a fresh, migrated test database
    pub async fn new() -> Self {
        let database = TestDatabase::connect().await;
        let pool = database.pool.clone();
        Self::build(Some(database), pool, 1000).await
    }

    /// Context whose pool never connects. Only requests rejected before any
    /// query may be sent through it.
    pub async fn without_database() -> Self {
        Self::without_database_limited(1000).await
    }

    pub async fn without_database_limited(requests_per_minute: u32) -> Self {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost:1/unreachable")
            .expect("Failed to create lazy pool");
        Self::build(None, pool, requests_per_minute).await
    }

    async fn build(database: Option<TestDatabase>, pool: sqlx::PgPool, requests_per_minute: u32) -> Self {
        let storage_mock = StorageMockServer::new().await;
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut settings = Settings::default();
        settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
        settings.auth.admin_emails = vec![ADMIN_EMAIL.to_string()];
        settings.storage.api_url = storage_mock.api_url();
        settings.storage.api_key = "test-key".to_string();
        settings.logging.file_path = temp_dir.path().to_string_lossy().to_string();
        settings.rate_limit.requests_per_minute = requests_per_minute;
        if let Some(db) = &database {
            settings.database.url = db.database_url.clone();
        }

        let state = AppState::new(settings.clone(), DatabaseService::new(pool)).expect("Failed to build state");
        let app = router(state.clone());

        Self {
            database,
            storage_mock,
            settings,
            state,
            app,
            temp_dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };
        (status, body)
    }

    /// Send a JSON request
    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Send a single-file multipart upload under the field name `file`
    pub async fn upload(
        &self,
        uri: &str,
        token: Option<&str>,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n", filename).as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        self.send(builder.body(Body::from(body)).expect("Failed to build request")).await
    }

    /// Register an account and return its bearer token
    pub async fn sign_up(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/sign-up",
                None,
                serde_json::json!({ "email": email, "password": PASSWORD, "full_name": "Test Customer" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "sign-up failed: {}", body);
        body["token"].as_str().expect("token in response").to_string()
    }

    /// Register the configured owner account, which is granted admin on sign-up
    pub async fn admin_token(&self) -> String {
        self.sign_up(ADMIN_EMAIL).await
    }
}

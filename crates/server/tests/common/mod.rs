//! Common test utilities for end-to-end API testing.
//!
//! Builds the real router in-process with an in-memory notification queue
//! and a deterministic settlement provider, so full flows run without
//! external infrastructure.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use faregate_core::testing::{FixedSettlement, MemoryQueue};
use faregate_core::{
    create_notifier, Config, Db, NotificationQueue, PaymentProcessor, PaymentStore,
    SqlitePaymentStore, SqliteTicketStore, SqliteUserStore, TicketStore, TokenGate, UserStore,
};
use faregate_server::api::create_router;
use faregate_server::state::AppState;

/// Test fixture wrapping an in-process server.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The notification queue records land on (nothing consumes it here)
    pub queue: Arc<MemoryQueue>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture whose settlement gateway approves every payment.
    pub async fn new() -> Self {
        Self::with_settlement(FixedSettlement::approving()).await
    }

    /// Fixture whose settlement gateway declines every payment.
    pub async fn declining() -> Self {
        Self::with_settlement(FixedSettlement::declining()).await
    }

    pub async fn with_settlement(settlement: FixedSettlement) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db = Db::open(&db_path).expect("Failed to open database");

        let users: Arc<dyn UserStore> = Arc::new(SqliteUserStore::new(db.clone()));
        let tickets: Arc<dyn TicketStore> = Arc::new(SqliteTicketStore::new(db.clone()));
        let payments: Arc<dyn PaymentStore> = Arc::new(SqlitePaymentStore::new(db));

        let queue = Arc::new(MemoryQueue::new());
        let (notifier, pump) =
            create_notifier(Arc::clone(&queue) as Arc<dyn NotificationQueue>, 100);
        tokio::spawn(pump.run());

        let config = Config::default();
        let auth = TokenGate::new(config.auth.secret.clone());
        let processor = PaymentProcessor::new(
            Arc::clone(&tickets),
            Arc::clone(&payments),
            Arc::new(settlement),
            notifier.clone(),
        );

        let state = Arc::new(AppState::new(
            config, auth, users, tickets, payments, processor, notifier,
        ));

        let router = create_router(state);

        Self {
            router,
            queue,
            temp_dir,
        }
    }

    /// Register a user and log in, returning `(token, user_id)`.
    pub async fn register_and_login(&self, username: &str) -> (String, String) {
        let response = self
            .post(
                "/api/v1/register",
                json!({
                    "username": username,
                    "password": "hunter2",
                    "email": format!("{username}@example.com"),
                }),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "register failed: {:?}",
            response.body
        );
        let user_id = response.body["user_id"].as_str().unwrap().to_string();

        let response = self
            .post(
                "/api/v1/login",
                json!({ "username": username, "password": "hunter2" }),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "login failed: {:?}",
            response.body
        );
        let token = response.body["token"].as_str().unwrap().to_string();

        (token, user_id)
    }

    /// Create a ticket for the given token, returning its id.
    pub async fn create_ticket(&self, token: &str, ticket_type: &str, route: &str) -> String {
        let response = self
            .post_auth(
                "/api/v1/tickets",
                json!({ "ticket_type": ticket_type, "route": route }),
                token,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "ticket creation failed: {:?}",
            response.body
        );
        response.body["id"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> TestResponse {
        self.request("GET", path, None, Some(token)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), None).await
    }

    pub async fn post_auth(&self, path: &str, body: Value, token: &str) -> TestResponse {
        self.request("POST", path, Some(body), Some(token)).await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            request_builder =
                request_builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

//! Common test utilities for checkout-service integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use checkout_service::config::{CheckoutConfig, CorsConfig, DatabaseConfig, RazorpayConfig};
use checkout_service::models::{NewProduct, Product};
use checkout_service::services::{Database, ProductRepository, RazorpayClient};
use checkout_service::startup::{build_router, AppState};
use secrecy::Secret;
use service_core::config::Config as CommonConfig;
use service_core::error::AppError;
use std::sync::Once;
use tower::ServiceExt;
use wiremock::MockServer;

pub const TEST_KEY_ID: &str = "rzp_test_key_id";
pub const TEST_KEY_SECRET: &str = "test_key_secret";

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,checkout_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub struct TestApp {
    pub router: Router,
    pub db: Database,
    /// Stand-in for the Razorpay API.
    pub gateway: MockServer,
    pub razorpay: RazorpayClient,
}

impl TestApp {
    pub async fn spawn() -> Self {
        init_tracing();

        let gateway = MockServer::start().await;

        let config = CheckoutConfig {
            common: CommonConfig::default(),
            service_name: "checkout-service-test".to_string(),
            log_level: "debug".to_string(),
            otlp_endpoint: None,
            // One connection: every new connection to `:memory:` is a fresh,
            // empty database.
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
            },
            razorpay: RazorpayConfig {
                key_id: TEST_KEY_ID.to_string(),
                key_secret: Secret::new(TEST_KEY_SECRET.to_string()),
                api_base_url: gateway.uri(),
            },
            cors: CorsConfig::default(),
            seed_file: None,
        };

        let db = Database::new(&config.database)
            .await
            .expect("Failed to open test database");
        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let razorpay = RazorpayClient::new(config.razorpay.clone());

        let router = build_router(AppState {
            config,
            db: db.clone(),
            razorpay: razorpay.clone(),
        });

        TestApp {
            router,
            db,
            gateway,
            razorpay,
        }
    }

    /// Insert a product through its own short-lived connection.
    pub async fn add_product(
        &self,
        barcode: &str,
        name: &str,
        price: f64,
    ) -> Result<Product, AppError> {
        let mut conn = self.db.acquire().await?;
        ProductRepository::new(&mut conn)
            .add_product(&NewProduct::new(barcode, name, price))
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

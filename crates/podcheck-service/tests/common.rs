//! Common test utilities for podcheck integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use podcheck_core::UserId;
use podcheck_service::{create_router, AppState, ServiceConfig};
use podcheck_store::RocksStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
    /// The moderator API key for moderation requests.
    pub moderator_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let moderator_key = "test-moderator-key".to_string();

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_base_url: "http://localhost".into(),
            auth_audience: "podcheck".into(),
            moderator_api_key: Some(moderator_key.clone()),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_user_id = UserId::generate();

        Self {
            server,
            _temp_dir: temp_dir,
            test_user_id,
            moderator_key,
        }
    }

    /// Get the authorization header for the default test user.
    pub fn user_auth_header(&self) -> String {
        Self::auth_header_for(self.test_user_id)
    }

    /// Get an authorization header for an arbitrary user.
    pub fn auth_header_for(user_id: UserId) -> String {
        format!("Bearer test-token:{user_id}")
    }

    /// Create an item as the given user and return its ID.
    pub async fn create_item(&self, auth_header: &str, kind: &str) -> String {
        let response = self
            .server
            .post("/v1/items")
            .add_header("authorization", auth_header.to_string())
            .json(&json!({ "kind": kind }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["id"].as_str().expect("item id").to_string()
    }

    /// Submit a vote as the given user and return the response body.
    pub async fn vote(&self, auth_header: &str, item_id: &str, value: i8) -> serde_json::Value {
        let response = self
            .server
            .post(&format!("/v1/items/{item_id}/vote"))
            .add_header("authorization", auth_header.to_string())
            .json(&json!({ "value": value }))
            .await;

        response.assert_status_ok();
        response.json()
    }

    /// Read a user's karma total through the API.
    pub async fn karma_total(&self, auth_header: &str) -> i64 {
        let response = self
            .server
            .get("/v1/karma/me")
            .add_header("authorization", auth_header.to_string())
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["total_karma"].as_i64().expect("total_karma")
    }

    /// Set an item's validation status as a moderator.
    pub async fn set_status(&self, item_id: &str, status: &str) {
        let response = self
            .server
            .post(&format!("/v1/items/{item_id}/status"))
            .add_header("x-moderator-key", self.moderator_key.clone())
            .json(&json!({ "status": status }))
            .await;

        response.assert_status_ok();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

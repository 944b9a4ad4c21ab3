//! Shared test utilities for handler unit tests.
//!
//! Provides a [`TestHarness`] that sets up an [`AppContext`] backed by a fresh
//! RocksDB in a temp directory, plus helpers for building requests (including
//! multipart uploads) and reading JSON response bodies.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot()

use super::router::{build_protected_routes, build_router, AppState};
use super::state::AppContext;
use crate::config::{LlmConfig, ServerConfig};

/// Test API key used for auth tests.
pub const TEST_API_KEY: &str = "test-handler-key-2026";

const BOUNDARY: &str = "eduneuro-test-boundary";

/// A self-contained test environment with its own temp storage.
///
/// Holds `TempDir` so the directory isn't cleaned up until the harness drops.
pub struct TestHarness {
    pub state: AppState,
    temp_dir: TempDir,
}

impl TestHarness {
    /// Harness with no language model: every operation is rule-based.
    pub fn new() -> Self {
        Self::with_llm(LlmConfig::default())
    }

    /// Harness whose language model points at a closed local port.
    pub fn with_unreachable_llm() -> Self {
        Self::with_llm(LlmConfig {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..LlmConfig::default()
        })
    }

    fn with_llm(llm: LlmConfig) -> Self {
        // Only read by the auth layer; every test sets the same value.
        std::env::set_var("EDUNEURO_API_KEYS", TEST_API_KEY);

        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config = ServerConfig {
            storage_path: temp_dir.path().to_path_buf(),
            public_base_url: "http://test.local".to_string(),
            password_hash_rounds: 1_000,
            llm,
            ..ServerConfig::default()
        };
        let context = AppContext::new(config).expect("failed to create test AppContext");

        Self {
            state: Arc::new(context),
            temp_dir,
        }
    }

    /// Build the full application router (public + protected routes).
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Protected routes behind the API-key middleware.
    pub fn authenticated_router(&self) -> Router {
        build_protected_routes(self.state.clone())
            .route_layer(axum::middleware::from_fn(crate::auth::auth_middleware))
    }

    /// Upload a text file and return its document ID.
    pub async fn upload_text(&self, filename: &str, text: &str) -> String {
        let (status, body) = send(self.router(), upload_request(filename, text.as_bytes())).await;
        assert_eq!(status, StatusCode::CREATED, "upload failed: {body}");
        body["document_id"].as_str().unwrap().to_string()
    }

    /// Create an account for `email` and return a login token for it.
    pub async fn signed_in_token(&self, email: &str) -> String {
        let password = "test-password-123";
        let (status, body) = send(
            self.router(),
            post_json(
                "/auth/signup",
                &serde_json::json!({
                    "full_name": "Test Learner",
                    "email": email,
                    "password": password,
                    "confirm_password": password,
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

        let (status, body) = send(
            self.router(),
            post_json(
                "/auth/login",
                &serde_json::json!({ "email": email, "password": password }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Place an audio file in storage and return its name.
    pub fn write_audio(&self, bytes: &[u8]) -> String {
        let name = format!("{}.mp3", uuid::Uuid::new_v4());
        std::fs::write(self.temp_dir.path().join("audio").join(&name), bytes).unwrap();
        name
    }

    /// Send a request and return status, content type and raw body.
    pub async fn raw(&self, req: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
        let resp = self.router().oneshot(req).await.unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, bytes.to_vec())
    }
}

// ---------- Request builders ----------

/// Build a GET request to `uri` with the test API key header.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("x-api-key", TEST_API_KEY)
        .body(Body::empty())
        .unwrap()
}

/// Build a POST request to `uri` with a JSON body and the test API key.
pub fn post_json<T: serde::Serialize>(uri: &str, body: &T) -> Request<Body> {
    let json = serde_json::to_string(body).unwrap();
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", TEST_API_KEY)
        .body(Body::from(json))
        .unwrap()
}

/// Build a DELETE request to `uri` with the test API key.
pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("x-api-key", TEST_API_KEY)
        .body(Body::empty())
        .unwrap()
}

/// GET with the test API key and a login token.
pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    let mut req = get(uri);
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    req
}

/// Empty-bodied POST with the test API key and a login token.
pub fn post_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("x-api-key", TEST_API_KEY)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request **without** an API key (for testing auth rejection).
pub fn get_unauthenticated(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Multipart upload with the file in field `field`.
pub fn multipart_request(field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/documents/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("x-api-key", TEST_API_KEY)
        .body(Body::from(body))
        .unwrap()
}

/// Multipart upload in the `file` field.
pub fn upload_request(filename: &str, bytes: &[u8]) -> Request<Body> {
    multipart_request("file", filename, bytes)
}

/// Multipart upload sent with a login token.
pub fn upload_request_as(filename: &str, bytes: &[u8], token: &str) -> Request<Body> {
    let mut req = upload_request(filename, bytes);
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    req
}

// ---------- Response helpers ----------

/// Send a request through the router and return (status, JSON body).
pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body_bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&body_bytes).to_string())
        })
    };
    (status, json)
}

/// Send a request and deserialize the body into `T`.
pub async fn send_typed<T: DeserializeOwned>(app: Router, req: Request<Body>) -> (StatusCode, T) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body_bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value: T = serde_json::from_slice(&body_bytes).unwrap_or_else(|e| {
        panic!(
            "failed to deserialize response: {e}\nbody: {}",
            String::from_utf8_lossy(&body_bytes)
        )
    });
    (status, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::types::{DocumentListResponse, UploadResponse};

    #[tokio::test]
    async fn test_typed_upload_and_list() {
        let h = TestHarness::new();
        let (status, uploaded): (_, UploadResponse) = send_typed(
            h.router(),
            upload_request("notes.txt", b"Reading in short sessions helps focus."),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(uploaded.file_size, 38);

        let (_, list): (_, DocumentListResponse) = send_typed(h.router(), get("/documents")).await;
        assert_eq!(list.total, 1);
        assert_eq!(list.documents[0].document_id, uploaded.document_id);
    }

    #[tokio::test]
    async fn test_auth_layer_rejects_missing_key() {
        let h = TestHarness::new();
        let (status, body) = send(h.authenticated_router(), get_unauthenticated("/documents")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "MISSING_API_KEY");

        let (status, _) = send(h.authenticated_router(), get("/documents")).await;
        assert_eq!(status, StatusCode::OK);
    }
}

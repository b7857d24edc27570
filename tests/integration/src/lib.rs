//! Integration tests for the Soyfr server.
//!
//! These tests require a running server at `localhost:8800` with the default
//! `api/v1` prefix. They are marked `#[ignore]` so they don't run during
//! normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p soyfr-integration -- --ignored
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Content type of API documents.
pub const API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("SOYFR_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8800".to_owned())
}

/// URL of an API path below the `api/v1` prefix.
#[must_use]
pub fn api_url(path: &str) -> String {
    format!("{}/api/v1/{}", endpoint_url(), path.trim_start_matches('/'))
}

/// Create an HTTP client for the local server.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Generate a unique username for a test.
#[must_use]
pub fn test_username(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("{prefix}-{id}")
}

/// Create a user and return its id, taken from the `Location` header.
///
/// # Panics
///
/// Panics if the server does not answer with 201 and a `Location` header.
pub async fn create_user(client: &reqwest::Client, username: &str) -> String {
    let resp = client
        .post(api_url("users"))
        .json(&serde_json::json!({"users": {"username": username}}))
        .send()
        .await
        .expect("create user request");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let location = resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_owned();
    location
        .rsplit('/')
        .next()
        .expect("id segment")
        .to_owned()
}

/// Delete a user, ignoring failures.
pub async fn cleanup_user(client: &reqwest::Client, id: &str) {
    let _ = client.delete(api_url(&format!("users/{id}"))).send().await;
}

mod test_health;
mod test_users;

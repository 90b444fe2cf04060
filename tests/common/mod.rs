#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mockito::{Mock, Server, ServerGuard};
use serde_json::{json, Value};
use tower::ServiceExt;

use vitrine::config::AppConfig;
use vitrine::AppState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ACCOUNT_ID: &str = "test-account";
pub const API_TOKEN: &str = "test-api-token";
pub const SIGNING_KEY: &str = "test-signing-key";
pub const TTL_SECONDS: u64 = 604_800;

const LIST_PATH: &str = "/accounts/test-account/images/v2";

// ---------------------------------------------------------------------------
// TestApp — one per test, each with its own mock image service
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub upstream: ServerGuard,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    body_bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body_bytes).into_owned()
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

pub async fn app() -> TestApp {
    TestApp::setup().await
}

impl TestApp {
    async fn setup() -> Self {
        let upstream = Server::new_async().await;

        let config = AppConfig {
            http_addr: "127.0.0.1:0".to_string(),
            account_id: ACCOUNT_ID.to_string(),
            api_token: API_TOKEN.to_string(),
            images_api_base_url: upstream.url(),
            images_api_timeout_seconds: Some(5),
            signing_key: SIGNING_KEY.to_string(),
            signed_url_ttl_seconds: TTL_SECONDS,
        };

        let state = AppState::from_config(&config).expect("failed to build AppState");
        let router = vitrine::http::router(state.clone());

        TestApp {
            router,
            state,
            upstream,
        }
    }

    // ------------------------------------------------------------------
    // Upstream mocks
    // ------------------------------------------------------------------

    /// Serves a successful listing containing `images`.
    pub async fn mock_listing(&mut self, images: Vec<Value>) -> Mock {
        self.mock_listing_hits(images, 1).await
    }

    /// Like [`TestApp::mock_listing`], expecting exactly `hits` requests.
    pub async fn mock_listing_hits(&mut self, images: Vec<Value>, hits: usize) -> Mock {
        let body = json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": { "images": images },
        });

        self.upstream
            .mock("GET", LIST_PATH)
            .match_header("authorization", format!("Bearer {}", API_TOKEN).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(hits)
            .create_async()
            .await
    }

    pub async fn mock_raw(&mut self, status: usize, body: Value) -> Mock {
        self.upstream
            .mock("GET", LIST_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header("host", "localhost")
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            content_type,
            body_bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// One upstream image record as the image service returns it.
pub fn image(id: &str, (width, height): (u32, u32), variant: &str) -> Value {
    json!({
        "id": id,
        "filename": format!("{}.png", id),
        "uploaded": "2024-01-02T00:00:00.000Z",
        "requireSignedURLs": true,
        "variants": [
            format!("https://imagedelivery.net/hash/{}/public", id),
            format!("https://imagedelivery.net/hash/{}/{}", id, variant),
        ],
        "meta": {
            "size": { "width": width, "height": height },
            "category": "test",
            "captureEvent": { "appName": "Cam", "timestamp": "2024-01-01T00:00:00+00:00" },
            "exif": { "DateTimeOriginal": "2024:01:01 00:00:00" },
        },
    })
}

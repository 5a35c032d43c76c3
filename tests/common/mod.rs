use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode as AxumStatus};
use axum::response::IntoResponse;
use axum::Router;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use hookboard::config::{AiConfig, Config, MockConfig};

pub const TEST_SEED: u64 = 42;
pub const TEST_AI_KEY: &str = "test-ai-key";
pub const ANALYSIS_TEXT: &str = "Reason: the receiver timed out\n1. Raise the timeout\n2. Retry";

/// How the fake model endpoint answers.
#[derive(Clone)]
pub enum AiReply {
    Text(&'static str),
    Fail(u16, &'static str),
}

struct AiStub {
    reply: AiReply,
    delay: Duration,
    calls: AtomicUsize,
}

/// A running test server backed by a fake model endpoint.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    stub: Arc<AiStub>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Requests the fake model endpoint has received.
    pub fn ai_calls(&self) -> usize {
        self.stub.calls.load(Ordering::SeqCst)
    }

    pub async fn get_json(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PUT request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Post a console form and return the status plus the redirect target.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
        let resp = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("form post failed");
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        (resp.status(), location)
    }

    pub async fn page(&self) -> String {
        let resp = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .expect("console request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        resp.text().await.unwrap()
    }

    /// First failed event of the seeded population.
    pub async fn failed_event_id(&self) -> String {
        let (body, status) = self.get_json("/api/v1/events?status=Failed").await;
        assert_eq!(status, StatusCode::OK);
        body["items"][0]["id"]
            .as_str()
            .expect("seeded population has a failed event")
            .to_string()
    }

    /// Poll the analysis until it stops loading.
    pub async fn settled_analysis(&self) -> Value {
        for _ in 0..100 {
            let (body, _) = self.get_json("/api/v1/analysis").await;
            if body["loading"] == json!(false) {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("analysis never settled");
    }
}

async fn generate_content(State(stub): State<Arc<AiStub>>, headers: HeaderMap) -> impl IntoResponse {
    stub.calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(stub.delay).await;

    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(TEST_AI_KEY) {
        let body = json!({ "error": { "code": 401, "message": "API key not valid" } });
        return (AxumStatus::UNAUTHORIZED, axum::Json(body));
    }

    match stub.reply.clone() {
        AiReply::Text(text) => {
            let body = json!({
                "candidates": [{ "content": { "parts": [{ "text": text }] } }]
            });
            (AxumStatus::OK, axum::Json(body))
        }
        AiReply::Fail(code, message) => {
            let status = AxumStatus::from_u16(code).unwrap_or(AxumStatus::INTERNAL_SERVER_ERROR);
            let body = json!({ "error": { "code": code, "message": message } });
            (status, axum::Json(body))
        }
    }
}

async fn spawn_ai_stub(stub: Arc<AiStub>) -> SocketAddr {
    let app = Router::new().fallback(generate_content).with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind AI stub");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("AI stub failed");
    });

    addr
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(AiReply::Text(ANALYSIS_TEXT), Duration::from_millis(50)).await
}

pub async fn spawn_app_with(reply: AiReply, delay: Duration) -> TestApp {
    let stub = Arc::new(AiStub {
        reply,
        delay,
        calls: AtomicUsize::new(0),
    });
    let ai_addr = spawn_ai_stub(stub.clone()).await;

    let config = Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        log_level: "warn".to_string(),
        mock: MockConfig {
            seed: Some(TEST_SEED),
            ..MockConfig::default()
        },
        ai: AiConfig {
            api_key: Some(TEST_AI_KEY.to_string()),
            model: "test-model".to_string(),
            base_url: format!("http://{ai_addr}"),
        },
    };

    let (app, _state) = hookboard::build_app(config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, client, stub }
}

//! Gemini wire-protocol tests against a local stub provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Request, StatusCode, Uri};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use diagramgen::{
    build_router, CompletionClient, Container, DomainError, GeminiClient, GeminiConfig,
    RetryPolicy, RetryingCompletionClient, ValidationMode, EXAMPLE_PROMPT, EXAMPLE_RESPONSE,
    SYSTEM_INSTRUCTION,
};

const API_KEY: &str = "test-key";

#[derive(Debug, Clone)]
struct RecordedRequest {
    path: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct StubProvider {
    status: StatusCode,
    reply: Value,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubProvider {
    fn new(status: StatusCode, reply: Value) -> Self {
        Self {
            status,
            reply,
            delay: Duration::ZERO,
            hits: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn answering(text: &str) -> Self {
        Self::new(
            StatusCode::OK,
            json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": text }] },
                    "finishReason": "STOP"
                }]
            }),
        )
    }

    fn failing(status: StatusCode, message: &str) -> Self {
        Self::new(
            status,
            json!({ "error": { "code": status.as_u16(), "message": message, "status": "ERROR" } }),
        )
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("stub received no request")
    }

    /// Serve on an ephemeral port and return the base URL.
    async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/v1beta/{*rest}", post(handle))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub provider");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }
}

async fn handle(
    State(stub): State<StubProvider>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    stub.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    if !stub.delay.is_zero() {
        tokio::time::sleep(stub.delay).await;
    }

    (stub.status, Json(stub.reply.clone()))
}

fn client_for(base_url: &str) -> GeminiClient {
    GeminiClient::new(
        GeminiConfig::default()
            .with_api_key(API_KEY)
            .with_base_url(base_url),
    )
}

#[tokio::test]
async fn sends_instruction_prompt_and_generation_config() {
    let stub = StubProvider::answering(EXAMPLE_RESPONSE);
    let base_url = stub.spawn().await;

    let text = client_for(&base_url)
        .generate(SYSTEM_INSTRUCTION, EXAMPLE_PROMPT)
        .await
        .unwrap();
    assert_eq!(text, EXAMPLE_RESPONSE);

    let request = stub.last_request();
    assert_eq!(
        request.path,
        "/v1beta/models/gemini-2.0-flash:generateContent"
    );
    assert_eq!(request.api_key.as_deref(), Some(API_KEY));
    assert_eq!(
        request.body["systemInstruction"]["parts"][0]["text"],
        SYSTEM_INSTRUCTION
    );
    assert_eq!(request.body["contents"][0]["role"], "user");
    assert_eq!(request.body["contents"][0]["parts"][0]["text"], EXAMPLE_PROMPT);
    assert_eq!(
        request.body["generationConfig"]["responseMimeType"],
        "application/json"
    );
    let temperature = request.body["generationConfig"]["temperature"]
        .as_f64()
        .unwrap();
    assert!((temperature - 0.1).abs() < 1e-6);
}

#[tokio::test]
async fn configured_model_selects_endpoint() {
    let stub = StubProvider::answering(EXAMPLE_RESPONSE);
    let base_url = stub.spawn().await;
    let client = GeminiClient::new(
        GeminiConfig::default()
            .with_api_key(API_KEY)
            .with_base_url(format!("{base_url}/"))
            .with_model("gemini-1.5-pro"),
    );

    assert_eq!(client.model_name(), "gemini-1.5-pro");
    client.generate(SYSTEM_INSTRUCTION, "two steps").await.unwrap();

    assert_eq!(
        stub.last_request().path,
        "/v1beta/models/gemini-1.5-pro:generateContent"
    );
}

#[tokio::test]
async fn missing_key_makes_no_outbound_call() {
    let stub = StubProvider::answering(EXAMPLE_RESPONSE);
    let base_url = stub.spawn().await;
    let client = GeminiClient::new(GeminiConfig::default().with_base_url(&base_url));

    let err = client.generate(SYSTEM_INSTRUCTION, "two steps").await.unwrap_err();

    assert!(matches!(err, DomainError::Configuration(_)));
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn server_errors_are_retryable() {
    let stub = StubProvider::failing(StatusCode::SERVICE_UNAVAILABLE, "The model is overloaded.");
    let base_url = stub.spawn().await;

    let err = client_for(&base_url)
        .generate(SYSTEM_INSTRUCTION, "two steps")
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(err.to_string().contains("The model is overloaded."));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let stub = StubProvider::failing(StatusCode::BAD_REQUEST, "API key not valid.");
    let base_url = stub.spawn().await;
    let client = RetryingCompletionClient::new(
        Arc::new(client_for(&base_url)),
        RetryPolicy::default().with_backoff(Duration::from_millis(1), Duration::from_millis(1)),
    );

    let err = client
        .generate(SYSTEM_INSTRUCTION, "two steps")
        .await
        .unwrap_err();

    assert!(!err.is_retryable());
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn throttling_is_retried_up_to_the_bound() {
    let stub = StubProvider::failing(StatusCode::TOO_MANY_REQUESTS, "Resource exhausted.");
    let base_url = stub.spawn().await;
    let client = RetryingCompletionClient::new(
        Arc::new(client_for(&base_url)),
        RetryPolicy::default()
            .with_max_attempts(3)
            .with_backoff(Duration::from_millis(1), Duration::from_millis(2)),
    );

    let err = client
        .generate(SYSTEM_INSTRUCTION, "two steps")
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(stub.hits(), 3);
}

#[tokio::test]
async fn empty_candidate_is_empty_response() {
    let stub = StubProvider::new(
        StatusCode::OK,
        json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] }, "finishReason": "SAFETY" }] }),
    );
    let base_url = stub.spawn().await;

    let err = client_for(&base_url)
        .generate(SYSTEM_INSTRUCTION, "two steps")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::EmptyResponse(_)));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let stub = StubProvider::answering(EXAMPLE_RESPONSE).with_delay(Duration::from_secs(5));
    let base_url = stub.spawn().await;
    let client = GeminiClient::new(
        GeminiConfig::default()
            .with_api_key(API_KEY)
            .with_base_url(&base_url)
            .with_timeout(Duration::from_millis(200)),
    );

    let err = client
        .generate(SYSTEM_INSTRUCTION, "two steps")
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(err.to_string().contains("timed out"));
}

async fn post_generate(app: Router, prompt: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/diagram/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "userPrompt": prompt }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn end_to_end_through_http_router() {
    let fenced = format!("```json\n{EXAMPLE_RESPONSE}\n```");
    let stub = StubProvider::answering(&fenced);
    let base_url = stub.spawn().await;
    let container = Container::with_client(Arc::new(client_for(&base_url)), ValidationMode::Strict);

    let (status, body) = post_generate(build_router(Arc::new(container)), EXAMPLE_PROMPT).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::from_str::<Value>(EXAMPLE_RESPONSE).unwrap());
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn end_to_end_missing_credential_is_404_without_call() {
    let stub = StubProvider::answering(EXAMPLE_RESPONSE);
    let base_url = stub.spawn().await;
    let client = GeminiClient::new(GeminiConfig::default().with_base_url(&base_url));
    let container = Container::with_client(Arc::new(client), ValidationMode::Strict);

    let (status, body) = post_generate(build_router(Arc::new(container)), EXAMPLE_PROMPT).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "configuration");
    assert_eq!(stub.hits(), 0);
}

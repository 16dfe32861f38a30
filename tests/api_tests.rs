//! HTTP API tests driving the full router with a stub completion service

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;
use travel_agent::config::{CompletionConfig, ServerConfig};
use travel_agent::{CompletionError, CompletionService, TravelAgent, completion, web};

struct StubCompletion {
    reply: Result<&'static str, &'static str>,
    calls: AtomicUsize,
}

impl StubCompletion {
    fn replying(text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, _system_prompt: &str, _prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Ok(text) => Ok(text.to_string()),
            Err(message) => Err(CompletionError::ApiError {
                status: 503,
                message: message.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn app_with(service: Arc<StubCompletion>) -> axum::Router {
    web::app(Arc::new(TravelAgent::new(service)), &ServerConfig::default())
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn paris_request() -> Value {
    json!({
        "destination": "Paris",
        "present_location": "London",
        "start_date": "2024-06-01",
        "end_date": "2024-06-05",
        "budget": "medium",
        "travel_styles": ["culture", "food"]
    })
}

fn question_request() -> Value {
    json!({
        "question": "Which museums need advance booking?",
        "destination": "Paris",
        "travel_plan": "## Day 1\n- Louvre"
    })
}

fn modify_request() -> Value {
    json!({
        "travel_plan": "## Day 1\n- Louvre",
        "modifications": "Add a food tour on day 2"
    })
}

#[tokio::test]
async fn test_home_is_always_up() {
    let app = app_with(StubCompletion::failing("service down"));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Hi");
}

#[rstest]
#[case("/generate-plan", paris_request(), "travel_plan")]
#[case("/answer-question", question_request(), "answer")]
#[case("/modify-plan", modify_request(), "modified_plan")]
#[tokio::test]
async fn test_success_passes_text_through(#[case] uri: &str, #[case] body: Value, #[case] field: &str) {
    let text = "## Plan\n\n* [Louvre](https://www.louvre.fr)  \n";
    let service = StubCompletion::replying(text);
    let response = app_with(service.clone()).oneshot(post_json(uri, &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[field], text);
    assert_eq!(service.calls(), 1);
}

#[rstest]
#[case("/generate-plan", paris_request(), "Error generating travel plan: API error 503: model overloaded")]
#[case("/answer-question", question_request(), "Error answering question: API error 503: model overloaded")]
#[case("/modify-plan", modify_request(), "Error modifying plan: API error 503: model overloaded")]
#[tokio::test]
async fn test_upstream_failure_is_reported(#[case] uri: &str, #[case] body: Value, #[case] detail: &str) {
    let response = app_with(StubCompletion::failing("model overloaded"))
        .oneshot(post_json(uri, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["detail"], detail);
}

#[rstest]
#[case("June first", "2024-06-05")]
#[case("2024-06-05", "2024-06-01")]
#[tokio::test]
async fn test_bad_dates_are_rejected_before_completion(#[case] start: &str, #[case] end: &str) {
    let service = StubCompletion::replying("unused");
    let mut body = paris_request();
    body["start_date"] = json!(start);
    body["end_date"] = json!(end);

    let response = app_with(service.clone())
        .oneshot(post_json("/generate-plan", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().starts_with("Invalid input:"));
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_a_client_error() {
    let service = StubCompletion::replying("unused");
    let request = Request::builder()
        .method("POST")
        .uri("/modify-plan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"travel_plan\": "))
        .unwrap();

    let response = app_with(service.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(!json["detail"].as_str().unwrap().is_empty());
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_missing_field_is_a_client_error() {
    let response = app_with(StubCompletion::replying("unused"))
        .oneshot(post_json("/answer-question", &json!({"question": "Why?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("destination"));
}

#[tokio::test]
async fn test_optional_fields_may_be_omitted() {
    let service = StubCompletion::replying("plan");
    let body = json!({
        "destination": "Kyoto",
        "start_date": "Apr 01, 2025",
        "end_date": "Apr 08, 2025",
        "budget": "luxury"
    });

    let response = app_with(service.clone())
        .oneshot(post_json("/generate-plan", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["travel_plan"], "plan");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app_with(StubCompletion::replying("unused")).oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let service = StubCompletion::replying("unused");
    let config = ServerConfig {
        max_body_bytes: 64,
        ..ServerConfig::default()
    };
    let app = web::app(Arc::new(TravelAgent::new(service.clone())), &config);

    let body = modify_request().to_string();
    assert!(body.len() > 64);
    let request = Request::builder()
        .method("POST")
        .uri("/modify-plan")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("Invalid input:"), "{detail}");
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_missing_api_key_keeps_liveness() {
    let config = CompletionConfig {
        api_key: None,
        api_key_env: "TRAVEL_AGENT_TEST_UNSET_KEY_FOR_API".to_string(),
        ..CompletionConfig::default()
    };
    let service = completion::create_client(&config).unwrap();
    let app = web::app(Arc::new(TravelAgent::new(service)), &ServerConfig::default());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(post_json("/generate-plan", &paris_request())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["detail"],
        "Error generating travel plan: Missing API key: set TRAVEL_AGENT_TEST_UNSET_KEY_FOR_API"
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app_with(StubCompletion::replying("unused"))
        .oneshot(Request::builder().uri("/plans").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

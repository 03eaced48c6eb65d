//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use profile_form::domain::values::FormValues;
use profile_form_core::clock::Clock;
use profile_form_core::gateway::SubmitGateway;
use profile_form_event_store::in_memory_event_repository::InMemoryEventRepository;
use profile_form_test_support::FixedClock;
use tower::ServiceExt;
use uuid::Uuid;

use profile_form_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over `repository` and `gateway` with a
/// deterministic clock. Uses the same route structure as `main.rs`.
pub fn build_test_app_with(
    repository: Arc<InMemoryEventRepository>,
    gateway: Arc<dyn SubmitGateway<FormValues>>,
) -> Router {
    let app_state = AppState::new(fixed_clock(), repository, gateway);
    profile_form_api::app(app_state)
}

/// Build the full app router with a fresh in-memory store.
pub fn build_test_app(gateway: Arc<dyn SubmitGateway<FormValues>>) -> Router {
    build_test_app_with(Arc::new(InMemoryEventRepository::new()), gateway)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, body_bytes.to_vec())
}

fn json_request(method: &str, uri: &str, body: Option<&serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request with an optional JSON body and parse the JSON response.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = send(app.clone(), json_request(method, uri, body)).await;
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// Send a GET request and return the response body as text.
pub async fn get_html(app: &Router, uri: &str) -> (StatusCode, String) {
    let (status, bytes) = send(app.clone(), json_request("GET", uri, None)).await;
    (status, String::from_utf8(bytes).unwrap())
}

/// Mount a form and return its id.
pub async fn mount_form(app: &Router) -> Uuid {
    let (status, json) = send_json(app, "POST", "/api/v1/forms", None).await;
    assert_eq!(status, StatusCode::CREATED);
    json["form_id"].as_str().unwrap().parse().unwrap()
}

/// Fetch the JSON view of a form.
pub async fn get_form(app: &Router, form_id: Uuid) -> (StatusCode, serde_json::Value) {
    send_json(app, "GET", &format!("/api/v1/forms/{form_id}"), None).await
}

/// Set a field through the API and assert it was accepted.
pub async fn set_field(app: &Router, form_id: Uuid, field: &str, value: &str) {
    let (status, json) = send_json(
        app,
        "PUT",
        &format!("/api/v1/forms/{form_id}/fields/{field}"),
        Some(&serde_json::json!({ "value": value })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "setting {field}: {json}");
}

/// Set a tech stack entry through the API and assert it was accepted.
pub async fn set_entry(app: &Router, form_id: Uuid, entry_id: &str, value: &str) {
    let (status, json) = send_json(
        app,
        "PUT",
        &format!("/api/v1/forms/{form_id}/tech-stack/{entry_id}"),
        Some(&serde_json::json!({ "value": value })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "setting entry {entry_id}: {json}");
}

/// Fill every field with the values of a valid profile and a single `Go`
/// tech stack entry.
pub async fn fill_valid_profile(app: &Router, form_id: Uuid) {
    set_field(app, form_id, "firstName", "Johnathan").await;
    set_field(app, form_id, "lastName", "Doe").await;
    set_field(app, form_id, "email", "a@b.com").await;
    set_field(app, form_id, "phoneNumber", "9876543210").await;
    set_field(app, form_id, "gender", "male").await;
    set_field(app, form_id, "dateOfBirth", "2000-01-01").await;

    let (_, view) = get_form(app, form_id).await;
    let entry_id = view["tech_stack"][0]["entry_id"].as_str().unwrap().to_owned();
    set_entry(app, form_id, &entry_id, "Go").await;
}

/// Poll the form until its status is `expected`, giving background
/// completions time to land.
pub async fn wait_for_status(app: &Router, form_id: Uuid, expected: &str) -> serde_json::Value {
    for _ in 0..100 {
        let (status, view) = get_form(app, form_id).await;
        if status == StatusCode::OK && view["status"] == expected {
            return view;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("form {form_id} never reached status {expected}");
}

//! End-to-end HTTP tests for the notes API over the in-memory adapter.
//!
//! The app is assembled the same way the server does it (trace middleware,
//! `/api/v1` scope, health routes) but backed by `InMemoryNoteRepository`
//! and a clock the tests can move.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Utc};
use household_notes::Trace;
use household_notes::domain::ports::NoteRepositoryError;
use household_notes::domain::{NoteService, TRACE_ID_HEADER};
use household_notes::inbound::http::health::{HealthState, health, live, ready};
use household_notes::inbound::http::notes;
use household_notes::inbound::http::state::HttpState;
use household_notes::test_support::{InMemoryNoteRepository, MutableClock};
use rstest::rstest;
use serde_json::{Value, json};

struct Harness {
    repository: Arc<InMemoryNoteRepository>,
    clock: Arc<MutableClock>,
}

impl Harness {
    fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryNoteRepository::new()),
            clock: Arc::new(MutableClock::fixed()),
        }
    }

    async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        let service = Arc::new(NoteService::new(
            self.repository.clone(),
            self.clock.clone(),
        ));
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        actix_test::init_service(
            App::new()
                .app_data(health_state)
                .app_data(web::Data::new(HttpState::from_service(service)))
                .wrap(Trace)
                .service(web::scope("/api/v1").configure(notes::configure))
                .service(health)
                .service(ready)
                .service(live),
        )
        .await
    }
}

async fn send<S>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = actix_test::call_service(app, req).await;
    let status = res.status();
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

async fn create<S>(app: &S, payload: Value) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/notes")
        .set_json(payload)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value
        .as_str()
        .expect("timestamp string")
        .parse()
        .expect("RFC 3339 timestamp")
}

fn get(uri: &str) -> actix_http::Request {
    actix_test::TestRequest::get().uri(uri).to_request()
}

fn patch(uri: &str, payload: Value) -> actix_http::Request {
    actix_test::TestRequest::patch()
        .uri(uri)
        .set_json(payload)
        .to_request()
}

fn delete(uri: &str) -> actix_http::Request {
    actix_test::TestRequest::delete().uri(uri).to_request()
}

#[actix_web::test]
async fn health_reports_ok() {
    let harness = Harness::new();
    let app = harness.app().await;
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[actix_web::test]
async fn empty_store_lists_nothing() {
    let harness = Harness::new();
    let app = harness.app().await;
    let (status, body) = send(&app, get("/api/v1/notes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": [], "total": 0}));
}

#[actix_web::test]
async fn create_assigns_first_id_and_echoes_fields() {
    let harness = Harness::new();
    let app = harness.app().await;
    let body = create(
        &app,
        json!({"author": "Ben", "title": "Shopping list", "body": "Milk, eggs"}),
    )
    .await;

    assert_eq!(body["id"], 1);
    assert_eq!(body["author"], "Ben");
    assert_eq!(body["title"], "Shopping list");
    assert_eq!(body["body"], "Milk, eggs");
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[actix_web::test]
async fn create_without_body_stores_null() {
    let harness = Harness::new();
    let app = harness.app().await;
    let body = create(&app, json!({"author": "Wife", "title": "Reminder"})).await;
    assert_eq!(body["body"], Value::Null);
}

#[rstest]
#[case(json!({"author": "Unknown", "title": "x"}), "author", "invalid_author")]
#[case(json!({"author": "Ben", "title": ""}), "title", "blank_title")]
#[case(json!({"author": "Ben", "title": "   "}), "title", "blank_title")]
#[case(json!({"title": "x"}), "author", "missing_field")]
#[case(json!({"author": "Ben"}), "title", "missing_field")]
#[case(json!({"author": "Ben", "title": "x".repeat(256)}), "title", "title_too_long")]
#[actix_web::test]
async fn create_rejects_invalid_payloads(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let harness = Harness::new();
    let app = harness.app().await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/notes")
        .set_json(payload)
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
    assert!(harness.repository.is_empty());
}

#[actix_web::test]
async fn create_reports_author_and_title_failures_together() {
    let harness = Harness::new();
    let app = harness.app().await;
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/notes")
        .set_json(json!({"author": "Unknown", "title": "   "}))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["details"]["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|entry| entry["field"].as_str())
        .collect();
    assert_eq!(fields, ["author", "title"]);
    assert!(harness.repository.is_empty());
}

#[actix_web::test]
async fn create_accepts_title_at_maximum_length() {
    let harness = Harness::new();
    let app = harness.app().await;
    let title = "x".repeat(255);
    let body = create(&app, json!({"author": "Ben", "title": title})).await;
    assert_eq!(body["title"].as_str().map(str::len), Some(255));
}

#[actix_web::test]
async fn get_returns_stored_note_or_not_found() {
    let harness = Harness::new();
    let app = harness.app().await;
    let created = create(&app, json!({"author": "Ben", "title": "Shopping list"})).await;

    let (status, fetched) = send(&app, get("/api/v1/notes/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, get("/api/v1/notes/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[case("/api/v1/notes/0")]
#[case("/api/v1/notes/-3")]
#[case("/api/v1/notes/4294967296")]
#[case("/api/v1/notes/9223372036854775808")]
#[case("/api/v1/notes/99999999999999999999")]
#[case("/api/v1/notes/-99999999999999999999")]
#[actix_web::test]
async fn out_of_range_ids_are_not_found(#[case] uri: &str) {
    let harness = Harness::new();
    let app = harness.app().await;
    let (status, body) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn oversized_ids_are_not_found_for_patch_and_delete() {
    let harness = Harness::new();
    let app = harness.app().await;
    let uri = "/api/v1/notes/99999999999999999999";

    let (status, _) = send(&app, patch(uri, json!({"body": null}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, delete(uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/api/v1/notes/abc")]
#[case("/api/v1/notes/1.5")]
#[case("/api/v1/notes/12abc")]
#[actix_web::test]
async fn non_integer_ids_are_unprocessable(#[case] uri: &str) {
    let harness = Harness::new();
    let app = harness.app().await;
    let (status, body) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["code"], "invalid_path");
}

#[actix_web::test]
async fn list_is_newest_first_and_filters_by_author() {
    let harness = Harness::new();
    let app = harness.app().await;
    create(&app, json!({"author": "Ben", "title": "Shopping list"})).await;
    harness.clock.advance_seconds(60);
    create(&app, json!({"author": "Wife", "title": "Reminder"})).await;

    let (_, all) = send(&app, get("/api/v1/notes")).await;
    assert_eq!(all["total"], 2);
    assert_eq!(all["items"][0]["title"], "Reminder");
    assert_eq!(all["items"][1]["title"], "Shopping list");

    let (status, bens) = send(&app, get("/api/v1/notes?author=Ben")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bens["total"], 1);
    assert_eq!(bens["items"][0]["author"], "Ben");

    let (status, body) = send(&app, get("/api/v1/notes?author=Nobody")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["code"], "invalid_author");
}

#[actix_web::test]
async fn list_accepts_trailing_slash() {
    let harness = Harness::new();
    let app = harness.app().await;
    create(&app, json!({"author": "Ben", "title": "Shopping list"})).await;

    let (status, body) = send(&app, get("/api/v1/notes/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
}

#[actix_web::test]
async fn patch_updates_only_supplied_fields() {
    let harness = Harness::new();
    let app = harness.app().await;
    let created = create(
        &app,
        json!({"author": "Ben", "title": "Shopping list", "body": "Milk"}),
    )
    .await;
    harness.clock.advance_seconds(30);

    let (status, updated) = send(
        &app,
        patch("/api/v1/notes/1", json!({"title": "Groceries"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Groceries");
    assert_eq!(updated["body"], "Milk");
    assert_eq!(updated["author"], "Ben");
    assert_eq!(updated["created_at"], created["created_at"]);
    assert!(timestamp(&updated["updated_at"]) > timestamp(&created["updated_at"]));
}

#[actix_web::test]
async fn patch_with_null_body_clears_it() {
    let harness = Harness::new();
    let app = harness.app().await;
    create(
        &app,
        json!({"author": "Wife", "title": "Reminder", "body": "Call the plumber"}),
    )
    .await;

    let (status, updated) = send(&app, patch("/api/v1/notes/1", json!({"body": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["body"], Value::Null);
    assert_eq!(updated["title"], "Reminder");
}

#[actix_web::test]
async fn empty_patch_still_advances_updated_at() {
    let harness = Harness::new();
    let app = harness.app().await;
    // The clock does not move between create and patch.
    let created = create(&app, json!({"author": "Ben", "title": "Shopping list"})).await;

    let (status, updated) = send(&app, patch("/api/v1/notes/1", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], created["title"]);
    assert!(timestamp(&updated["updated_at"]) > timestamp(&created["updated_at"]));
}

#[rstest]
#[case(json!({"title": "   "}), "blank_title")]
#[case(json!({"title": null}), "null_title")]
#[actix_web::test]
async fn patch_rejects_invalid_title_and_keeps_note(#[case] payload: Value, #[case] code: &str) {
    let harness = Harness::new();
    let app = harness.app().await;
    let created = create(&app, json!({"author": "Ben", "title": "Shopping list"})).await;

    let (status, body) = send(&app, patch("/api/v1/notes/1", payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["code"], code);

    let (_, fetched) = send(&app, get("/api/v1/notes/1")).await;
    assert_eq!(fetched, created);
}

#[actix_web::test]
async fn patch_missing_note_is_not_found() {
    let harness = Harness::new();
    let app = harness.app().await;
    let (status, body) = send(&app, patch("/api/v1/notes/999", json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn delete_removes_note_once() {
    let harness = Harness::new();
    let app = harness.app().await;
    create(&app, json!({"author": "Ben", "title": "Shopping list"})).await;

    let (status, body) = send(&app, delete("/api/v1/notes/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert!(harness.repository.is_empty());

    let (status, _) = send(&app, get("/api/v1/notes/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, delete("/api/v1/notes/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn ids_are_not_reused_after_delete() {
    let harness = Harness::new();
    let app = harness.app().await;
    create(&app, json!({"author": "Ben", "title": "First"})).await;
    send(&app, delete("/api/v1/notes/1")).await;

    let second = create(&app, json!({"author": "Ben", "title": "Second"})).await;
    assert_eq!(second["id"], 2);
}

#[actix_web::test]
async fn responses_carry_trace_id_matching_error_body() {
    let harness = Harness::new();
    let app = harness.app().await;
    let res = actix_test::call_service(&app, get("/api/v1/notes/999")).await;
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["traceId"], header.as_str());
}

#[actix_web::test]
async fn connection_failures_map_to_service_unavailable() {
    let harness = Harness::new();
    let app = harness.app().await;
    harness
        .repository
        .fail_with(Some(NoteRepositoryError::connection("database is down")));

    let (status, body) = send(&app, get("/api/v1/notes")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}

#[actix_web::test]
async fn query_failures_are_redacted() {
    let harness = Harness::new();
    let app = harness.app().await;
    harness
        .repository
        .fail_with(Some(NoteRepositoryError::query("relation notes does not exist")));

    let (status, body) = send(&app, get("/api/v1/notes/1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
    assert!(body.get("details").is_none_or(Value::is_null));
}

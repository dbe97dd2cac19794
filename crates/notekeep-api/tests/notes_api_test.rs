//! End-to-end tests of the `/notes` HTTP surface against the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use notekeep_api::config::AllowedOrigins;
use notekeep_api::{build_router, AppState};
use notekeep_core::{Error, NewNote, Note, NoteFilter, NoteId, NotePatch, NoteRepository, Result};
use notekeep_db::MemoryNoteRepository;

fn app(repo: MemoryNoteRepository) -> Router {
    build_router(AppState::new(Arc::new(repo), false), &AllowedOrigins::Any)
}

fn seeded_note(title: &str, content: &str, minutes: i64) -> Note {
    Note {
        id: NoteId::new(),
        title: title.to_string(),
        content: content.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes),
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create(app: &Router, title: &str, content: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/notes",
        Some(json!({"title": title, "content": content})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"].clone()
}

// -- Root and fallback --

#[tokio::test]
async fn test_root_liveness_text() {
    let app = app(MemoryNoteRepository::new());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Notes API is running");
}

#[tokio::test]
async fn test_health_check() {
    let app = app(MemoryNoteRepository::new());
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_returns_envelope() {
    let app = app(MemoryNoteRepository::new());
    let (status, body) = send(&app, "GET", "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Route not found"}));
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = app(MemoryNoteRepository::new());
    let response = app
        .oneshot(Request::builder().uri("/notes").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// -- List --

#[tokio::test]
async fn test_list_empty_store() {
    let app = app(MemoryNoteRepository::new());
    let (status, body) = send(&app, "GET", "/notes", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["totalPages"], 0);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["hasPrevPage"], false);
    assert!(body["pagination"]["nextPage"].is_null());
}

#[tokio::test]
async fn test_list_paginates_newest_first() {
    let notes = (0..25).map(|i| seeded_note(&format!("note {}", i), "body", i));
    let app = app(MemoryNoteRepository::with_notes(notes).await);

    let (status, body) = send(&app, "GET", "/notes?page=3&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    assert_eq!(
        body["pagination"],
        json!({
            "total": 25,
            "totalPages": 3,
            "currentPage": 3,
            "limit": 10,
            "hasNextPage": false,
            "hasPrevPage": true,
            "nextPage": null,
            "prevPage": 2
        })
    );
    // Third page of newest-first holds the five oldest notes.
    assert_eq!(body["data"][0]["title"], "note 4");
    assert_eq!(body["data"][4]["title"], "note 0");

    let (_, first) = send(&app, "GET", "/notes", None).await;
    assert_eq!(first["count"], 10);
    assert_eq!(first["data"][0]["title"], "note 24");
    assert_eq!(first["pagination"]["nextPage"], 2);
}

#[tokio::test]
async fn test_list_page_past_end_is_empty() {
    let notes = (0..3).map(|i| seeded_note("t", "c", i));
    let app = app(MemoryNoteRepository::with_notes(notes).await);

    let (status, body) = send(&app, "GET", "/notes?page=9999", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["currentPage"], 9999);
}

#[tokio::test]
async fn test_list_clamps_zero_and_garbage_params() {
    let notes = (0..5).map(|i| seeded_note("t", "c", i));
    let app = app(MemoryNoteRepository::with_notes(notes).await);

    let (_, body) = send(&app, "GET", "/notes?page=0&limit=0", None).await;
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["limit"], 1);
    assert_eq!(body["pagination"]["totalPages"], 5);
    assert_eq!(body["count"], 1);

    let (status, body) = send(&app, "GET", "/notes?page=abc&limit=xyz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["limit"], 10);
}

// -- Search --

#[tokio::test]
async fn test_search_requires_query() {
    let app = app(MemoryNoteRepository::new());
    for uri in ["/notes/search", "/notes/search?query="] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "message": "Search query parameter is required"})
        );
    }
}

#[tokio::test]
async fn test_search_matches_substring_in_title_or_content() {
    let app = app(
        MemoryNoteRepository::with_notes(vec![
            seeded_note("Concatenation", "joining strings", 0),
            seeded_note("Pets", "I have a cat", 1),
            seeded_note("Dogs", "woof", 2),
        ])
        .await,
    );

    let (status, body) = send(&app, "GET", "/notes/search?query=CAT", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["data"][0]["title"], "Pets");
    assert_eq!(body["data"][1]["title"], "Concatenation");
}

#[tokio::test]
async fn test_search_query_is_literal() {
    let app = app(
        MemoryNoteRepository::with_notes(vec![
            seeded_note("a.c", "", 0),
            seeded_note("abc", "", 1),
        ])
        .await,
    );

    let (_, body) = send(&app, "GET", "/notes/search?query=a.c", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], "a.c");
}

#[tokio::test]
async fn test_search_paginates() {
    let notes = (0..12).map(|i| seeded_note(&format!("cat {}", i), "", i));
    let app = app(MemoryNoteRepository::with_notes(notes).await);

    let (_, body) = send(&app, "GET", "/notes/search?query=cat&page=2&limit=5", None).await;
    assert_eq!(body["count"], 5);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["prevPage"], 1);
    assert_eq!(body["pagination"]["nextPage"], 3);
    assert_eq!(body["data"][0]["title"], "cat 6");
}

// -- Create and get --

#[tokio::test]
async fn test_create_then_get_returns_trimmed_values() {
    let app = app(MemoryNoteRepository::new());
    let created = create(&app, "  Shopping  ", "\n milk, eggs \n").await;

    assert_eq!(created["title"], "Shopping");
    assert_eq!(created["content"], "milk, eggs");
    assert!(created["createdAt"].is_string());
    let id = created["id"].as_str().expect("id");

    let (status, body) = send(&app, "GET", &format!("/notes/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_create_missing_fields() {
    let app = app(MemoryNoteRepository::new());
    for payload in [
        json!({"title": "only title"}),
        json!({"content": "only content"}),
        json!({"title": "", "content": "x"}),
        json!({}),
    ] {
        let (status, body) = send(&app, "POST", "/notes", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Please provide both title and content for the note"
        );
    }
}

#[tokio::test]
async fn test_create_validation_failures() {
    let app = app(MemoryNoteRepository::new());

    let (status, body) = send(
        &app,
        "POST",
        "/notes",
        Some(json!({"title": "   ", "content": "body"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to create note");
    assert!(body["error"].as_str().unwrap().contains("Title is required"));

    let long_title = "x".repeat(101);
    let (status, body) = send(
        &app,
        "POST",
        "/notes",
        Some(json!({"title": long_title, "content": "body"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Title cannot be more than 100 characters"));

    let (_, list) = send(&app, "GET", "/notes", None).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_create_casts_scalar_fields_to_text() {
    let app = app(MemoryNoteRepository::new());
    let (status, body) = send(
        &app,
        "POST",
        "/notes",
        Some(json!({"title": 42, "content": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "42");

    let (status, body) = send(
        &app,
        "POST",
        "/notes",
        Some(json!({"title": ["a"], "content": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to create note");
}

#[tokio::test]
async fn test_create_malformed_json() {
    let app = app(MemoryNoteRepository::new());
    let request = Request::builder()
        .method("POST")
        .uri("/notes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to create note");
}

#[tokio::test]
async fn test_get_invalid_id_is_distinct_from_not_found() {
    let app = app(MemoryNoteRepository::new());

    let (status, body) = send(&app, "GET", "/notes/not-a-valid-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "message": "Invalid note ID format"}));

    let (status, body) = send(&app, "GET", &format!("/notes/{}", NoteId::new()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Note not found"}));
}

// -- Update --

#[tokio::test]
async fn test_update_requires_a_field() {
    let app = app(MemoryNoteRepository::new());
    let created = create(&app, "Title", "Body").await;
    let uri = format!("/notes/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide title or content to update");
}

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let app = app(MemoryNoteRepository::new());
    let created = create(&app, "Title", "Body").await;
    let uri = format!("/notes/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(json!({"content": " New body "}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Title");
    assert_eq!(body["data"]["content"], "New body");
    assert_eq!(body["data"]["createdAt"], created["createdAt"]);
    assert_eq!(body["data"]["id"], created["id"]);

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched["data"]["content"], "New body");
}

#[tokio::test]
async fn test_update_validation_failure() {
    let app = app(MemoryNoteRepository::new());
    let created = create(&app, "Title", "Body").await;
    let uri = format!("/notes/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"title": "", "content": "still fine"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to update note");
    assert!(body["error"].as_str().unwrap().contains("Title is required"));

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched["data"]["title"], "Title");
    assert_eq!(fetched["data"]["content"], "Body");
}

#[tokio::test]
async fn test_update_invalid_id_and_not_found() {
    let app = app(MemoryNoteRepository::new());

    let (status, body) = send(&app, "PUT", "/notes/xyz", Some(json!({"title": "t"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid note ID format");

    let uri = format!("/notes/{}", NoteId::new());
    let (status, body) = send(&app, "PUT", &uri, Some(json!({"title": "t"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not found");
}

// -- Delete --

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = app(MemoryNoteRepository::new());
    let created = create(&app, "Title", "Body").await;
    let uri = format!("/notes/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Note deleted successfully"})
    );

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_invalid_id() {
    let app = app(MemoryNoteRepository::new());
    let (status, body) = send(&app, "DELETE", "/notes/12345", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid note ID format");
}

#[tokio::test]
async fn test_count_reflects_page_size_not_total() {
    let repo = MemoryNoteRepository::new();
    let app = app(repo.clone());
    for i in 0..4 {
        create(&app, &format!("n{}", i), "c").await;
    }
    assert_eq!(repo.count(&Default::default()).await.unwrap(), 4);

    let (_, body) = send(&app, "GET", "/notes?limit=3", None).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["pagination"]["total"], 4);
}

// -- Store failures --

/// How a [`BrokenStore`] misbehaves on every call.
#[derive(Clone, Copy)]
enum Breakage {
    /// Return an unclassified store error.
    Fails,
    /// Panic inside the store call.
    Panics,
}

struct BrokenStore(Breakage);

impl BrokenStore {
    fn break_down<T>(&self) -> Result<T> {
        match self.0 {
            Breakage::Fails => Err(Error::Internal("connection reset".to_string())),
            Breakage::Panics => panic!("store exploded"),
        }
    }
}

#[async_trait]
impl NoteRepository for BrokenStore {
    async fn count(&self, _filter: &NoteFilter) -> Result<u64> {
        self.break_down()
    }

    async fn list(&self, _filter: &NoteFilter, _skip: u64, _limit: u64) -> Result<Vec<Note>> {
        self.break_down()
    }

    async fn fetch(&self, _id: NoteId) -> Result<Note> {
        self.break_down()
    }

    async fn insert(&self, _note: NewNote) -> Result<Note> {
        self.break_down()
    }

    async fn update(&self, _id: NoteId, _patch: NotePatch) -> Result<Note> {
        self.break_down()
    }

    async fn delete(&self, _id: NoteId) -> Result<()> {
        self.break_down()
    }
}

fn broken_app(expose_errors: bool) -> Router {
    broken_app_with(Breakage::Fails, expose_errors)
}

fn broken_app_with(breakage: Breakage, expose_errors: bool) -> Router {
    build_router(
        AppState::new(Arc::new(BrokenStore(breakage)), expose_errors),
        &AllowedOrigins::Any,
    )
}

#[tokio::test]
async fn test_store_failure_hides_detail_in_production() {
    let app = broken_app(false);

    let (status, body) = send(&app, "GET", "/notes", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "message": "Failed to retrieve notes"}));

    let (status, body) = send(&app, "GET", "/notes/search?query=x", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to search notes");

    let uri = format!("/notes/{}", NoteId::new());
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to retrieve note");

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "message": "Failed to delete note"}));
}

#[tokio::test]
async fn test_store_failure_on_write_is_bad_request() {
    let app = broken_app(false);

    let (status, body) = send(
        &app,
        "POST",
        "/notes",
        Some(json!({"title": "t", "content": "c"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "message": "Failed to create note"}));

    let uri = format!("/notes/{}", NoteId::new());
    let (status, body) = send(&app, "PUT", &uri, Some(json!({"title": "t"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to update note");
}

#[tokio::test]
async fn test_store_failure_exposes_detail_in_development() {
    let app = broken_app(true);

    let (status, body) = send(&app, "GET", "/notes", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to retrieve notes");
    assert!(body["error"].as_str().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn test_panic_in_handler_returns_envelope() {
    let app = broken_app_with(Breakage::Panics, false);
    let uri = format!("/notes/{}", NoteId::new());

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "An unexpected error occurred");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = app(MemoryNoteRepository::new());
    let body = json!({"title": "big", "content": "x".repeat(200 * 1024)}).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/notes")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({"success": false, "message": "Request body too large"})
    );
}

#[tokio::test]
async fn test_unsupported_method_returns_envelope() {
    let app = app(MemoryNoteRepository::new());
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/notes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ALLOW));

    let (status, body) = send(&app, "PATCH", &format!("/notes/{}", NoteId::new()), None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"success": false, "message": "Method not allowed"}));
}

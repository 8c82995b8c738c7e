use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use engine::{Engine, SqlRepository};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use server::{ServerState, router, types::expense::ExpenseView};
use tower::ServiceExt;

async fn state() -> ServerState {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .repository(Arc::new(SqlRepository::new(db)))
        .build()
        .unwrap();
    ServerState::new(engine)
}

async fn send(state: &ServerState, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn create_lunch(state: &ServerState) -> ExpenseView {
    let (status, body) = send(
        state,
        Method::POST,
        "/expenses",
        Some(r#"{"description":"Lunch","amount":12.5,"category":"Food"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn post_creates_expense() {
    let state = state().await;

    let (status, body) = send(
        &state,
        Method::POST,
        "/expenses",
        Some(r#"{"description":"Lunch","amount":12.5,"category":"Food"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body.contains(r#""amount":12.5"#), "{body}");
    let created: ExpenseView = serde_json::from_str(&body).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.description, "Lunch");
    assert_eq!(created.category, "Food");
}

#[tokio::test]
async fn post_accepts_empty_category() {
    let state = state().await;

    let (status, body) = send(
        &state,
        Method::POST,
        "/expenses",
        Some(r#"{"description":"Taxi","amount":8}"#),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let created: ExpenseView = serde_json::from_str(&body).unwrap();
    assert_eq!(created.category, "");
}

#[tokio::test]
async fn post_rejects_malformed_body() {
    let state = state().await;

    let (status, body) = send(&state, Method::POST, "/expenses", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid request body");

    let (status, _) = send(
        &state,
        Method::POST,
        "/expenses",
        Some(r#"{"description":"Lunch","amount":"lots"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_reports_validation_message() {
    let state = state().await;

    let (status, body) = send(
        &state,
        Method::POST,
        "/expenses",
        Some(r#"{"description":"Lunch","amount":0,"category":"Food"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "amount must be positive");

    let (status, body) = send(
        &state,
        Method::POST,
        "/expenses",
        Some(r#"{"description":"","amount":3,"category":"Food"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "description cannot be empty");
}

#[tokio::test]
async fn list_returns_json_array() {
    let state = state().await;

    let (status, body) = send(&state, Method::GET, "/expenses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");

    let created = create_lunch(&state).await;
    let (status, body) = send(&state, Method::GET, "/expenses", None).await;
    assert_eq!(status, StatusCode::OK);
    let all: Vec<ExpenseView> = serde_json::from_str(&body).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, created.id);
    assert_eq!(all[0].amount, 12.5);
}

#[tokio::test]
async fn get_by_id() {
    let state = state().await;
    let created = create_lunch(&state).await;

    let (status, body) = send(&state, Method::GET, &format!("/expenses/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: ExpenseView = serde_json::from_str(&body).unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.description, "Lunch");
    assert_eq!(fetched.category, "Food");
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let state = state().await;

    let (status, body) = send(&state, Method::GET, "/expenses/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Expense not found");
}

#[tokio::test]
async fn get_with_bad_id_is_400() {
    let state = state().await;

    let (status, body) = send(&state, Method::GET, "/expenses/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid ID");

    let (status, _) = send(&state, Method::GET, "/expenses/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_without_id_is_400() {
    let state = state().await;

    let (status, body) = send(&state, Method::DELETE, "/expenses/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing ID");

    let (status, body) = send(&state, Method::DELETE, "/expenses/12x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid ID format");
}

#[tokio::test]
async fn delete_removes_expense() {
    let state = state().await;
    let created = create_lunch(&state).await;
    let uri = format!("/expenses/{}", created.id);

    let (status, body) = send(&state, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Expense deleted");

    let (status, _) = send(&state, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&state, Method::GET, "/expenses", None).await;
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn delete_unknown_id_is_500_with_message() {
    let state = state().await;

    let (status, body) = send(&state, Method::DELETE, "/expenses/999", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "expense 999 not found");
}

#[tokio::test]
async fn other_methods_are_405() {
    let state = state().await;

    let (status, body) = send(&state, Method::PUT, "/expenses", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, "Method not allowed");

    let (status, _) = send(&state, Method::PATCH, "/expenses/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&state, Method::POST, "/expenses/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&state, Method::PUT, "/expenses/1/2", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn head_is_405() {
    let state = state().await;
    let created = create_lunch(&state).await;

    let item = format!("/expenses/{}", created.id);

    for uri in ["/expenses", "/expenses/", item.as_str()] {
        let (status, _) = send(&state, Method::HEAD, uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
    }
}

#[tokio::test]
async fn nested_paths_are_bad_ids() {
    let state = state().await;
    let created = create_lunch(&state).await;

    let (status, body) = send(&state, Method::GET, &format!("/expenses/{}/2", created.id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid ID");

    let (status, body) = send(&state, Method::DELETE, &format!("/expenses/{}/", created.id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid ID format");

    let (_, body) = send(&state, Method::GET, "/expenses", None).await;
    let all: Vec<ExpenseView> = serde_json::from_str(&body).unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn shutdown_cancels_store_calls() {
    let state = state().await;
    state.shutdown.cancel();

    let (status, body) = send(&state, Method::GET, "/expenses", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to fetch expenses");
}

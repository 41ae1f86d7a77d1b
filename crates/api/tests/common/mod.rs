//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::state::AppState;

/// Test configuration with a small page-size ceiling so clamping is easy
/// to observe.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        default_page_size: 10,
        max_page_size: 50,
    }
}

/// Build the production router over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Create a person through the API and return its ID.
pub async fn create_person(pool: &PgPool, first_name: &str, last_name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/persons",
        serde_json::json!({"first_name": first_name, "last_name": last_name, "age": 30}),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a note through the API, attached to `person_id` when given.
pub async fn create_note(pool: &PgPool, title: &str, person_id: Option<i64>) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/notes",
        serde_json::json!({"title": title, "person_id": person_id}),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// John owns two notes, Jane none, Emily one. Returns the three person IDs.
pub async fn seed_scenario(pool: &PgPool) -> [i64; 3] {
    let john = create_person(pool, "John", "Doe").await;
    let jane = create_person(pool, "Jane", "Roe").await;
    let emily = create_person(pool, "Emily", "Stone").await;

    create_note(pool, "Groceries", Some(john)).await;
    create_note(pool, "Dentist", Some(john)).await;
    create_note(pool, "Taxes", Some(emily)).await;

    [john, jane, emily]
}

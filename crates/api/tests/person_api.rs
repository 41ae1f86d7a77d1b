//! HTTP-level integration tests for the `/persons` endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, body_text, create_note, create_person, delete, get, post_json, seed_scenario,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_person_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/persons",
        serde_json::json!({"first_name": "Ada", "last_name": "Lovelace", "age": 36}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_number());
    assert_eq!(json["first_name"], "Ada");
    assert_eq!(json["age"], 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_person_by_id(pool: PgPool) {
    let id = create_person(&pool, "Grace", "Hopper").await;

    let response = get(common::build_test_app(pool), &format!("/api/v1/persons/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["last_name"], "Hopper");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_person_returns_404_text(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/persons/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Person with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_person_cascades_to_notes(pool: PgPool) {
    let [john, jane, _] = seed_scenario(&pool).await;
    let orphan = create_note(&pool, "Loose", None).await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/persons/{john}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/persons/{john}/with-notes"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Only Emily's note and the detached one survive.
    let response = get(common::build_test_app(pool.clone()), "/api/v1/notes").await;
    let json = body_json(response).await;
    assert_eq!(json["total_elements"], 2);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notes/{orphan}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/persons/{jane}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_person_returns_404(pool: PgPool) {
    let response = delete(common::build_test_app(pool), "/api/v1/persons/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_note_for_person(pool: PgPool) {
    let id = create_person(&pool, "Alan", "Turing").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/persons/{id}/notes"),
        serde_json::json!({"title": "Enigma"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Enigma");
    assert_eq!(json["person_id"], id);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/persons/999999/notes",
        serde_json::json!({"title": "Nobody"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

async fn seed_many(pool: &PgPool, count: usize) {
    for i in 0..count {
        create_person(pool, &format!("Person{i:02}"), "Bulk").await;
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_last_page_reports_totals(pool: PgPool) {
    seed_many(&pool, 25).await;

    let response = get(
        common::build_test_app(pool),
        "/api/v1/persons?page=2&size=10",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["content"].as_array().unwrap().len(), 5);
    assert_eq!(json["number_of_elements"], 5);
    assert_eq!(json["total_elements"], 25);
    assert_eq!(json["total_pages"], 3);
    assert_eq!(json["page"], 2);
    assert_eq!(json["has_next"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slice_reports_has_next_without_totals(pool: PgPool) {
    seed_many(&pool, 25).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/persons/using-slice?page=1&size=10",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["content"].as_array().unwrap().len(), 10);
    assert_eq!(json["has_next"], true);
    assert!(json.get("total_elements").is_none());

    let response = get(
        common::build_test_app(pool),
        "/api/v1/persons/using-slice?page=2&size=10",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["number_of_elements"], 5);
    assert_eq!(json["has_next"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_page_uses_configured_default_size_and_clamps(pool: PgPool) {
    seed_many(&pool, 12).await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/persons").await;
    let json = body_json(response).await;
    assert_eq!(json["size"], 10);
    assert_eq!(json["number_of_elements"], 10);

    let response = get(common::build_test_app(pool), "/api/v1/persons?size=5000").await;
    let json = body_json(response).await;
    assert_eq!(json["size"], 50);
    assert_eq!(json["number_of_elements"], 12);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sort_descending_by_first_name(pool: PgPool) {
    seed_scenario(&pool).await;

    let response = get(
        common::build_test_app(pool),
        "/api/v1/persons?sort=first_name,desc",
    )
    .await;
    let json = body_json(response).await;
    let names: Vec<_> = json["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["first_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["John", "Jane", "Emily"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_max_page_index_is_empty_for_page_and_slice(pool: PgPool) {
    seed_many(&pool, 25).await;

    for path in ["/api/v1/persons", "/api/v1/persons/using-slice"] {
        let response = get(
            common::build_test_app(pool.clone()),
            &format!("{path}?page={}&size=10", i64::MAX),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");

        let json = body_json(response).await;
        assert_eq!(json["content"], serde_json::json!([]), "{path}");
        assert_eq!(json["page"], i64::MAX, "{path}");
        assert_eq!(json["has_next"], false, "{path}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_sort_field_returns_400(pool: PgPool) {
    let response = get(
        common::build_test_app(pool),
        "/api/v1/persons?sort=password,asc",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("password"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_zero_page_size_returns_400(pool: PgPool) {
    let response = get(
        common::build_test_app(pool),
        "/api/v1/persons/using-slice?size=0",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Loading notes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_with_notes_eager_and_lazy_agree(pool: PgPool) {
    let [john, _, _] = seed_scenario(&pool).await;

    let eager = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/persons/{john}/with-notes"),
        )
        .await,
    )
    .await;
    let lazy = body_json(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/persons/{john}/with-notes?fetch=lazy"),
        )
        .await,
    )
    .await;

    assert_eq!(eager, lazy);
    assert_eq!(eager["first_name"], "John");
    assert_eq!(eager["notes"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_fetch_mode_returns_400(pool: PgPool) {
    let [john, _, _] = seed_scenario(&pool).await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/persons/{john}/with-notes?fetch=sometimes"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_id_range_keeps_person_without_notes(pool: PgPool) {
    let [john, _, emily] = seed_scenario(&pool).await;

    for fetch in ["eager", "lazy"] {
        let response = get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/persons/by-id-range?from={john}&to={emily}&fetch={fetch}"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let counts: Vec<_> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["notes"].as_array().unwrap().len())
            .collect();
        assert_eq!(counts, vec![2, 0, 1], "fetch={fetch}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_by_first_name_returns_persons_only(pool: PgPool) {
    seed_scenario(&pool).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/persons/by-first-name?first_name=John",
    )
    .await;
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert!(data[0].get("notes").is_none());

    let response = get(
        common::build_test_app(pool),
        "/api/v1/persons/by-name?first_name=John&fetch=lazy",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["notes"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_by_first_name_rejects_fetch_flag(pool: PgPool) {
    seed_scenario(&pool).await;

    let response = get(
        common::build_test_app(pool),
        "/api/v1/persons/by-first-name?first_name=John&fetch=bogus",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_by_name_without_match_is_empty(pool: PgPool) {
    seed_scenario(&pool).await;

    let response = get(
        common::build_test_app(pool),
        "/api/v1/persons/by-name?first_name=Nobody",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_note_counts_include_zero(pool: PgPool) {
    let [john, jane, emily] = seed_scenario(&pool).await;

    let response = get(
        common::build_test_app(pool),
        "/api/v1/persons/with-notes-count",
    )
    .await;
    let json = body_json(response).await;
    let counts: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| (row["id"].as_i64().unwrap(), row["note_count"].as_i64().unwrap()))
        .collect();
    assert_eq!(counts, vec![(john, 2), (jane, 0), (emily, 1)]);
}

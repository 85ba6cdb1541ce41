//! HTTP server and routing integration tests
//!
//! Exercise the router with an in-memory database and no provider client
//! configured, so no test touches the network.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cinedex_mi::{build_router, AppState};

/// Create test app state with in-memory database and no OMDb client.
/// One connection only: pooled in-memory connections are separate dbs.
async fn test_app_state() -> AppState {
    let db_pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&db_pool)
        .await
        .unwrap();
    cinedex_common::db::init::create_schema(&db_pool).await.unwrap();
    AppState::new(db_pool, None)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_route_serves_html() {
    let app = build_router(test_app_state().await);

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));
}

#[tokio::test]
async fn health_reports_module_and_version() {
    let app = build_router(test_app_state().await);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "cinedex-mi");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn search_without_configured_key_is_rejected() {
    let app = build_router(test_app_state().await);

    let response = app.oneshot(get("/api/search?title=Inception")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn search_with_empty_title_is_rejected() {
    let app = build_router(test_app_state().await);

    let response = app.oneshot(get("/api/search?title=%20")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingest_start_requires_titles() {
    let app = build_router(test_app_state().await);

    let response = app
        .oneshot(post_json("/api/ingest/start", json!({"titles": "\n\n"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingest_status_of_unknown_session_is_404() {
    let app = build_router(test_app_state().await);

    let response = app
        .oneshot(get("/api/ingest/status/00000000-0000-4000-8000-000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn api_key_settings_round_trip() {
    let state = test_app_state().await;

    // Not configured initially
    let response = build_router(state.clone())
        .oneshot(get("/api/settings/omdb_api_key"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["configured"], false);

    // Blank keys are rejected
    let response = build_router(state.clone())
        .oneshot(post_json("/api/settings/omdb_api_key", json!({"api_key": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A valid key is accepted and visible afterwards
    let response = build_router(state.clone())
        .oneshot(post_json(
            "/api/settings/omdb_api_key",
            json!({"api_key": "4bcd5aba"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_router(state)
        .oneshot(get("/api/settings/omdb_api_key"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["configured"], true);
}

#[tokio::test]
async fn watchlist_crud_over_http() {
    let state = test_app_state().await;

    // Create
    let response = build_router(state.clone())
        .oneshot(post_json(
            "/api/watchlists",
            json!({"name": "favorites", "description": "the good ones"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();

    // Duplicate names are rejected
    let response = build_router(state.clone())
        .oneshot(post_json("/api/watchlists", json!({"name": "favorites"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Listed with a zero movie count
    let response = build_router(state.clone())
        .oneshot(get("/api/watchlists"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["movie_count"], 0);

    // Adding an unknown movie is a 404
    let response = build_router(state.clone())
        .oneshot(post_json(
            &format!("/api/watchlists/{}/movies", id),
            json!({"imdb_id": "tt9999999"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete, then the listing is empty and a second delete is 404
    let response = build_router(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/watchlists/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/watchlists/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_router(test_app_state().await);
    let response = app.oneshot(get("/api/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

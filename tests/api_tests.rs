//! Integration tests for the REST API
//!
//! Each test builds the real router over an in-memory store and drives it
//! with `oneshot` requests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use medalboard::server::{router, AppState};
use medalboard::storage::SqliteStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct Fixture {
    app: Router,
    russia: i64,
    usa: i64,
    gymnastics: i64,
    swimming: i64,
}

fn fixture() -> Fixture {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let (russia, usa, gymnastics, swimming) = store
        .write(|gw| {
            Ok((
                gw.insert_country("Russia")?.id,
                gw.insert_country("United States")?.id,
                gw.insert_sport("Gymnastics")?.id,
                gw.insert_sport("Swimming")?.id,
            ))
        })
        .unwrap();

    let app = router(Arc::new(AppState::new(store)));
    Fixture { app, russia, usa, gymnastics, swimming }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_text(app: &Router, uri: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await.0
}

async fn save_nemov(f: &Fixture) -> Value {
    let (status, saved) = post_json(
        &f.app,
        "/saveAthlete",
        json!({
            "name": "Aleksey Nemov",
            "country": {"id": f.russia},
            "results": [{
                "sport": {"id": f.gymnastics},
                "age": 24, "year": 2000, "date": "01/10/2000",
                "gold": 2, "silver": 1, "bronze": 3
            }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    saved
}

#[tokio::test]
async fn test_health() {
    let f = fixture();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&f.app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_reference_data_listing() {
    let f = fixture();

    let (status, countries) = get_json(&f.app, "/countries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(countries.as_array().unwrap().len(), 2);
    assert_eq!(countries[0]["name"], "Russia");

    let (status, sports) = get_json(&f.app, "/sports").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sports[1]["name"], "Swimming");
    assert_eq!(sports[1]["id"], f.swimming);
}

#[tokio::test]
async fn test_save_then_get() {
    let f = fixture();
    let saved = save_nemov(&f).await;
    let id = saved["id"].as_i64().unwrap();

    assert_eq!(saved["country"]["name"], "Russia");
    assert_eq!(saved["results"][0]["sport"]["name"], "Gymnastics");
    assert!(saved["results"][0].get("athlete_id").is_none());

    let (status, fetched) = get_json(&f.app, &format!("/athlete?id={}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, saved);

    let (status, athletes) = get_json(&f.app, "/athletes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(athletes.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_athlete_errors() {
    let f = fixture();

    let (status, body) = get_json(&f.app, "/athlete?id=999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "athlete not found: 999");

    let (status, _) = get_json(&f.app, "/athlete").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&f.app, "/athlete?id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_reconciles_results() {
    let f = fixture();
    let saved = save_nemov(&f).await;
    let id = saved["id"].as_i64().unwrap();
    let existing = saved["results"][0].clone();

    let mut updated = existing.clone();
    updated["age"] = json!(100);
    updated["gold"] = json!(200);

    let (status, reloaded) = post_json(
        &f.app,
        "/saveAthlete",
        json!({
            "id": id,
            "name": "Aleksey Nemov",
            "country": saved["country"],
            "results": [
                updated,
                {
                    "sport": {"id": f.gymnastics, "name": "Gymnastics"},
                    "age": 101, "year": 2017, "date": "01/01/2017",
                    "gold": 1, "silver": 2, "bronze": 3
                }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let results = reloaded["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], existing["id"]);
    assert_eq!(results[0]["age"], 100);
    assert_eq!(results[0]["gold"], 200);
    assert_eq!(results[1]["sport"]["name"], "Gymnastics");
    assert_eq!(results[1]["age"], 101);
    assert_eq!(results[1]["year"], 2017);
    assert_eq!(results[1]["date"], "01/01/2017");
    assert_eq!(results[1]["silver"], 2);

    let (_, fetched) = get_json(&f.app, &format!("/athlete?id={}", id)).await;
    assert_eq!(fetched, reloaded);
}

#[tokio::test]
async fn test_save_rejections() {
    let f = fixture();

    // Unknown country
    let (status, body) = post_json(
        &f.app,
        "/saveAthlete",
        json!({"name": "Nobody", "country": {"id": 404}, "results": []}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("country"));

    // New athlete without a country
    let (status, _) = post_json(&f.app, "/saveAthlete", json!({"name": "Nobody"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Result without a sport
    let (status, _) = post_json(
        &f.app,
        "/saveAthlete",
        json!({"name": "Nobody", "country": {"id": f.usa}, "results": [{"year": 2008}]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was written by the failed saves
    let (_, athletes) = get_json(&f.app, "/athletes").await;
    assert!(athletes.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let f = fixture();
    let saved = save_nemov(&f).await;
    let id = saved["id"].as_i64().unwrap();

    assert_eq!(post_text(&f.app, "/deleteAthlete", &id.to_string()).await, StatusCode::OK);
    assert_eq!(post_text(&f.app, "/deleteAthlete", &format!(" {}\n", id)).await, StatusCode::OK);

    let (status, _) = get_json(&f.app, &format!("/athlete?id={}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Reference data survives the cascade
    let (_, countries) = get_json(&f.app, "/countries").await;
    assert_eq!(countries.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_rejects_non_numeric_body() {
    let f = fixture();

    assert_eq!(post_text(&f.app, "/deleteAthlete", "").await, StatusCode::BAD_REQUEST);
    assert_eq!(post_text(&f.app, "/deleteAthlete", r#"{"id": 1}"#).await, StatusCode::BAD_REQUEST);
}

async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let f = fixture();

    let (status, body) = post_raw(&f.app, "/saveAthlete", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Bad request"));

    // Wrongly typed field is a 400, not axum's default 422
    let (status, body) = post_raw(&f.app, "/saveAthlete", r#"{"name":"a","results":[{"gold":"x"}]}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("gold"));

    let (_, athletes) = get_json(&f.app, "/athletes").await;
    assert!(athletes.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_query_uses_error_envelope() {
    let f = fixture();

    let (status, body) = get_json(&f.app, "/athlete?id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = get_json(&f.app, "/athlete").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("id"));
}

#[tokio::test]
async fn test_negative_medals_rejected() {
    let f = fixture();
    let (status, body) = post_json(
        &f.app,
        "/saveAthlete",
        json!({
            "name": "Nobody",
            "country": {"id": f.usa},
            "results": [{"sport": {"id": f.swimming}, "year": 2008, "gold": -1}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("negative"));
}

#[tokio::test]
async fn test_deleting_unknown_id_leaves_data_unchanged() {
    let f = fixture();
    save_nemov(&f).await;
    let (_, before) = get_json(&f.app, "/athletes").await;

    assert_eq!(post_text(&f.app, "/deleteAthlete", "424242").await, StatusCode::OK);
    assert_eq!(post_text(&f.app, "/deleteAthlete", "424242").await, StatusCode::OK);

    let (_, after) = get_json(&f.app, "/athletes").await;
    assert_eq!(after, before);
    assert_eq!(after.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_of_different_athletes() {
    let f = fixture();
    let saves = (0..8).map(|i| {
        let app = f.app.clone();
        let country = if i % 2 == 0 { f.usa } else { f.russia };
        let sport = f.swimming;
        tokio::spawn(async move {
            post_json(
                &app,
                "/saveAthlete",
                json!({
                    "name": format!("Athlete {}", i),
                    "country": {"id": country},
                    "results": [{"sport": {"id": sport}, "year": 2000 + i, "gold": 1}]
                }),
            )
            .await
        })
    });

    for handle in saves.collect::<Vec<_>>() {
        let (status, saved) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["results"].as_array().unwrap().len(), 1);
    }

    let (_, athletes) = get_json(&f.app, "/athletes").await;
    assert_eq!(athletes.as_array().unwrap().len(), 8);
}

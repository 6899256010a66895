use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use commissions_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router(seed: bool) -> (TempDir, Router) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
        static_dir: "dist".to_string(),
        seed_sample_data: seed,
    };
    let state = build_state(&config).await.unwrap();
    (tmp, app_router(state, &config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn orlando() -> Value {
    json!({
        "label": "264.24 – Orlando",
        "totalValue": 24500,
        "paidValue": 12250,
        "commissionPercent": 10,
        "commissionPaidValue": 1225
    })
}

#[tokio::test]
async fn create_returns_201_with_derived_fields() {
    let (_tmp, app) = build_test_router(false).await;

    let (status, body) = send(&app, Method::POST, "/api/proposals", Some(orlando())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["openBalance"].as_f64(), Some(12250.0));
    assert_eq!(body["totalCommission"].as_f64(), Some(2450.0));
    assert_eq!(body["commissionPaidPercent"].as_f64(), Some(50.0));
}

#[tokio::test]
async fn create_rejects_missing_and_invalid_fields() {
    let (_tmp, app) = build_test_router(false).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proposals",
        Some(json!({ "label": "no amounts" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let mut over_rate = orlando();
    over_rate["commissionPercent"] = json!(150);
    let (status, _) = send(&app, Method::POST, "/api/proposals", Some(over_rate)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, list) = send(&app, Method::GET, "/api/proposals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn patch_recomputes_derived_fields() {
    let (_tmp, app) = build_test_router(false).await;
    let (_, created) = send(&app, Method::POST, "/api/proposals", Some(orlando())).await;
    let uri = format!("/api/proposals/{}", created["id"]);

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "paidValue": "24500" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["label"], created["label"]);
    assert_eq!(updated["openBalance"].as_f64(), Some(0.0));
    assert_eq!(updated["totalCommission"].as_f64(), Some(2450.0));

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "commissionPercent": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_and_unknown_ids() {
    let (_tmp, app) = build_test_router(false).await;

    let (status, body) = send(&app, Method::GET, "/api/proposals/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ID format");

    let (status, body) = send(&app, Method::GET, "/api/proposals/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/proposals/999",
        Some(json!({ "paidValue": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_not_found() {
    let (_tmp, app) = build_test_router(false).await;
    let (_, created) = send(&app, Method::POST, "/api/proposals", Some(orlando())).await;
    let uri = format!("/api/proposals/{}", created["id"]);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn seeded_summary_matches_sample_totals() {
    let (_tmp, app) = build_test_router(true).await;

    let (status, list) = send(&app, Method::GET, "/api/proposals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 4);

    let (status, summary) = send(&app, Method::GET, "/api/proposals/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totals"]["totalValue"].as_f64(), Some(101350.0));
    assert_eq!(summary["totals"]["paidValue"].as_f64(), Some(52400.0));
    assert_eq!(summary["totals"]["totalCommission"].as_f64(), Some(12344.0));
    assert_eq!(summary["payments"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn out_of_range_amounts_are_rejected_and_reads_keep_working() {
    let (_tmp, app) = build_test_router(false).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proposals",
        Some(json!({
            "label": "overflow",
            "totalValue": 1,
            "paidValue": 0,
            "commissionPercent": 0.0001,
            "commissionPaidValue": 1e23
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let mut too_large = orlando();
    too_large["totalValue"] = json!("100000000");
    let (status, _) = send(&app, Method::POST, "/api/proposals", Some(too_large)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut at_limit = orlando();
    at_limit["totalValue"] = json!("99999999.99");
    let (status, _) = send(&app, Method::POST, "/api/proposals", Some(at_limit)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = send(&app, Method::GET, "/api/proposals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (status, _) = send(&app, Method::GET, "/api/proposals/summary", None).await;
    assert_eq!(status, StatusCode::OK);
}

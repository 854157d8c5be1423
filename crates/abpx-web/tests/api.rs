//! JSON API endpoints.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use abpx_common::AppConfig;
use abpx_test_utils::{spawn_fold_stub, tiny_forest, FoldStub};
use abpx_web::{router::build_router, state::AppState};

async fn app() -> (Router, FoldStub) {
    let stub = spawn_fold_stub().await;
    let mut config = AppConfig::default();
    config.folding.endpoint = stub.endpoint();
    let state = AppState::new(config, Arc::new(tiny_forest())).unwrap();
    (build_router(Arc::new(state)), stub)
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_model() {
    let (app, stub) = app().await;
    let (status, body) = call(&app, Request::get("/api/health").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["model"]["kind"], "random_forest");
    assert_eq!(body["data"]["model"]["n_estimators"], 2);
    assert_eq!(body["data"]["model"]["features"].as_array().unwrap().len(), 9);
    assert_eq!(body["data"]["folding_endpoint"], stub.endpoint());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_predict_screens_each_entry() {
    let (app, _stub) = app().await;
    let req = post_json(
        "/api/predict",
        &json!({ "sequences": ["AAACCCDDDEEE", "AAAXXX123"] }).to_string(),
    );
    let (status, body) = call(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["execution_time_ms"].is_u64());

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["index"], 1);
    assert_eq!(data[0]["status"], "predicted");
    assert_eq!(data[0]["label"], 1);
    assert!((data[0]["probability"].as_f64().unwrap() - 0.8).abs() < 1e-12);
    assert_eq!(data[1]["status"], "invalid");
    assert!(data[1]["reason"].as_str().unwrap().contains("Invalid residue"));
}

#[tokio::test]
async fn test_predict_rejects_empty_and_malformed() {
    let (app, _stub) = app().await;

    let (status, body) = call(&app, post_json("/api/predict", r#"{"sequences": []}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No sequences provided");

    let (status, body) = call(&app, post_json("/api/predict", r#"{"peptides": "KLAK"}"#)).await;
    assert!(status.is_client_error());
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_fold_returns_tagged_outcomes_in_order() {
    let (app, stub) = app().await;
    let req = post_json(
        "/api/fold",
        &json!({ "sequences": ["klak", "FAILKK", "AAAXXX"] }).to_string(),
    );
    let (status, body) = call(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);

    assert_eq!(data[0]["status"], "folded");
    assert!(data[0]["pdb"].as_str().unwrap().contains("ATOM"));

    assert_eq!(data[1]["status"], "failed");
    assert_eq!(data[1]["error"]["kind"], "status");
    assert_eq!(data[1]["error"]["detail"], 500);

    assert_eq!(data[2]["status"], "failed");
    assert_eq!(data[2]["error"]["kind"], "invalid_sequence");

    let bodies: Vec<String> = stub.received().into_iter().map(|r| r.body).collect();
    assert_eq!(bodies.len(), 2);
    assert!(bodies.contains(&"KLAK".to_string()));
}

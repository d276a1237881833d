//! Endpoint tests
//!
//! Drive the real router through `tower::ServiceExt::oneshot` with fixture
//! artifacts. Database-backed paths are exercised with either no pool or a
//! pool pointing at a dead address.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::ml::predictor::ChurnPredictor;
use crate::ml::testutil;
use crate::{create_router, AppState};

fn serving_only_app() -> Router {
    create_router(AppState {
        predictor: ChurnPredictor::new(testutil::store()),
        pool: None,
    })
}

fn broken_db_app() -> Router {
    create_router(AppState {
        predictor: ChurnPredictor::new(testutil::store()),
        pool: Some(testutil::unreachable_pool()),
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_describes_the_service() {
    let response = serving_only_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Customer Churn Prediction API");
    assert_eq!(body["status"], "running");
    assert_eq!(body["endpoints"]["predict"], "/predict");
    assert_eq!(body["endpoints"]["model_info"], "/model-info");
}

#[tokio::test]
async fn health_is_healthy_without_a_database() {
    let response = serving_only_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["database"], "disabled");
}

#[tokio::test]
async fn health_degrades_when_database_is_unreachable() {
    let response = broken_db_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["database"], "unreachable");
}

#[tokio::test]
async fn predict_returns_a_complete_result() {
    let response = serving_only_app()
        .oneshot(post_json("/predict", &testutil::sample_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["churn_prediction"], "Yes");
    assert_eq!(body["risk_level"], "Medium");
    assert!((body["churn_probability"].as_f64().unwrap() - 0.55).abs() < 1e-9);
    let id = body["customer_id"].as_str().unwrap();
    assert!(id.starts_with("pred_"));
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn predict_is_deterministic_with_fresh_identifiers() {
    let app = serving_only_app();
    let first = body_json(
        app.clone()
            .oneshot(post_json("/predict", &testutil::sample_payload()))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(
        app.oneshot(post_json("/predict", &testutil::sample_payload()))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first["churn_probability"], second["churn_probability"]);
    assert_eq!(first["churn_prediction"], second["churn_prediction"]);
    assert_ne!(first["customer_id"], second["customer_id"]);
}

#[tokio::test]
async fn predict_rejects_out_of_domain_category() {
    let mut payload = testutil::sample_payload();
    payload["Contract"] = Value::from("Weekly");

    let response = serving_only_app()
        .oneshot(post_json("/predict", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("contract"));
}

#[tokio::test]
async fn predict_rejects_out_of_range_tenure() {
    for tenure in [-1, 101] {
        let mut payload = testutil::sample_payload();
        payload["tenure"] = Value::from(tenure);

        let response = serving_only_app()
            .oneshot(post_json("/predict", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn predict_rejects_wrong_field_type() {
    let mut payload = testutil::sample_payload();
    payload["tenure"] = Value::from("two dozen");

    let response = serving_only_app()
        .oneshot(post_json("/predict", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn predict_rejects_missing_field() {
    let mut payload = testutil::sample_payload();
    payload.as_object_mut().unwrap().remove("tenure");

    let response = serving_only_app()
        .oneshot(post_json("/predict", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn predict_survives_a_failed_log_write() {
    let response = broken_db_app()
        .oneshot(post_json("/predict", &testutil::sample_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["churn_prediction"], "Yes");
    assert!((body["churn_probability"].as_f64().unwrap() - 0.55).abs() < 1e-9);
}

#[tokio::test]
async fn stats_and_history_need_a_database() {
    for uri in ["/stats", "/history?limit=5"] {
        let response = serving_only_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }
}

#[tokio::test]
async fn model_info_describes_the_artifacts() {
    let response = serving_only_app().oneshot(get("/model-info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["model_type"], "RandomForestClassifier");
    assert_eq!(body["model_version"], "1.0");
    assert_eq!(body["number_of_features"], 19);
    assert_eq!(body["features"][0], "gender");
    assert_eq!(body["features"][18], "TotalCharges");
    assert_eq!(body["encoders"].as_array().unwrap().len(), 15);
    assert!(body["metrics"].is_null());
}

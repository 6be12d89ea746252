use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use super::common::*;
use crate::sovi::router::portal_router;

fn app() -> (Router, Arc<crate::sovi::service::PortalService<MemoryRepository>>) {
    let (service, _) = build_service();
    let service = Arc::new(service);
    (portal_router(service.clone()), service)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn calculate_endpoint_previews_scores() {
    let (app, _) = app();
    let payload = serde_json::to_value(kasur_indicators()).expect("payload");

    let response = app
        .oneshot(json_request("POST", "/api/v1/sovi/calculate", payload))
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.get("totalSoVI").and_then(Value::as_f64), Some(50.73));
    assert_eq!(body.get("rating").and_then(Value::as_u64), Some(3));
}

#[tokio::test]
async fn submit_endpoint_persists_and_returns_created() {
    let (app, service) = app();
    let district = service
        .create_district(punjab_district("Kasur"))
        .expect("district registers");

    let mut payload = serde_json::to_value(kasur_indicators()).expect("payload");
    payload["districtId"] = json!(district.id);
    payload["year"] = json!(2024);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/sovi/district-data", payload))
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body.get("districtId").and_then(Value::as_i64), Some(district.id));
    assert_eq!(body.get("Sedu").and_then(Value::as_f64), Some(63.75));

    let latest = app
        .oneshot(get_request(&format!(
            "/api/v1/sovi/district/{}/latest",
            district.id
        )))
        .await
        .expect("handler responds");
    assert_eq!(latest.status(), StatusCode::OK);
    let body = read_json_body(latest).await;
    assert_eq!(body.get("year").and_then(Value::as_i64), Some(2024));
}

#[tokio::test]
async fn submit_endpoint_rejects_out_of_range_values() {
    let (app, service) = app();
    let district = service
        .create_district(punjab_district("Okara"))
        .expect("district registers");

    let payload = json!({
        "districtId": district.id,
        "year": 2024,
        "NOSCL": 140.0,
    });

    let response = app
        .oneshot(json_request("POST", "/api/v1/sovi/district-data", payload))
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    let errors = body.get("errors").and_then(Value::as_array).expect("errors array");
    assert!(errors
        .iter()
        .any(|e| e.as_str().is_some_and(|s| s.contains("NOSCL"))));
}

#[tokio::test]
async fn submit_endpoint_404s_for_unknown_districts() {
    let (app, _) = app();

    let payload = json!({ "districtId": 987654, "year": 2024 });
    let response = app
        .oneshot(json_request("POST", "/api/v1/sovi/district-data", payload))
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_endpoint_404s_without_data() {
    let (app, service) = app();
    let district = service
        .create_district(punjab_district("Sukkur"))
        .expect("district registers");

    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/sovi/district/{}/latest",
            district.id
        )))
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_endpoint_404s_for_unknown_records() {
    let (app, _) = app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/sovi/district-data/31337")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_endpoint_filters_by_year() {
    let (app, service) = app();
    let district = service
        .create_district(punjab_district("Quetta"))
        .expect("district registers");
    for year in [2022, 2023, 2024] {
        service
            .submit_indicators(submission(district.id, year))
            .expect("submission persists");
    }

    let all = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/sovi/district/{}", district.id)))
        .await
        .expect("handler responds");
    let body = read_json_body(all).await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    let filtered = app
        .oneshot(get_request(&format!(
            "/api/v1/sovi/district/{}?year=2023",
            district.id
        )))
        .await
        .expect("handler responds");
    let body = read_json_body(filtered).await;
    let records = body.as_array().expect("array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("year").and_then(Value::as_i64), Some(2023));
}

#[tokio::test]
async fn validate_improvement_endpoint_reports_deltas() {
    let (app, _) = app();

    let payload = json!({
        "currentData": serde_json::to_value(survey_scoring(50)).expect("payload"),
        "newData": serde_json::to_value(survey_scoring(65)).expect("payload"),
    });

    let response = app
        .oneshot(json_request("POST", "/api/v1/sovi/validate-improvement", payload))
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.get("isValid").and_then(Value::as_bool), Some(true));
    assert_eq!(
        body.get("improvements")
            .and_then(|i| i.get("totalSoVI"))
            .and_then(Value::as_f64),
        Some(15.0)
    );
}

#[tokio::test]
async fn bulk_update_endpoint_reports_partial_failures() {
    let (app, service) = app();
    let district = service
        .create_district(punjab_district("Swat"))
        .expect("district registers");

    let mut good = serde_json::to_value(kasur_indicators()).expect("payload");
    good["districtId"] = json!(district.id);
    good["year"] = json!(2024);
    let bad = json!({ "districtId": 555555, "year": 2024 });

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/sovi/bulk-update",
            json!([good, bad]),
        ))
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.get("success").and_then(Value::as_u64), Some(1));
    assert_eq!(body.get("failed").and_then(Value::as_u64), Some(1));
}

#[tokio::test]
async fn map_data_endpoint_lists_every_district() {
    let (app, service) = app();
    let kasur = service
        .create_district(punjab_district("Kasur"))
        .expect("district registers");
    service
        .create_district(punjab_district("Mardan"))
        .expect("district registers");
    service
        .submit_indicators(submission(kasur.id, 2024))
        .expect("submission persists");

    let response = app
        .oneshot(get_request("/api/v1/sovi/map-data"))
        .await
        .expect("handler responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    let scored = entries
        .iter()
        .find(|e| e.get("id").and_then(Value::as_i64) == Some(kasur.id))
        .expect("kasur present");
    assert_eq!(scored.get("soviScore").and_then(Value::as_f64), Some(50.73));
}

#[tokio::test]
async fn district_routes_register_and_describe_districts() {
    let (app, _) = app();

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/districts",
            json!({ "name": "Gilgit", "province": "Gilgit-Baltistan" }),
        ))
        .await
        .expect("handler responds");
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = read_json_body(created).await;
    let id = body.get("id").and_then(Value::as_i64).expect("id assigned");
    assert_eq!(body.get("country").and_then(Value::as_str), Some("Pakistan"));

    let listed = app
        .clone()
        .oneshot(get_request("/api/v1/districts"))
        .await
        .expect("handler responds");
    let body = read_json_body(listed).await;
    assert!(body
        .as_array()
        .expect("array")
        .iter()
        .any(|d| d.get("id").and_then(Value::as_i64) == Some(id)));

    let detail = app
        .oneshot(get_request(&format!("/api/v1/districts/{id}")))
        .await
        .expect("handler responds");
    assert_eq!(detail.status(), StatusCode::OK);
    let body = read_json_body(detail).await;
    assert_eq!(body.get("name").and_then(Value::as_str), Some("Gilgit"));
    assert_eq!(body.get("data").and_then(Value::as_array).map(Vec::len), Some(0));
}

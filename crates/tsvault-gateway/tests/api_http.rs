//! HTTP contract tests driven through the router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::util::ServiceExt;

use tsvault_core::Measurement;
use tsvault_gateway::app_state::AppState;
use tsvault_gateway::config::TsVaultConfig;
use tsvault_gateway::router::build_router;
use tsvault_gateway::storage::{MeasurementStore, SnapshotBackend};

fn t(hour: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hour)
}

/// 48 hourly records from 2025-01-01T00:00Z, loaded in reverse order.
fn fixture() -> Vec<Measurement> {
    (0..48)
        .rev()
        .map(|h| Measurement::new(t(h), 20.0 + h as f64, 60.0 + h as f64, 400.0))
        .collect()
}

fn state_with(records: Vec<Measurement>) -> AppState {
    AppState::new(TsVaultConfig::default(), Arc::new(SnapshotBackend::from_records(records)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

#[tokio::test]
async fn range_query_returns_projected_points_in_order() {
    let app = build_router(state_with(fixture()));
    let (status, body) = get(app, "/api/measurements?field=field1&start_date=2025-01-01&end_date=2025-01-02").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    // Inclusive end: midnight of 2025-01-02 is hour 24.
    assert_eq!(rows.len(), 25);
    assert_eq!(rows[0]["timestamp"], "2025-01-01T00:00:00.000Z");
    assert_eq!(rows[0]["field1"], 20.0);
    assert_eq!(rows[24]["timestamp"], "2025-01-02T00:00:00.000Z");
    assert!(rows[0].get("field2").is_none());

    let ts: Vec<&str> = rows.iter().map(|r| r["timestamp"].as_str().unwrap()).collect();
    assert!(ts.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn range_query_with_no_matches_is_404() {
    let app = build_router(state_with(fixture()));
    let (status, body) = get(app, "/api/measurements?field=field2&start_date=2030-01-01&end_date=2030-01-02").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_DATA");
    assert_eq!(body["error"], "No data found in the specified range");
}

#[tokio::test]
async fn range_query_missing_params_is_400() {
    let app = build_router(state_with(fixture()));
    let (status, body) = get(app, "/api/measurements?field=field1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_PARAMETER");
    assert!(body["error"].as_str().unwrap().contains("start_date"));
}

#[tokio::test]
async fn invalid_field_is_400_on_both_endpoints() {
    let state = state_with(fixture());
    for uri in [
        "/api/measurements?field=field4&start_date=2025-01-01&end_date=2025-01-02",
        "/api/measurements/metrics?field=field4",
    ] {
        let (status, body) = get(build_router(state.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri={uri}");
        assert_eq!(body["code"], "INVALID_FIELD", "uri={uri}");
    }
}

#[tokio::test]
async fn malformed_date_is_400_on_both_endpoints() {
    let state = state_with(fixture());
    for uri in [
        "/api/measurements?field=field1&start_date=not-a-date&end_date=2025-01-02",
        "/api/measurements/metrics?field=field1&start_date=not-a-date&end_date=2025-01-02",
        "/api/measurements/metrics?field=field1&start_date=not-a-date",
    ] {
        let (status, body) = get(build_router(state.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri={uri}");
        assert_eq!(body["code"], "INVALID_DATE_FORMAT", "uri={uri}");
    }
}

#[tokio::test]
async fn metrics_over_known_values() {
    let records = vec![
        Measurement::new(t(0), 10.0, 0.0, 0.0),
        Measurement::new(t(1), 20.0, 0.0, 0.0),
        Measurement::new(t(2), 30.0, 0.0, 0.0),
    ];
    let app = build_router(state_with(records));
    let (status, body) = get(app, "/api/measurements/metrics?field=field1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["avg"], 20.0);
    assert_eq!(body["min"], 10.0);
    assert_eq!(body["max"], 30.0);
    assert_eq!(body["stdDev"], 8.16);
}

#[tokio::test]
async fn metrics_single_record_has_zero_std_dev() {
    let app = build_router(state_with(vec![Measurement::new(t(0), 25.0, 1.0, 2.0)]));
    let (status, body) = get(app, "/api/measurements/metrics?field=field1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"avg": 25.0, "min": 25.0, "max": 25.0, "stdDev": 0.0}));
}

#[tokio::test]
async fn metrics_applies_range_only_as_a_pair() {
    let state = state_with(fixture());

    // Hours 0..=24 of field1: 20..=44, mean 32.
    let (status, body) = get(
        build_router(state.clone()),
        "/api/measurements/metrics?field=field1&start_date=2025-01-01&end_date=2025-01-02",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["avg"], 32.0);
    assert_eq!(body["max"], 44.0);

    // A lone bound is ignored: all 48 hours, field1 20..=67.
    let (status, body) = get(build_router(state), "/api/measurements/metrics?field=field1&start_date=2025-01-02").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["min"], 20.0);
    assert_eq!(body["max"], 67.0);
}

#[tokio::test]
async fn metrics_on_empty_store_is_404() {
    let app = build_router(state_with(Vec::new()));
    let (status, body) = get(app, "/api/measurements/metrics?field=field3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_DATA");
    assert_eq!(body["error"], "No data found");
}

#[tokio::test]
async fn repeated_parameter_is_coded_400() {
    let state = state_with(fixture());
    for uri in [
        "/api/measurements/metrics?field=field1&field=field2",
        "/api/measurements/metrics?field=field1&start_date=2025-01-01&start_date=2025-01-02",
        "/api/measurements?field=field1&field=field2&start_date=2025-01-01&end_date=2025-01-02",
    ] {
        let (status, body) = get(build_router(state.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri={uri}");
        assert_eq!(body["code"], "INVALID_QUERY", "uri={uri}");
        assert!(body["error"].as_str().unwrap().starts_with("Invalid query string"), "uri={uri}");
    }

    let (_, body) = get(build_router(state), "/metrics").await;
    let text = body.as_str().unwrap();
    assert!(text.contains(r#"tsvault_queries_total{endpoint="metrics",outcome="INVALID_QUERY"} 2"#));
}

#[tokio::test]
async fn static_dir_serves_unrouted_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>tsvault</h1>").unwrap();

    let mut cfg = TsVaultConfig::default();
    cfg.server.static_dir = Some(dir.path().to_path_buf());
    let state = AppState::new(cfg, Arc::new(SnapshotBackend::from_records(fixture())));

    let (status, body) = get(build_router(state.clone()), "/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("<h1>tsvault</h1>".into()));

    // API routes still win over the fallback.
    let (status, body) = get(build_router(state), "/api/measurements/metrics?field=field1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["min"], 20.0);
}

#[tokio::test]
async fn unrouted_path_without_static_dir_is_404() {
    let (status, _) = get(build_router(state_with(fixture())), "/index.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn open_seeds_empty_store_on_start() {
    let mut cfg = TsVaultConfig::default();
    cfg.storage.data_path = None;
    cfg.storage.seed_on_start = true;
    cfg.seed.records = 24;
    let state = AppState::open(cfg).await.unwrap();

    assert_eq!(state.store().len().await.unwrap(), 24);

    let (status, body) = get(build_router(state.clone()), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains(r#"tsvault_bulk_loads_total{source="seed_on_start"} 1"#));
    assert!(text.contains("tsvault_records 24"));

    let (status, body) = get(build_router(state), "/api/measurements/metrics?field=field1").await;
    assert_eq!(status, StatusCode::OK);
    let min = body["min"].as_f64().unwrap();
    let max = body["max"].as_f64().unwrap();
    assert!((20.0..=30.0).contains(&min) && (20.0..=30.0).contains(&max));
}

#[tokio::test]
async fn open_without_seed_on_start_leaves_store_empty() {
    let mut cfg = TsVaultConfig::default();
    cfg.storage.seed_on_start = false;
    let state = AppState::open(cfg).await.unwrap();
    assert_eq!(state.store().len().await.unwrap(), 0);
}

#[tokio::test]
async fn closed_store_is_500_with_server_error_message() {
    let state = state_with(fixture());
    state.store().close().await.unwrap();

    let (status, body) = get(build_router(state.clone()), "/api/measurements/metrics?field=field1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "STORAGE_UNAVAILABLE");
    assert!(body["error"].as_str().unwrap().starts_with("Server error: "));

    let (status, _) = get(build_router(state), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn validation_precedes_storage() {
    // Even with a closed store, bad input is classified as 400.
    let state = state_with(fixture());
    state.store().close().await.unwrap();
    let (status, body) = get(build_router(state), "/api/measurements/metrics?field=field4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FIELD");
}

#[tokio::test]
async fn repeated_queries_are_identical() {
    let state = state_with(fixture());
    let uri = "/api/measurements?field=field2&start_date=2025-01-01&end_date=2025-01-03";
    let (_, a) = get(build_router(state.clone()), uri).await;
    let (_, b) = get(build_router(state), uri).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn ops_endpoints() {
    let state = state_with(fixture());

    let (status, body) = get(build_router(state.clone()), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));

    let (status, _) = get(build_router(state.clone()), "/readyz").await;
    assert_eq!(status, StatusCode::OK);

    let _ = get(build_router(state.clone()), "/api/measurements/metrics?field=field1").await;
    let _ = get(build_router(state.clone()), "/api/measurements/metrics?field=nope").await;

    let (status, body) = get(build_router(state.clone()), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("tsvault_records 48"));
    assert!(text.contains(r#"tsvault_queries_total{endpoint="metrics",outcome="ok"} 1"#));
    assert!(text.contains(r#"tsvault_queries_total{endpoint="metrics",outcome="INVALID_FIELD"} 1"#));
    assert!(text.contains(r#"tsvault_queries_in_flight{endpoint="metrics"} 0"#));

    state.set_draining();
    let (status, body) = get(build_router(state), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, Value::String("draining".into()));
}

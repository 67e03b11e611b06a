//! Measurement query handlers.
//!
//! Each handler plans the query (pure validation), scans the store, then
//! projects or aggregates. Validation failures never touch the store.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use tsvault_core::error::{Result, TsVaultError};
use tsvault_core::project::{project, ProjectedPoint};
use tsvault_core::query::{validate_and_build, QueryKind};
use tsvault_core::stats::{aggregate, MetricsSummary};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::obs::QueryMetrics;

/// Raw query string; every parameter is optional here so that absence is
/// classified by the planner rather than rejected by the extractor.
/// A query string that does not deserialize at all (a repeated key, for
/// instance) still surfaces as a coded 400.
#[derive(Debug, Default, Deserialize)]
pub struct MeasurementParams {
    pub field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `GET /api/measurements?field=&start_date=&end_date=`
pub async fn get_measurements(
    State(app): State<AppState>,
    query: std::result::Result<Query<MeasurementParams>, QueryRejection>,
) -> std::result::Result<Json<Vec<ProjectedPoint>>, ApiError> {
    observe(&app, "measurements", async {
        let q = parse_params(query)?;
        range_query(&app, &q).await
    })
    .await
    .map(Json)
}

/// `GET /api/measurements/metrics?field=[&start_date=&end_date=]`
pub async fn get_metrics(
    State(app): State<AppState>,
    query: std::result::Result<Query<MeasurementParams>, QueryRejection>,
) -> std::result::Result<Json<MetricsSummary>, ApiError> {
    observe(&app, "metrics", async {
        let q = parse_params(query)?;
        metrics_query(&app, &q).await
    })
    .await
    .map(Json)
}

fn parse_params(
    query: std::result::Result<Query<MeasurementParams>, QueryRejection>,
) -> Result<MeasurementParams> {
    query
        .map(|Query(q)| q)
        .map_err(|e| TsVaultError::InvalidQuery(e.body_text()))
}

async fn range_query(app: &AppState, q: &MeasurementParams) -> Result<Vec<ProjectedPoint>> {
    let spec = validate_and_build(
        QueryKind::Range,
        q.field.as_deref(),
        q.start_date.as_deref(),
        q.end_date.as_deref(),
    )?;

    let scan = app.store().scan(spec.range).await?;
    if scan.is_empty() {
        return Err(TsVaultError::EmptyRange);
    }
    Ok(project(&scan, spec.field).collect())
}

async fn metrics_query(app: &AppState, q: &MeasurementParams) -> Result<MetricsSummary> {
    let spec = validate_and_build(
        QueryKind::Metrics,
        q.field.as_deref(),
        q.start_date.as_deref(),
        q.end_date.as_deref(),
    )?;

    let scan = app.store().scan(spec.range).await?;
    let stats = aggregate(&scan, spec.field)?;
    tracing::debug!(field = %spec.field, count = stats.count, "metrics computed");
    Ok(stats.summary())
}

/// Decrements the in-flight gauge even when the caller abandons the request.
struct InFlight {
    metrics: Arc<QueryMetrics>,
    endpoint: &'static str,
}

impl InFlight {
    fn enter(metrics: Arc<QueryMetrics>, endpoint: &'static str) -> Self {
        metrics.queries_in_flight.inc(&[("endpoint", endpoint)]);
        Self { metrics, endpoint }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.metrics.queries_in_flight.dec(&[("endpoint", self.endpoint)]);
    }
}

/// Time the query, track in-flight count and record the outcome.
async fn observe<T>(
    app: &AppState,
    endpoint: &'static str,
    fut: impl Future<Output = Result<T>>,
) -> std::result::Result<T, ApiError> {
    let metrics = app.metrics();
    let started = Instant::now();
    let _in_flight = InFlight::enter(Arc::clone(&metrics), endpoint);
    let res = fut.await;
    metrics.record_query(endpoint, res.as_ref().map(|_| ()), started.elapsed());
    res.map_err(ApiError::from)
}

//! HTTP surface for the leapfrog aggregation pipeline.
//!
//! One data route, `GET /api/breakdown-changes`, plus a liveness
//! probe. The router is built here so the handlers can be exercised
//! in-process; the binary in `main.rs` only wires configuration and
//! serves.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

use leapfrog_lib::{DocsClient, FetchPolicy, MigrationReport, VersionRange, aggregate_changes};

/// Shared handler context.
#[derive(Clone)]
pub struct AppState {
    pub client: DocsClient,
    pub policy: FetchPolicy,
}

/// Raw query parameters of the breakdown endpoint.
///
/// Kept as strings so that non-numeric input falls back to the
/// default range instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct BreakdownParams {
    #[serde(rename = "sourceVersion")]
    pub source_version: Option<String>,
    #[serde(rename = "targetVersion")]
    pub target_version: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/breakdown-changes", get(breakdown_changes))
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn breakdown_changes(
    State(state): State<AppState>,
    Query(params): Query<BreakdownParams>,
) -> Result<Json<MigrationReport>, (StatusCode, Json<ErrorBody>)> {
    let range = VersionRange::from_params(
        params.source_version.as_deref(),
        params.target_version.as_deref(),
    );

    let report = aggregate_changes(&state.client, range, state.policy)
        .await
        .map_err(|err| {
            error!(error = %err, "aggregation failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    message: err.to_string(),
                }),
            )
        })?;

    Ok(Json(report))
}

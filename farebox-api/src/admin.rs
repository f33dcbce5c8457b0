use axum::{extract::State, routing::get, Json, Router};

use farebox_ledger::reporting::{AnalyticsReport, StatsSummary};

use crate::error::ApiError;
use crate::state::AppState;

const TOP_ROUTES: usize = 10;
const TREND_DAYS: i64 = 30;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/stats", get(get_stats))
        .route("/api/admin/analytics", get(get_analytics))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsSummary>, ApiError> {
    Ok(Json(state.reporting.stats().await?))
}

async fn get_analytics(State(state): State<AppState>) -> Result<Json<AnalyticsReport>, ApiError> {
    Ok(Json(state.reporting.analytics(TOP_ROUTES, TREND_DAYS).await?))
}

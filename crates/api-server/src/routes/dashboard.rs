//! Dashboard overview endpoint

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use chrono::{Timelike, Utc};
use serde::Deserialize;

use taskdash_core::dashboard::DashboardView;

use super::common::{bad_request, map_core_error, require_session, RouteError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    /// Viewer's local hour, used for the greeting
    #[serde(default)]
    hour: Option<u32>,
}

/// GET /api/dashboard
async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let now = Utc::now();
    let hour = query.hour.unwrap_or_else(|| now.hour());
    if hour > 23 {
        return Err(bad_request("Hour must be between 0 and 23"));
    }

    let view = state
        .board()
        .dashboard(&session.user, now.date_naive(), hour)
        .await
        .map_err(map_core_error)?;
    Ok(Json(view))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(dashboard))
}

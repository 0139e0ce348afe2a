//! Activity log endpoint

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};

use super::common::{forbidden, not_found, require_session, RouteError};
use crate::activity::{ActivityListQuery, ActivityListResponse};
use crate::state::AppState;

/// GET /api/activity
async fn list_activity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ActivityListQuery>,
) -> Result<Json<ActivityListResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    if !session.user.role.can_manage_users() {
        return Err(forbidden("Only admins can view the activity log"));
    }
    let log = state
        .activity()
        .ok_or_else(|| not_found("Activity log is disabled"))?;

    let (items, has_more) = log.list_paginated(&query).await;
    let next_offset = has_more.then(|| query.offset.unwrap_or(0) + items.len());
    Ok(Json(ActivityListResponse {
        items,
        has_more,
        next_offset,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/activity", get(list_activity))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tempfile::TempDir;

    use crate::config::ServerConfig;
    use crate::routes::api_router;
    use crate::routes::common::test_support::{build_state, login, send};
    use crate::state::AppState;

    #[tokio::test]
    async fn admin_sees_recent_activity() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let _pm = login(&app, "pm@company.com").await;
        let admin = login(&app, "admin@company.com").await;

        let (status, payload) = send(&app, "GET", "/api/activity", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let items = payload["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["actorName"], "Admin User");
        assert_eq!(items[0]["action"], "session.login");

        let (_, payload) = send(
            &app,
            "GET",
            "/api/activity?limit=1",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(payload["hasMore"], true);
        assert_eq!(payload["nextOffset"], 1);
    }

    #[tokio::test]
    async fn non_admins_are_forbidden() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "pm@company.com").await;

        let (status, _) = send(&app, "GET", "/api/activity", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn disabled_log_reads_as_missing() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ServerConfig::with_data_dir(temp_dir.path());
        config.activity_log = false;
        let state = AppState::new(config).await.unwrap();
        let app = api_router().with_state(state);
        let token = login(&app, "admin@company.com").await;

        let (status, _) = send(&app, "GET", "/api/activity", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

//! Per-user preferences

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};

use super::common::{map_core_error, require_session, RouteError};
use crate::settings::UserSettings;
use crate::state::AppState;

/// GET /api/settings
async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserSettings>, RouteError> {
    let session = require_session(&state, &headers).await?;
    Ok(Json(state.settings().get(session.user.id).await))
}

/// PUT /api/settings
async fn put_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(settings): Json<UserSettings>,
) -> Result<Json<UserSettings>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let saved = state
        .settings()
        .put(session.user.id, settings)
        .await
        .map_err(map_core_error)?;
    Ok(Json(saved))
}

/// POST /api/settings/theme/toggle
async fn toggle_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserSettings>, RouteError> {
    let session = require_session(&state, &headers).await?;
    Ok(Json(state.settings().toggle_theme(session.user.id).await))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(get_settings).put(put_settings))
        .route("/api/settings/theme/toggle", post(toggle_theme))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::api_router;
    use crate::routes::common::test_support::{build_state, login, send};

    #[tokio::test]
    async fn settings_default_then_save() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "developer@company.com").await;

        let (status, payload) = send(&app, "GET", "/api/settings", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["theme"], "light");
        assert_eq!(payload["sessionTimeout"], 30);

        let (status, payload) = send(
            &app,
            "PUT",
            "/api/settings",
            Some(&token),
            Some(json!({ "language": "fr", "sessionTimeout": 60, "weeklyReports": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["language"], "fr");

        let (_, payload) = send(&app, "GET", "/api/settings", Some(&token), None).await;
        assert_eq!(payload["sessionTimeout"], 60);
        assert_eq!(payload["weeklyReports"], false);

        let (status, _) = send(
            &app,
            "PUT",
            "/api/settings",
            Some(&token),
            Some(json!({ "sessionTimeout": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn theme_toggle_flips() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "pm@company.com").await;

        let (_, payload) = send(
            &app,
            "POST",
            "/api/settings/theme/toggle",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(payload["theme"], "dark");
        let (_, payload) = send(
            &app,
            "POST",
            "/api/settings/theme/toggle",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(payload["theme"], "light");
    }
}

//! Sign-in, the signed-in user and page navigation

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use taskdash_core::access::{navigation, Capabilities, NavItem, Page};
use taskdash_core::user::{ProfileUpdate, User};

use super::common::{map_auth_error, require_session, viewer_of, RouteError};
use crate::activity::actions;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    expires_at: String,
    user: User,
    capabilities: Capabilities,
    navigation: Vec<NavItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MeResponse {
    user: User,
    capabilities: Capabilities,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageResponse {
    requested: String,
    page: Page,
    label: &'static str,
    redirected: bool,
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, RouteError> {
    let outcome = state
        .sessions()
        .login(state.board().users(), &req.email, &req.password)
        .await
        .map_err(map_auth_error)?;

    state
        .record(&outcome.session, actions::SESSION_LOGIN, None, json!({}))
        .await;

    let user = outcome.session.user;
    Ok(Json(LoginResponse {
        token: outcome.token,
        expires_at: outcome.expires_at.to_rfc3339(),
        capabilities: taskdash_core::Viewer::from(&user).capabilities(),
        navigation: navigation(user.role),
        user,
    }))
}

/// POST /api/auth/logout
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, RouteError> {
    let session = require_session(&state, &headers).await?;
    state
        .sessions()
        .logout(session.session_id)
        .await
        .map_err(map_auth_error)?;
    state
        .record(&session, actions::SESSION_LOGOUT, None, json!({}))
        .await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/me
async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    Ok(Json(MeResponse {
        capabilities: viewer_of(&session).capabilities(),
        user: session.user,
    }))
}

/// PATCH /api/me
async fn update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let user = state
        .sessions()
        .update_profile(state.board().users(), session.user.id, &update)
        .await
        .map_err(map_auth_error)?;
    Ok(Json(user))
}

/// GET /api/me/navigation
async fn my_navigation(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<NavItem>>, RouteError> {
    let session = require_session(&state, &headers).await?;
    Ok(Json(navigation(session.user.role)))
}

/// GET /api/pages/{page}
async fn resolve_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(requested): Path<String>,
) -> Result<Json<PageResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let page = Page::resolve(&requested, session.user.role);
    Ok(Json(PageResponse {
        redirected: page.as_str() != requested.trim().to_lowercase(),
        requested,
        label: page.label(),
        page,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/me", get(me).patch(update_me))
        .route("/api/me/navigation", get(my_navigation))
        .route("/api/pages/{page}", get(resolve_page))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::api_router;
    use crate::routes::common::test_support::{build_state, login, send};

    #[tokio::test]
    async fn login_returns_token_and_navigation() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);

        let (status, payload) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "admin@company.com", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(payload["token"].is_string());
        assert_eq!(payload["user"]["role"], "admin");
        assert!(payload["user"].get("passwordHash").is_none());
        assert_eq!(payload["capabilities"]["manageUsers"], true);

        let pages: Vec<&str> = payload["navigation"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap())
            .collect();
        assert_eq!(pages, vec!["dashboard", "projects", "tasks", "users", "settings"]);
    }

    #[tokio::test]
    async fn login_rejects_bad_password_and_missing_token() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);

        let (status, _) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "admin@company.com", "password": "wrong-password" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, payload) = send(&app, "GET", "/api/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(payload["error"].is_string());
    }

    #[tokio::test]
    async fn logout_ends_session() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "pm@company.com").await;

        let (status, payload) = send(&app, "GET", "/api/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["user"]["email"], "pm@company.com");

        let (status, _) = send(&app, "POST", "/api/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", "/api/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn profile_update_changes_cached_record() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "developer@company.com").await;

        let (status, payload) = send(
            &app,
            "PATCH",
            "/api/me",
            Some(&token),
            Some(json!({ "name": "Senior Developer" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["name"], "Senior Developer");

        let (_, payload) = send(&app, "GET", "/api/me", Some(&token), None).await;
        assert_eq!(payload["user"]["name"], "Senior Developer");

        let (status, _) = send(
            &app,
            "PATCH",
            "/api/me",
            Some(&token),
            Some(json!({ "name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn closed_pages_resolve_to_dashboard() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "developer@company.com").await;

        let (status, payload) = send(&app, "GET", "/api/pages/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["page"], "dashboard");
        assert_eq!(payload["redirected"], true);

        let (_, payload) = send(&app, "GET", "/api/pages/tasks", Some(&token), None).await;
        assert_eq!(payload["page"], "tasks");
        assert_eq!(payload["redirected"], false);

        let (_, payload) = send(&app, "GET", "/api/me/navigation", Some(&token), None).await;
        assert_eq!(payload.as_array().unwrap().len(), 4);
    }
}

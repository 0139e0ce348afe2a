//! User management and team endpoints

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use taskdash_core::dashboard::last_active_text;
use taskdash_core::filter::UserFilter;
use taskdash_core::user::{CreateUserRequest, User, UserStats};

use super::common::{map_auth_error, map_core_error, require_session, viewer_of, RouteError};
use crate::activity::actions;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: User,
    pub role_label: String,
    pub last_active_text: String,
}

impl UserResponse {
    fn new(user: User, now: DateTime<Utc>) -> Self {
        Self {
            role_label: user.role.label(),
            last_active_text: last_active_text(now, user.last_active),
            user,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserListResponse {
    items: Vec<UserResponse>,
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_hint: Option<&'static str>,
    stats: UserStats,
}

/// GET /api/users
async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filter): Query<UserFilter>,
) -> Result<Json<UserListResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let visible = state
        .board()
        .list_users(&viewer_of(&session), &UserFilter::default())
        .await
        .map_err(map_core_error)?;
    let stats = UserStats::from_users(&visible);

    let now = Utc::now();
    let items: Vec<UserResponse> = filter
        .apply(visible)
        .into_iter()
        .map(|user| UserResponse::new(user, now))
        .collect();
    let total = items.len();
    Ok(Json(UserListResponse {
        empty_hint: (total == 0).then(|| filter.empty_hint()),
        items,
        total,
        stats,
    }))
}

/// POST /api/users
async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), RouteError> {
    let session = require_session(&state, &headers).await?;
    let user = state
        .board()
        .create_user(&viewer_of(&session), req)
        .await
        .map_err(map_core_error)?;

    state
        .record(
            &session,
            actions::USER_CREATED,
            Some(user.id),
            json!({ "email": user.email, "role": user.role.as_str() }),
        )
        .await;
    Ok((StatusCode::CREATED, Json(UserResponse::new(user, Utc::now()))))
}

/// POST /api/users/{id}/toggle-status
async fn toggle_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let user = state
        .board()
        .toggle_user_status(&viewer_of(&session), id)
        .await
        .map_err(map_core_error)?;

    if user.is_active {
        state
            .sessions()
            .refresh_user(&user)
            .await
            .map_err(map_auth_error)?;
    } else {
        state
            .sessions()
            .revoke_user(user.id)
            .await
            .map_err(map_auth_error)?;
    }

    state
        .record(
            &session,
            actions::USER_STATUS_TOGGLED,
            Some(id),
            json!({ "active": user.is_active }),
        )
        .await;
    Ok(Json(UserResponse::new(user, Utc::now())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}/toggle-status", post(toggle_status))
}

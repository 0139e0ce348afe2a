//! Helpers shared by the route handlers

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

use taskdash_core::{Error, Viewer};

use crate::auth::{AuthError, AuthSession};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

/// A list page: the matching items plus a hint to show when there are none
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_hint: Option<&'static str>,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, hint: &'static str) -> Self {
        let total = items.len();
        Self {
            empty_hint: (total == 0).then_some(hint),
            items,
            total,
        }
    }
}

pub fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub fn unauthorized(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::UNAUTHORIZED, error)
}

pub fn forbidden(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::FORBIDDEN, error)
}

pub fn bad_request(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::BAD_REQUEST, error)
}

pub fn not_found(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::NOT_FOUND, error)
}

pub fn internal_error(error: impl std::fmt::Display) -> RouteError {
    route_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

pub fn map_core_error(err: Error) -> RouteError {
    let status = match &err {
        Error::UserNotFound(_)
        | Error::ProjectNotFound(_)
        | Error::TaskNotFound(_)
        | Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        Error::Forbidden(_) => StatusCode::FORBIDDEN,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::Io(_) | Error::Serialization(_) => {
            tracing::error!("Internal error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    route_error(status, err.to_string())
}

pub fn map_auth_error(err: AuthError) -> RouteError {
    match err {
        AuthError::Unauthorized(message) => unauthorized(message),
        AuthError::Storage(message) => internal_error(message),
        AuthError::Core(err) => map_core_error(err),
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, RouteError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Authorization must be Bearer token"))
}

/// Resolve the signed-in viewer from the request's bearer token
pub async fn require_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthSession, RouteError> {
    let token = bearer_token(headers)?;
    state
        .sessions()
        .authorize_bearer(token)
        .await
        .map_err(map_auth_error)
}

pub fn viewer_of(session: &AuthSession) -> Viewer {
    Viewer::from(&session.user)
}

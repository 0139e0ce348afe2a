//! Route handlers

pub mod activity;
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod health;
pub mod project;
pub mod settings;
pub mod task;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Every REST route, before middleware layers
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(project::router())
        .merge(task::router())
        .merge(users::router())
        .merge(settings::router())
        .merge(activity::router())
}

//! Project API endpoints

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use taskdash_core::filter::ProjectFilter;
use taskdash_core::project::{ProgressBand, Project, ProjectDraft, ProjectPatch};

use super::common::{map_core_error, require_session, viewer_of, ListResponse, RouteError};
use crate::activity::actions;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    pub status_label: String,
    pub progress_band: ProgressBand,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            status_label: project.status.label(),
            progress_band: project.progress_band(),
            project,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteProjectResponse {
    id: Uuid,
    removed_tasks: usize,
}

/// GET /api/projects
async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filter): Query<ProjectFilter>,
) -> Result<Json<ListResponse<ProjectResponse>>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let projects = state
        .board()
        .list_projects(&viewer_of(&session), &filter)
        .await;
    Ok(Json(ListResponse::new(
        projects.into_iter().map(ProjectResponse::from).collect(),
        filter.empty_hint(),
    )))
}

/// POST /api/projects
async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<ProjectDraft>,
) -> Result<(StatusCode, Json<ProjectResponse>), RouteError> {
    let session = require_session(&state, &headers).await?;
    let created = state
        .board()
        .create_project(&viewer_of(&session), draft, Utc::now().date_naive())
        .await
        .map_err(map_core_error)?;

    state
        .record(
            &session,
            actions::PROJECT_CREATED,
            Some(created.id),
            json!({ "title": created.title }),
        )
        .await;
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(created))))
}

/// GET /api/projects/{id}
async fn get_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let project = state
        .board()
        .get_project(&viewer_of(&session), id)
        .await
        .map_err(map_core_error)?;
    Ok(Json(ProjectResponse::from(project)))
}

/// PUT /api/projects/{id}
async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<ProjectResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let updated = state
        .board()
        .update_project(&viewer_of(&session), id, &patch)
        .await
        .map_err(map_core_error)?;

    state
        .record(
            &session,
            actions::PROJECT_UPDATED,
            Some(id),
            json!({ "status": updated.status.as_str(), "progress": updated.progress }),
        )
        .await;
    Ok(Json(ProjectResponse::from(updated)))
}

/// DELETE /api/projects/{id}
async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteProjectResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let (project, removed_tasks) = state
        .board()
        .delete_project(&viewer_of(&session), id)
        .await
        .map_err(map_core_error)?;

    state
        .record(
            &session,
            actions::PROJECT_DELETED,
            Some(id),
            json!({ "title": project.title, "removedTasks": removed_tasks }),
        )
        .await;
    Ok(Json(DeleteProjectResponse { id, removed_tasks }))
}

/// POST /api/projects/{id}/members/{userId}
async fn toggle_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ProjectResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let project = state
        .board()
        .toggle_project_member(&viewer_of(&session), id, user_id)
        .await
        .map_err(map_core_error)?;

    state
        .record(
            &session,
            actions::PROJECT_MEMBER_TOGGLED,
            Some(id),
            json!({ "userId": user_id, "member": project.has_member(user_id) }),
        )
        .await;
    Ok(Json(ProjectResponse::from(project)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/projects/{id}/members/{userId}", post(toggle_member))
}

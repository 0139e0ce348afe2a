//! Task API endpoints

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use taskdash_core::filter::TaskFilter;
use taskdash_core::task::{Task, TaskDraft, TaskPatch};

use super::common::{map_core_error, require_session, viewer_of, ListResponse, RouteError};
use crate::activity::actions;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[serde(flatten)]
    pub task: Task,
    pub status_label: String,
    pub overdue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_progress: Option<f64>,
}

impl TaskResponse {
    fn new(task: Task, today: NaiveDate) -> Self {
        Self {
            status_label: task.status.label(),
            overdue: task.is_overdue(today),
            hours_progress: task.hours_progress(),
            task,
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET /api/tasks
async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<ListResponse<TaskResponse>>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let tasks = state
        .board()
        .list_tasks(&viewer_of(&session), &filter)
        .await
        .map_err(map_core_error)?;

    let today = today();
    Ok(Json(ListResponse::new(
        tasks
            .into_iter()
            .map(|task| TaskResponse::new(task, today))
            .collect(),
        filter.empty_hint(),
    )))
}

/// POST /api/tasks
async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<TaskResponse>), RouteError> {
    let session = require_session(&state, &headers).await?;
    let created = state
        .board()
        .create_task(&viewer_of(&session), draft)
        .await
        .map_err(map_core_error)?;

    state
        .record(
            &session,
            actions::TASK_CREATED,
            Some(created.id),
            json!({ "title": created.title, "projectId": created.project_id }),
        )
        .await;
    Ok((StatusCode::CREATED, Json(TaskResponse::new(created, today()))))
}

/// GET /api/tasks/{id}
async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let (task, _) = state
        .board()
        .get_task(&viewer_of(&session), id)
        .await
        .map_err(map_core_error)?;
    Ok(Json(TaskResponse::new(task, today())))
}

/// PUT /api/tasks/{id}
async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<TaskResponse>, RouteError> {
    let session = require_session(&state, &headers).await?;
    let updated = state
        .board()
        .update_task(&viewer_of(&session), id, &patch)
        .await
        .map_err(map_core_error)?;

    state
        .record(
            &session,
            actions::TASK_UPDATED,
            Some(id),
            json!({ "status": updated.status.as_str() }),
        )
        .await;
    Ok(Json(TaskResponse::new(updated, today())))
}

/// DELETE /api/tasks/{id}
async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, RouteError> {
    let session = require_session(&state, &headers).await?;
    let task = state
        .board()
        .delete_task(&viewer_of(&session), id)
        .await
        .map_err(map_core_error)?;

    state
        .record(
            &session,
            actions::TASK_DELETED,
            Some(id),
            json!({ "title": task.title }),
        )
        .await;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use taskdash_core::seed::ids;

    use crate::routes::api_router;
    use crate::routes::common::test_support::{build_state, login, send};

    #[tokio::test]
    async fn list_filters_by_status_and_priority() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "developer@company.com").await;

        let (status, payload) = send(&app, "GET", "/api/tasks", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["total"], 3);

        let (_, payload) = send(
            &app,
            "GET",
            "/api/tasks?status=completed",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(payload["total"], 1);
        assert_eq!(payload["items"][0]["title"], "API Integration");
        assert_eq!(payload["items"][0]["overdue"], false);
        assert_eq!(payload["items"][0]["statusLabel"], "completed");
        assert_eq!(payload["items"][0]["hoursProgress"], 100.0);

        let (_, payload) = send(
            &app,
            "GET",
            "/api/tasks?priority=high&search=auth",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(payload["total"], 1);
        assert_eq!(payload["items"][0]["title"], "User Authentication Setup");
    }

    #[tokio::test]
    async fn manager_creates_task_with_defaults() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "pm@company.com").await;

        let (status, payload) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({
                "title": "Push notifications",
                "description": "Wire up the push provider",
                "projectId": ids::MOBILE_APP,
                "assigneeId": ids::DESIGNER,
                "dueDate": "2024-04-01",
                "estimatedHours": 12
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payload["status"], "todo");
        assert_eq!(payload["priority"], "medium");
        assert_eq!(payload["hoursProgress"], 0.0);

        let (status, _) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({
                "title": "Orphan",
                "description": "No such project",
                "projectId": uuid::Uuid::new_v4(),
                "assigneeId": ids::DESIGNER,
                "dueDate": "2024-04-01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn assignee_moves_own_task_but_cannot_delete() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "developer@company.com").await;
        let uri = format!("/api/tasks/{}", ids::AUTH_TASK);

        let (status, payload) = send(
            &app,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "status": "in-progress", "actualHours": 4 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "in-progress");
        assert_eq!(payload["hoursProgress"], 25.0);

        let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn hidden_tasks_read_as_missing() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "designer@company.com").await;

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/tasks/{}", ids::API_TASK),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn manager_deletes_task() {
        let (state, _tmp) = build_state().await;
        let app = api_router().with_state(state);
        let token = login(&app, "pm@company.com").await;
        let uri = format!("/api/tasks/{}", ids::API_TASK);

        let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

//! Task API endpoints
//!
//! RESTful API for task CRUD operations and derived queries.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tm_core::task::{Task, TaskStatistics, TaskStatus};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<String>,
    pub created_date: String,
    pub updated_date: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date.map(|t| t.to_rfc3339()),
            created_date: task.created_at.to_rfc3339(),
            updated_date: task.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: tm_core::Error) -> ApiError {
    let status = match &err {
        tm_core::Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        tm_core::Error::TaskNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn not_found(id: Uuid) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Task {} not found", id),
        }),
    )
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/tasks - List all tasks, optionally filtered by status or search term
async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = match query.status {
        Some(status) => state
            .task_service()
            .tasks_by_status(status)
            .await
            .map_err(error_response)?,
        None => state
            .task_service()
            .search_tasks(query.search.as_deref())
            .await
            .map_err(error_response)?,
    };

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// POST /api/tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let Some(title) = req.title else {
        return Err(bad_request("Title is required"));
    };

    let created = state
        .task_service()
        .create_task(&title, req.description, req.status, req.due_date)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

/// GET /api/tasks/:id - Get a single task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .task_service()
        .get_task(id)
        .await
        .map_err(error_response)?;

    match task {
        Some(t) => Ok(Json(TaskResponse::from(t))),
        None => Err(not_found(id)),
    }
}

/// PUT /api/tasks/:id - Update a task's fields
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Some(title) = req.title else {
        return Err(bad_request("Title is required"));
    };

    let updated = state
        .task_service()
        .update_task(id, &title, req.description, req.status, req.due_date)
        .await
        .map_err(error_response)?;

    match updated {
        Some(t) => Ok(Json(TaskResponse::from(t))),
        None => Err(not_found(id)),
    }
}

/// PUT /api/tasks/:id/status - Update only a task's status
async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Some(status) = req.status else {
        return Err(bad_request("Status is required"));
    };

    let updated = state
        .task_service()
        .update_status(id, status)
        .await
        .map_err(error_response)?;

    match updated {
        Some(t) => Ok(Json(TaskResponse::from(t))),
        None => Err(not_found(id)),
    }
}

/// DELETE /api/tasks/:id - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .task_service()
        .delete_task(id)
        .await
        .map_err(error_response)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/tasks/overdue - List tasks past their due date and still open
async fn overdue_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = state
        .task_service()
        .overdue_tasks()
        .await
        .map_err(error_response)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// GET /api/tasks/statistics - Aggregate task counts
async fn task_statistics(
    State(state): State<AppState>,
) -> Result<Json<TaskStatistics>, ApiError> {
    let stats = state
        .task_service()
        .statistics()
        .await
        .map_err(error_response)?;

    Ok(Json(stats))
}

/// GET /api/tasks/statuses - All available task statuses
async fn task_statuses() -> Json<Vec<TaskStatus>> {
    Json(TaskStatus::ALL.to_vec())
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/overdue", get(overdue_tasks))
        .route("/api/tasks/statistics", get(task_statistics))
        .route("/api/tasks/statuses", get(task_statuses))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/status", put(update_task_status))
}

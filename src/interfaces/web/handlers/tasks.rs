use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::super::AppState;
use super::super::error::ApiError;
use crate::core::projection::{self, TaskView};
use crate::core::store::{Task, TaskCreate, TaskQuadrantUpdate, TaskUpdate};

async fn ensure_staff(state: &AppState, owner_id: i64) -> Result<(), ApiError> {
    if state.store.get_staff(owner_id).await.is_err() {
        return Err(ApiError::bad_request(format!(
            "owner_id {owner_id} does not exist"
        )));
    }
    Ok(())
}

async fn view(state: &AppState, task: Task) -> TaskView {
    projection::serialize_task(task, &state.store.staff_by_id().await)
}

pub async fn list_tasks(State(state): State<AppState>) -> Json<serde_json::Value> {
    let staff = state.store.staff_by_id().await;
    let tasks = projection::project_tasks(state.store.list_tasks().await, &staff);
    Json(serde_json::json!({ "tasks": tasks }))
}

pub async fn get_task(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<TaskView>, ApiError> {
    let task = state.store.get_task(id).await?;
    Ok(Json(view(&state, task).await))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskCreate>,
) -> Result<(StatusCode, Json<TaskView>), ApiError> {
    payload.validate()?;
    ensure_staff(&state, payload.owner_id).await?;
    let task = state.store.create_task(payload).await?;
    Ok((StatusCode::CREATED, Json(view(&state, task).await)))
}

pub async fn update_task(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(patch): Json<TaskUpdate>,
) -> Result<Json<TaskView>, ApiError> {
    patch.validate()?;
    state.store.get_task(id).await?;
    if let Some(owner_id) = patch.owner_id.as_option() {
        ensure_staff(&state, *owner_id).await?;
    }
    let task = state.store.update_task(id, patch).await?;
    Ok(Json(view(&state, task).await))
}

pub async fn move_task(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<TaskQuadrantUpdate>,
) -> Result<Json<TaskView>, ApiError> {
    let task = state.store.move_task(id, payload.quadrant).await?;
    Ok(Json(view(&state, task).await))
}

pub async fn delete_task(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

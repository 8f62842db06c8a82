use axum::{extract::State, http::StatusCode, Json};
use tracker_domain::entities::{BaseMaintenanceTask, MaintenanceTask};
use tracker_errors::TrackerError;

use crate::{
    error::ApiResult,
    extractors::{EntityId, JsonBody},
    routes::AppState,
};

/// 获取维护任务列表
pub async fn list_maintenance_tasks(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MaintenanceTask>>> {
    let tasks = state.task_repo.list().await?;
    Ok(Json(tasks))
}

/// 获取单个维护任务
pub async fn get_maintenance_task(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Json<MaintenanceTask>> {
    let task = state
        .task_repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| TrackerError::maintenance_task_not_found(id))?;
    Ok(Json(task))
}

pub async fn create_maintenance_task(
    State(state): State<AppState>,
    JsonBody(task): JsonBody<BaseMaintenanceTask>,
) -> ApiResult<Json<MaintenanceTask>> {
    let created = state.task_repo.create(&task).await?;
    Ok(Json(created))
}

pub async fn delete_maintenance_task(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<StatusCode> {
    state.task_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;
use tracker_domain::entities::{BaseRobot, Robot};
use tracker_errors::TrackerError;

use crate::{
    error::ApiResult,
    extractors::{EntityId, JsonBody},
    routes::AppState,
};

/// 获取机器人列表
pub async fn list_robots(State(state): State<AppState>) -> ApiResult<Json<Vec<Robot>>> {
    let robots = state.robot_repo.list().await?;
    Ok(Json(robots))
}

/// 获取单个机器人
pub async fn get_robot(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Json<Robot>> {
    let robot = state
        .robot_repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| TrackerError::robot_not_found(id))?;
    Ok(Json(robot))
}

/// 登记机器人，序列号重复时返回 409
pub async fn create_robot(
    State(state): State<AppState>,
    JsonBody(robot): JsonBody<BaseRobot>,
) -> ApiResult<Json<Robot>> {
    let created = state.robot_repo.create(&robot).await?;
    info!("机器人已登记: ID {}, 序列号: {}", created.id, created.serial_number);
    Ok(Json(created))
}

/// 删除机器人，记录不存在时同样返回 204
pub async fn delete_robot(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<StatusCode> {
    state.robot_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

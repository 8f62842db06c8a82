use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use tracker_domain::{
    entities::{BaseJob, Job, JobFilter},
    notification::JobNotification,
};
use tracker_errors::TrackerError;

use crate::{
    error::ApiResult,
    extractors::{EntityId, JsonBody, QueryParams},
    routes::AppState,
};

/// 工单查询参数
#[derive(Debug, Default, Deserialize)]
pub struct JobQueryParams {
    pub robot_id: Option<i64>,
    pub task_id: Option<i64>,
}

impl From<JobQueryParams> for JobFilter {
    fn from(params: JobQueryParams) -> Self {
        JobFilter {
            robot_id: params.robot_id,
            task_id: params.task_id,
        }
    }
}

/// 工单状态更新参数
#[derive(Debug, Deserialize)]
pub struct StatusUpdateParams {
    pub status: String,
}

/// 获取工单列表，可按机器人和任务过滤
pub async fn list_jobs(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<JobQueryParams>,
) -> ApiResult<Json<Vec<Job>>> {
    let filter = JobFilter::from(params);
    let jobs = state.job_repo.list(&filter).await?;
    Ok(Json(jobs))
}

/// 获取单个工单
pub async fn get_job(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<Job>> {
    let job = state
        .job_repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| TrackerError::job_not_found(id))?;
    Ok(Json(job))
}

/// 创建工单，引用的机器人和维护任务必须存在
pub async fn create_job(
    State(state): State<AppState>,
    JsonBody(job): JsonBody<BaseJob>,
) -> ApiResult<Json<Job>> {
    state
        .robot_repo
        .get_by_id(job.robot_id)
        .await?
        .ok_or_else(|| TrackerError::robot_not_found(job.robot_id))?;
    state
        .task_repo
        .get_by_id(job.task_id)
        .await?
        .ok_or_else(|| TrackerError::maintenance_task_not_found(job.task_id))?;

    let created = state.job_repo.create(&job).await?;
    info!(
        "工单已创建: ID {}, 机器人 {}, 任务 {}, 截止日期 {}",
        created.id, created.robot_id, created.task_id, created.due_date
    );
    Ok(Json(created))
}

pub async fn delete_job(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<StatusCode> {
    state.job_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 覆盖工单状态，不校验状态取值
pub async fn update_job_status(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    QueryParams(params): QueryParams<StatusUpdateParams>,
) -> ApiResult<Json<Job>> {
    let job = state
        .job_repo
        .update_status(id, &params.status)
        .await?
        .ok_or_else(|| TrackerError::job_not_found(id))?;
    info!("工单状态已更新: ID {}, 状态: {}", job.id, job.status);
    Ok(Json(job))
}

/// 把工单摘要推送到外部通知地址
pub async fn notify_job(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<StatusCode> {
    let job = state
        .job_repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| TrackerError::job_not_found(id))?;
    let robot = state
        .robot_repo
        .get_by_id(job.robot_id)
        .await?
        .ok_or_else(|| TrackerError::robot_not_found(job.robot_id))?;
    let task = state
        .task_repo
        .get_by_id(job.task_id)
        .await?
        .ok_or_else(|| TrackerError::maintenance_task_not_found(job.task_id))?;

    let notification = JobNotification::new(&job, &robot, &task);
    let receipt = state.notifier.notify(&notification).await?;
    info!(
        "收到工单 {} 的通知响应: 状态 {}, 响应体: {}",
        id, receipt.status, receipt.body
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_into_filter() {
        let filter = JobFilter::from(JobQueryParams {
            robot_id: Some(1),
            task_id: None,
        });
        assert_eq!(filter, JobFilter::by_robot(1));

        let filter = JobFilter::from(JobQueryParams::default());
        assert_eq!(filter, JobFilter::default());
    }
}

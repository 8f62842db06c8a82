use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tracker_domain::{
    notification::JobNotifier,
    repositories::{JobRepository, MaintenanceTaskRepository, RobotRepository},
};
use tracker_infrastructure::Database;

use crate::handlers::{
    health::health_check,
    jobs::{create_job, delete_job, get_job, list_jobs, notify_job, update_job_status},
    maintenance_tasks::{
        create_maintenance_task, delete_maintenance_task, get_maintenance_task,
        list_maintenance_tasks,
    },
    robots::{create_robot, delete_robot, get_robot, list_robots},
};

/// API应用状态，启动时构造一次并注入所有处理器
#[derive(Clone)]
pub struct AppState {
    pub robot_repo: Arc<dyn RobotRepository>,
    pub task_repo: Arc<dyn MaintenanceTaskRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub notifier: Arc<dyn JobNotifier>,
    pub database: Database,
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 机器人
        .route("/robots", get(list_robots).post(create_robot))
        .route("/robots/{id}", get(get_robot).delete(delete_robot))
        // 标准维护任务
        .route(
            "/maintenance-tasks",
            get(list_maintenance_tasks).post(create_maintenance_task),
        )
        .route(
            "/maintenance-tasks/{id}",
            get(get_maintenance_task).delete(delete_maintenance_task),
        )
        // 维护工单
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/{id}", get(get_job).delete(delete_job))
        .route("/jobs/{id}/status", put(update_job_status))
        .route("/jobs/{id}/notify", post(notify_job))
        .with_state(state)
}

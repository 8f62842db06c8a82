use crate::entities::{Job, MaintenanceTask, Robot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracker_errors::TrackerResult;

/// 发送给外部系统的工单摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobNotification {
    pub job_id: i64,
    pub robot_id: i64,
    pub task_id: i64,
    pub robot_name: String,
    pub task_name: String,
}

impl JobNotification {
    pub fn new(job: &Job, robot: &Robot, task: &MaintenanceTask) -> Self {
        Self {
            job_id: job.id,
            robot_id: robot.id,
            task_id: task.id,
            robot_name: robot.name.clone(),
            task_name: task.name.clone(),
        }
    }
}

/// 外部通知发送结果
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationReceipt {
    pub status: u16,
    pub body: serde_json::Value,
}

/// 工单通知端口，单次发送，不重试
#[async_trait]
pub trait JobNotifier: Send + Sync {
    async fn notify(&self, notification: &JobNotification) -> TrackerResult<NotificationReceipt>;
}

//! 领域仓储抽象
//!
//! 定义数据访问的抽象接口，API层只依赖这些trait，具体实现由基础设施层注入

use crate::entities::{
    BaseJob, BaseMaintenanceTask, BaseRobot, Job, JobFilter, MaintenanceTask, Robot,
};
use async_trait::async_trait;
use tracker_errors::TrackerResult;

/// 机器人仓储抽象
#[async_trait]
pub trait RobotRepository: Send + Sync {
    /// 序列号重复时返回 `TrackerError::DuplicateSerialNumber`
    async fn create(&self, robot: &BaseRobot) -> TrackerResult<Robot>;
    async fn get_by_id(&self, id: i64) -> TrackerResult<Option<Robot>>;
    async fn get_by_serial_number(&self, serial_number: &str) -> TrackerResult<Option<Robot>>;
    async fn list(&self) -> TrackerResult<Vec<Robot>>;
    /// 返回是否有行被删除
    async fn delete(&self, id: i64) -> TrackerResult<bool>;
}

/// 标准维护任务仓储抽象
#[async_trait]
pub trait MaintenanceTaskRepository: Send + Sync {
    async fn create(&self, task: &BaseMaintenanceTask) -> TrackerResult<MaintenanceTask>;
    async fn get_by_id(&self, id: i64) -> TrackerResult<Option<MaintenanceTask>>;
    async fn list(&self) -> TrackerResult<Vec<MaintenanceTask>>;
    async fn delete(&self, id: i64) -> TrackerResult<bool>;
}

/// 维护工单仓储抽象
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 不校验引用的机器人和任务是否存在，调用方负责
    async fn create(&self, job: &BaseJob) -> TrackerResult<Job>;
    async fn get_by_id(&self, id: i64) -> TrackerResult<Option<Job>>;
    async fn list(&self, filter: &JobFilter) -> TrackerResult<Vec<Job>>;
    async fn delete(&self, id: i64) -> TrackerResult<bool>;
    /// 无条件覆盖状态，工单不存在时返回 `None`
    async fn update_status(&self, id: i64, status: &str) -> TrackerResult<Option<Job>>;
}

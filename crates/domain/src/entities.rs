use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 新建工单的初始状态
pub const DEFAULT_JOB_STATUS: &str = "New";

/// 创建机器人时客户端提交的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRobot {
    pub name: String,
    pub model: String,
    pub serial_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub serial_number: String, // 全局唯一
}

impl Robot {
    pub fn entity_description(&self) -> String {
        format!("机器人 '{}' (ID: {}, 序列号: {})", self.name, self.id, self.serial_number)
    }
}

/// 创建标准维护任务时客户端提交的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseMaintenanceTask {
    pub name: String,
    pub description: String,
    pub frequency: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub frequency: i64, // 维护周期，单位由使用方约定
}

impl MaintenanceTask {
    pub fn entity_description(&self) -> String {
        format!("维护任务 '{}' (ID: {})", self.name, self.id)
    }
}

/// 创建工单时客户端提交的字段，状态由存储层默认为 `New`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseJob {
    pub robot_id: i64,
    pub task_id: i64,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub robot_id: i64,
    pub task_id: i64,
    pub due_date: NaiveDate,
    pub status: String, // 自由文本，不做状态机校验
}

impl Job {
    pub fn entity_description(&self) -> String {
        format!(
            "工单 (ID: {}, 机器人ID: {}, 任务ID: {})",
            self.id, self.robot_id, self.task_id
        )
    }
}

/// 工单列表过滤条件，同时指定时按 AND 组合
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub robot_id: Option<i64>,
    pub task_id: Option<i64>,
}

impl JobFilter {
    pub fn by_robot(robot_id: i64) -> Self {
        Self {
            robot_id: Some(robot_id),
            task_id: None,
        }
    }

    pub fn by_task(task_id: i64) -> Self {
        Self {
            robot_id: None,
            task_id: Some(task_id),
        }
    }
}

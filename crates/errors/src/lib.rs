use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("数据库操作错误: {0}")]
    DatabaseOperation(String),
    #[error("机器人未找到: {id}")]
    RobotNotFound { id: i64 },
    #[error("维护任务未找到: {id}")]
    MaintenanceTaskNotFound { id: i64 },
    #[error("工单未找到: {id}")]
    JobNotFound { id: i64 },
    #[error("序列号已存在: {serial_number}")]
    DuplicateSerialNumber { serial_number: String },
    #[error("数据约束冲突: {0}")]
    ConstraintViolation(String),
    #[error("通知发送失败: {0}")]
    Notification(String),
    #[error("序列化错误: {0}")]
    Serialization(String),
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("数据验证失败: {0}")]
    ValidationError(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

impl TrackerError {
    pub fn database_error<S: Into<String>>(msg: S) -> Self {
        Self::DatabaseOperation(msg.into())
    }
    pub fn robot_not_found(id: i64) -> Self {
        Self::RobotNotFound { id }
    }
    pub fn maintenance_task_not_found(id: i64) -> Self {
        Self::MaintenanceTaskNotFound { id }
    }
    pub fn job_not_found(id: i64) -> Self {
        Self::JobNotFound { id }
    }
    pub fn duplicate_serial_number<S: Into<String>>(serial_number: S) -> Self {
        Self::DuplicateSerialNumber {
            serial_number: serial_number.into(),
        }
    }
    pub fn notification_error<S: Into<String>>(msg: S) -> Self {
        Self::Notification(msg.into())
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn validation_error<S: Into<String>>(msg: S) -> Self {
        Self::ValidationError(msg.into())
    }
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TrackerError::RobotNotFound { .. }
                | TrackerError::MaintenanceTaskNotFound { .. }
                | TrackerError::JobNotFound { .. }
        )
    }
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            TrackerError::DuplicateSerialNumber { .. } | TrackerError::ConstraintViolation(_)
        )
    }
    pub fn user_message(&self) -> &str {
        match self {
            TrackerError::RobotNotFound { .. } => "请求的机器人不存在",
            TrackerError::MaintenanceTaskNotFound { .. } => "请求的维护任务不存在",
            TrackerError::JobNotFound { .. } => "请求的维护工单不存在",
            TrackerError::DuplicateSerialNumber { .. } => "相同序列号的机器人已存在",
            TrackerError::ConstraintViolation(_) => "操作违反了数据约束",
            TrackerError::Notification(_) => "外部通知服务不可用",
            TrackerError::ValidationError(_) => "输入数据验证失败",
            _ => "系统繁忙，请稍后重试",
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for TrackerError {
    fn from(err: anyhow::Error) -> Self {
        TrackerError::Internal(err.to_string())
    }
}

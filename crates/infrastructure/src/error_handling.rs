//! Repository error handling with operation context
//!
//! Every repository call builds an [`OperationContext`] describing the entity and the
//! operation, so store failures can be logged and translated into domain errors with
//! the details a caller needs.

use chrono::{DateTime, Utc};
use sqlx::Error as SqlxError;
use std::fmt;
use tracing::{error, info, instrument};
use tracker_errors::TrackerError;

/// Operation context for repository operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOperation {
    Create,
    Read,
    Update,
    Delete,
    Query,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryOperation::Create => write!(f, "创建"),
            RepositoryOperation::Read => write!(f, "查询"),
            RepositoryOperation::Update => write!(f, "更新"),
            RepositoryOperation::Delete => write!(f, "删除"),
            RepositoryOperation::Query => write!(f, "查询"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Robot,
    MaintenanceTask,
    Job,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Robot => write!(f, "机器人"),
            EntityKind::MaintenanceTask => write!(f, "维护任务"),
            EntityKind::Job => write!(f, "工单"),
        }
    }
}

/// Context information for a single repository call
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub operation: RepositoryOperation,
    pub entity: EntityKind,
    pub entity_id: Option<i64>,
    pub serial_number: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub additional_info: Option<String>,
}

impl OperationContext {
    pub fn new(operation: RepositoryOperation, entity: EntityKind) -> Self {
        Self {
            operation,
            entity,
            entity_id: None,
            serial_number: None,
            timestamp: Utc::now(),
            additional_info: None,
        }
    }

    pub fn with_entity_id(mut self, entity_id: i64) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn with_serial_number(mut self, serial_number: String) -> Self {
        self.serial_number = Some(serial_number);
        self
    }

    pub fn with_additional_info(mut self, info: String) -> Self {
        self.additional_info = Some(info);
        self
    }

    pub fn entity_description(&self) -> String {
        match (&self.entity_id, &self.serial_number) {
            (Some(id), Some(serial)) => format!("{} (ID: {}, 序列号: {})", self.entity, id, serial),
            (Some(id), None) => format!("{} (ID: {})", self.entity, id),
            (None, Some(serial)) => format!("{} (序列号: {})", self.entity, serial),
            (None, None) => self.entity.to_string(),
        }
    }
}

/// Error helpers shared by the SQLite repositories
pub struct RepositoryErrorHelpers;

impl RepositoryErrorHelpers {
    /// Translate a store error into a domain error, logging it with the context
    #[instrument(skip_all, fields(
        operation = %context.operation,
        entity = %context.entity,
        entity_id = ?context.entity_id,
        timestamp = %context.timestamp,
    ))]
    pub fn database_error(context: OperationContext, error: SqlxError) -> TrackerError {
        let entity_desc = context.entity_description();
        let operation_desc = context.operation.to_string();

        let error_msg = match &error {
            SqlxError::Database(db_error) => {
                if is_unique_violation(db_error.as_ref()) && context.entity == EntityKind::Robot {
                    let serial_number = context
                        .serial_number
                        .clone()
                        .unwrap_or_else(|| "未知".to_string());
                    error!(
                        error = %error,
                        "{}{}时发生唯一约束冲突: 序列号 '{}' 已存在",
                        operation_desc, entity_desc, serial_number
                    );
                    return TrackerError::duplicate_serial_number(serial_number);
                }

                if db_error.is_foreign_key_violation() {
                    let msg = format!("{}{}时发生外键约束冲突: {}", operation_desc, entity_desc, db_error);
                    error!(error = %error, "{}", msg);
                    return TrackerError::ConstraintViolation(msg);
                }

                format!("{}{}时发生数据库错误: {}", operation_desc, entity_desc, db_error)
            }
            SqlxError::PoolClosed => {
                format!("{}{}时数据库连接池已关闭", operation_desc, entity_desc)
            }
            SqlxError::PoolTimedOut => {
                format!("{}{}时数据库连接池超时", operation_desc, entity_desc)
            }
            SqlxError::Io(io_error) => {
                format!("{}{}时发生I/O错误: {}", operation_desc, entity_desc, io_error)
            }
            _ => {
                format!("{}{}时发生未知数据库错误: {}", operation_desc, entity_desc, error)
            }
        };

        error!(error = %error, "{}", error_msg);
        TrackerError::database_error(error_msg)
    }

    /// Error for a row that vanished between insert/update and the re-read
    pub fn missing_after_write(context: OperationContext) -> TrackerError {
        let error_msg = format!(
            "{}{}后无法读取写入的记录",
            context.operation,
            context.entity_description()
        );
        error!("{}", error_msg);
        TrackerError::Internal(error_msg)
    }

    /// Log successful repository operation
    #[instrument(skip_all, fields(
        operation = %context.operation,
        entity_desc = %entity_desc,
        timestamp = %context.timestamp,
    ))]
    pub fn log_operation_success(
        context: OperationContext,
        entity_desc: &str,
        additional_info: Option<&str>,
    ) {
        let base_msg = format!("{}{}成功", context.operation, entity_desc);

        if let Some(info) = additional_info {
            info!("{}: {}", base_msg, info);
        } else {
            info!("{}", base_msg);
        }
    }
}

fn is_unique_violation(db_error: &dyn sqlx::error::DatabaseError) -> bool {
    db_error.is_unique_violation() || db_error.message().contains("UNIQUE constraint failed")
}

/// Macro for creating repository operation context easily
#[macro_export]
macro_rules! repository_context {
    ($operation:expr, $entity:expr) => {
        $crate::error_handling::OperationContext::new($operation, $entity)
    };
    ($operation:expr, $entity:expr, id = $id:expr) => {
        $crate::error_handling::OperationContext::new($operation, $entity).with_entity_id($id)
    };
    ($operation:expr, $entity:expr, serial_number = $serial:expr) => {
        $crate::error_handling::OperationContext::new($operation, $entity)
            .with_serial_number($serial.to_string())
    };
}

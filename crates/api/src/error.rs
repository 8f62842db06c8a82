use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use tracker_errors::TrackerError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Tracker(#[from] TrackerError),

    #[error("请求体无效: {0}")]
    JsonBody(#[from] JsonRejection),

    #[error("查询参数无效: {0}")]
    QueryParams(#[from] QueryRejection),

    #[error("路径参数无效: {0}")]
    PathParams(#[from] PathRejection),

    #[error("内部服务器错误: {0}")]
    Internal(String),
}

impl ApiError {
    fn rejection(status: StatusCode, detail: String) -> (StatusCode, String, String, Vec<String>) {
        (
            status,
            format!("请求参数错误: {detail}"),
            "BAD_REQUEST".to_string(),
            vec![
                "请检查请求格式和参数".to_string(),
                "确保Content-Type为application/json且必需字段都已提供".to_string(),
            ],
        )
    }

    fn internal(detail: String) -> (StatusCode, String, String, Vec<String>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "系统内部错误".to_string(),
            "INTERNAL_ERROR".to_string(),
            vec![
                "系统遇到内部错误，请稍后重试".to_string(),
                "查看 GET /health 检查系统状态".to_string(),
                format!("错误详情: {detail}"),
            ],
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_type, suggestions) = match &self {
            ApiError::Tracker(TrackerError::RobotNotFound { id }) => (
                StatusCode::NOT_FOUND,
                format!("机器人 ID {id} 不存在"),
                "ROBOT_NOT_FOUND".to_string(),
                vec![
                    "请检查机器人ID是否正确".to_string(),
                    "使用 GET /robots 查看所有机器人".to_string(),
                ],
            ),
            ApiError::Tracker(TrackerError::MaintenanceTaskNotFound { id }) => (
                StatusCode::NOT_FOUND,
                format!("维护任务 ID {id} 不存在"),
                "MAINTENANCE_TASK_NOT_FOUND".to_string(),
                vec![
                    "请检查维护任务ID是否正确".to_string(),
                    "使用 GET /maintenance-tasks 查看所有维护任务".to_string(),
                ],
            ),
            ApiError::Tracker(TrackerError::JobNotFound { id }) => (
                StatusCode::NOT_FOUND,
                format!("工单 ID {id} 不存在"),
                "JOB_NOT_FOUND".to_string(),
                vec![
                    "请检查工单ID是否正确".to_string(),
                    "使用 GET /jobs 查看所有工单".to_string(),
                ],
            ),
            ApiError::Tracker(TrackerError::DuplicateSerialNumber { serial_number }) => (
                StatusCode::CONFLICT,
                format!("序列号 '{serial_number}' 已被其他机器人使用"),
                "DUPLICATE_SERIAL_NUMBER".to_string(),
                vec![
                    "每个机器人的序列号必须唯一".to_string(),
                    "使用 GET /robots 查看已登记的序列号".to_string(),
                ],
            ),
            ApiError::Tracker(TrackerError::ConstraintViolation(msg)) => (
                StatusCode::CONFLICT,
                format!("数据约束冲突: {msg}"),
                "CONSTRAINT_VIOLATION".to_string(),
                vec!["请先删除引用该记录的工单".to_string()],
            ),
            ApiError::Tracker(TrackerError::Notification(msg)) => (
                StatusCode::BAD_GATEWAY,
                format!("工单通知发送失败: {msg}"),
                "NOTIFICATION_FAILED".to_string(),
                vec![
                    "外部通知服务不可用，请稍后重试".to_string(),
                    "检查 notification.endpoint 配置是否正确".to_string(),
                ],
            ),
            ApiError::Tracker(TrackerError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                format!("数据验证失败: {msg}"),
                "VALIDATION_ERROR".to_string(),
                vec!["请检查请求参数是否符合要求".to_string()],
            ),
            ApiError::Tracker(other) => Self::internal(other.to_string()),
            ApiError::JsonBody(rejection) => {
                Self::rejection(rejection.status(), rejection.body_text())
            }
            ApiError::QueryParams(rejection) => {
                Self::rejection(rejection.status(), rejection.body_text())
            }
            ApiError::PathParams(rejection) => {
                Self::rejection(rejection.status(), rejection.body_text())
            }
            ApiError::Internal(msg) => Self::internal(msg.clone()),
        };

        if status.is_server_error() {
            error!(error = %self, "请求处理失败: {}", error_message);
        }

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type,
                "code": status.as_u16(),
                "suggestions": suggestions,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

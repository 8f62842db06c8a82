//! # Tracker API
//!
//! 机器人维护跟踪服务的REST API模块，基于Axum提供机器人、标准维护任务和维护工单的HTTP接口。
//!
//! ## 架构设计
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Tracker API                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  Routes  │  Handlers  │  Extractors  │  Middleware │ Error │
//! └──────────────────────────────────────────────────────────┘
//!                            ↓
//!              ┌──────────────────────────────┐
//!              │  Repositories / JobNotifier  │
//!              │  (tracker-domain 端口)        │
//!              └──────────────────────────────┘
//! ```
//!
//! ## API 端点
//!
//! ### 机器人
//! - `GET /robots` - 获取机器人列表
//! - `GET /robots/{id}` - 获取机器人详情
//! - `POST /robots` - 登记机器人（序列号重复返回 409）
//! - `DELETE /robots/{id}` - 删除机器人
//!
//! ### 标准维护任务
//! - `GET /maintenance-tasks` - 获取维护任务列表
//! - `GET /maintenance-tasks/{id}` - 获取维护任务详情
//! - `POST /maintenance-tasks` - 创建维护任务
//! - `DELETE /maintenance-tasks/{id}` - 删除维护任务
//!
//! ### 维护工单
//! - `GET /jobs?robot_id=&task_id=` - 获取工单列表，两个条件同时给出时按 AND 过滤
//! - `GET /jobs/{id}` - 获取工单详情
//! - `POST /jobs` - 创建工单（机器人或任务不存在返回 404）
//! - `DELETE /jobs/{id}` - 删除工单
//! - `PUT /jobs/{id}/status?status=` - 覆盖工单状态
//! - `POST /jobs/{id}/notify` - 向外部地址推送工单摘要
//!
//! ### 系统
//! - `GET /health` - 健康检查
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use tracker_api::{create_app, routes::AppState};
//!
//! let app = create_app(state, &config.api);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## 错误响应
//!
//! 所有错误统一返回结构化JSON：
//!
//! ```json
//! {
//!   "error": {
//!     "message": "机器人 ID 3 不存在",
//!     "type": "ROBOT_NOT_FOUND",
//!     "code": 404,
//!     "suggestions": ["请检查机器人ID是否正确"],
//!     "timestamp": "2025-01-01T00:00:00Z"
//!   }
//! }
//! ```

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

use axum::Router;
use tower::ServiceBuilder;
use tracker_config::ApiConfig;

use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};

/// 创建完整的API应用
pub fn create_app(state: AppState, api_config: &ApiConfig) -> Router {
    let app = create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(axum::middleware::from_fn(request_logging)),
    );

    if api_config.cors_enabled {
        app.layer(cors_layer())
    } else {
        app
    }
}

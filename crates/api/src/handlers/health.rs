use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::routes::AppState;

/// 健康检查，存储不可用时报告 degraded
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let (status, database) = match state.database.health_check().await {
        Ok(()) => ("ok", "ok".to_string()),
        Err(e) => {
            warn!("健康检查发现数据库不可用: {}", e);
            ("degraded", e.to_string())
        }
    };

    Json(json!({
        "status": status,
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "maintenance-tracker",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

//! 工单通知的HTTP实现
//!
//! 向配置的外部地址发送一次 JSON POST，记录响应状态和响应体。
//! 非 2xx 响应只记录告警，不视为失败；连接错误映射为 `TrackerError::Notification`。

use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info, instrument, warn};
use tracker_config::NotificationConfig;
use tracker_domain::notification::{JobNotification, JobNotifier, NotificationReceipt};
use tracker_errors::{TrackerError, TrackerResult};

pub struct HttpJobNotifier {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpJobNotifier {
    pub fn new(config: &NotificationConfig) -> TrackerResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let http_client = builder
            .build()
            .map_err(|e| TrackerError::config_error(format!("创建通知HTTP客户端失败: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl JobNotifier for HttpJobNotifier {
    #[instrument(skip(self, notification), fields(
        job_id = notification.job_id,
        endpoint = %self.endpoint,
    ))]
    async fn notify(&self, notification: &JobNotification) -> TrackerResult<NotificationReceipt> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await
            .map_err(|e| {
                error!("发送工单通知失败: 工单ID {}, 错误: {}", notification.job_id, e);
                TrackerError::notification_error(format!("{}: {e}", self.endpoint))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("读取通知响应失败: 工单ID {}, 错误: {}", notification.job_id, e);
            TrackerError::notification_error(format!("读取响应失败: {e}"))
        })?;
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        if status.is_success() {
            info!(
                status = status.as_u16(),
                "工单通知已发送: 工单ID {}, 响应: {}", notification.job_id, body
            );
        } else {
            warn!(
                status = status.as_u16(),
                "工单通知返回非成功状态: 工单ID {}, 响应: {}", notification.job_id, body
            );
        }

        Ok(NotificationReceipt {
            status: status.as_u16(),
            body,
        })
    }
}

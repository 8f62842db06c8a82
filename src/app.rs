use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;
use tracker_api::{create_app, routes::AppState};
use tracker_config::AppConfig;
use tracker_infrastructure::{
    Database, HttpJobNotifier, SqliteJobRepository, SqliteMaintenanceTaskRepository,
    SqliteRobotRepository,
};

/// 主应用程序，持有进程级共享的存储句柄
pub struct Application {
    config: AppConfig,
    database: Database,
    state: AppState,
}

impl Application {
    /// 连接存储、建表并装配仓储和通知器
    pub async fn new(config: AppConfig) -> Result<Self> {
        info!("连接数据库: {}", config.database.url);
        let database = Database::connect(&config.database)
            .await
            .with_context(|| format!("连接数据库失败: {}", config.database.url))?;
        database
            .ensure_schema()
            .await
            .context("初始化数据库表结构失败")?;

        let notifier =
            HttpJobNotifier::new(&config.notification).context("创建工单通知客户端失败")?;
        info!("工单通知地址: {}", notifier.endpoint());

        let state = AppState {
            robot_repo: Arc::new(SqliteRobotRepository::new(database.clone())),
            task_repo: Arc::new(SqliteMaintenanceTaskRepository::new(database.clone())),
            job_repo: Arc::new(SqliteJobRepository::new(database.clone())),
            notifier: Arc::new(notifier),
            database: database.clone(),
        };

        Ok(Self {
            config,
            database,
            state,
        })
    }

    pub fn router(&self) -> Router {
        create_app(self.state.clone(), &self.config.api)
    }

    /// 绑定配置中的地址并运行，直到收到关闭信号
    pub async fn run(&self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let listener = TcpListener::bind(&self.config.api.bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {}", self.config.api.bind_address))?;

        self.serve(listener, shutdown_rx).await
    }

    /// 在给定的监听器上提供服务
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let local_addr = listener.local_addr().context("读取监听地址失败")?;
        info!("API服务器启动在 http://{}", local_addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await
            .context("API服务器运行失败")?;

        info!("API服务器已停止");
        Ok(())
    }

    /// 关闭存储连接池
    pub async fn shutdown(&self) {
        self.database.close().await;
    }
}

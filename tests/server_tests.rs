use anyhow::Result;
use axum::{routing::post, Json, Router};
use maintenance_tracker::{app::Application, shutdown::ShutdownManager};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc, task::JoinHandle};
use tracker_config::{AppConfig, DatabaseConfig, NotificationConfig};

/// 本地通知接收端，把收到的请求体转发到通道
async fn spawn_notification_receiver() -> Result<(String, mpsc::UnboundedReceiver<Value>)> {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/post",
        post(move |Json(body): Json<Value>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(body.clone());
                Json(json!({ "json": body }))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{addr}/post"), rx))
}

struct RunningServer {
    base_url: String,
    app: Arc<Application>,
    shutdown: ShutdownManager,
    handle: JoinHandle<Result<()>>,
}

async fn start_server(config: AppConfig) -> Result<RunningServer> {
    let app = Arc::new(Application::new(config).await?);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let shutdown = ShutdownManager::new();
    let shutdown_rx = shutdown.subscribe().await;
    let handle = {
        let app = Arc::clone(&app);
        tokio::spawn(async move { app.serve(listener, shutdown_rx).await })
    };

    Ok(RunningServer {
        base_url,
        app,
        shutdown,
        handle,
    })
}

impl RunningServer {
    async fn stop(self) -> Result<()> {
        self.shutdown.shutdown().await;
        self.handle.await??;
        self.app.shutdown().await;
        Ok(())
    }
}

fn file_config(dir: &tempfile::TempDir, endpoint: String) -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.path().join("tracker.db").display()),
            ..DatabaseConfig::default()
        },
        notification: NotificationConfig {
            endpoint,
            timeout_seconds: Some(5),
        },
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn test_server_end_to_end_over_http() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (endpoint, mut notifications) = spawn_notification_receiver().await?;
    let server = start_server(file_config(&dir, endpoint)).await?;
    let client = reqwest::Client::new();
    let base = server.base_url.clone();

    let health: Value = client.get(format!("{base}/health")).send().await?.json().await?;
    assert_eq!(health["status"], "ok");

    let robot: Value = client
        .post(format!("{base}/robots"))
        .json(&json!({ "name": "R1", "model": "M1", "serial_number": "S1" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(robot["id"], 1);

    let duplicate = client
        .post(format!("{base}/robots"))
        .json(&json!({ "name": "R2", "model": "M2", "serial_number": "S1" }))
        .send()
        .await?;
    assert_eq!(duplicate.status(), reqwest::StatusCode::CONFLICT);

    let task: Value = client
        .post(format!("{base}/maintenance-tasks"))
        .json(&json!({ "name": "T1", "description": "D", "frequency": 7 }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(task["id"], 1);

    let job: Value = client
        .post(format!("{base}/jobs"))
        .json(&json!({ "robot_id": 1, "task_id": 1, "due_date": "2025-01-01" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(job["status"], "New");

    let updated: Value = client
        .put(format!("{base}/jobs/1/status"))
        .query(&[("status", "Done")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(updated["status"], "Done");

    let response = client.post(format!("{base}/jobs/1/notify")).send().await?;
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let payload = notifications.recv().await.expect("notification should arrive");
    assert_eq!(
        payload,
        json!({
            "job_id": 1,
            "robot_id": 1,
            "task_id": 1,
            "robot_name": "R1",
            "task_name": "T1"
        })
    );

    server.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_data_survives_restart() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let client = reqwest::Client::new();

    let server = start_server(file_config(&dir, "http://127.0.0.1:9/post".to_string())).await?;
    let response = client
        .post(format!("{}/robots", server.base_url))
        .json(&json!({ "name": "R1", "model": "M1", "serial_number": "S1" }))
        .send()
        .await?;
    assert!(response.status().is_success());
    server.stop().await?;

    // 重启后表结构再次初始化不影响已有数据
    let server = start_server(file_config(&dir, "http://127.0.0.1:9/post".to_string())).await?;
    let robots: Value = client
        .get(format!("{}/robots", server.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(robots.as_array().map(Vec::len), Some(1));
    assert_eq!(robots[0]["serial_number"], "S1");
    server.stop().await?;

    Ok(())
}

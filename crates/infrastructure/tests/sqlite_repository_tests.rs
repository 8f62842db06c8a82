use anyhow::Result;
use tracker_config::DatabaseConfig;
use tracker_domain::entities::JobFilter;
use tracker_domain::repositories::*;
use tracker_errors::TrackerError;
use tracker_infrastructure::database::{
    SqliteJobRepository, SqliteMaintenanceTaskRepository, SqliteRobotRepository,
};

use sqlite_test_utils::*;

#[tokio::test]
async fn test_sqlite_robot_repository_crud() -> Result<()> {
    let database = memory_database().await?;
    let repo = SqliteRobotRepository::new(database);

    let created = repo.create(&robot("R1", "S1")).await?;
    assert_eq!(created.id, 1);
    assert_eq!(created.name, "R1");
    assert_eq!(created.model, "R1-model");
    assert_eq!(created.serial_number, "S1");

    let fetched = repo.get_by_id(created.id).await?;
    assert_eq!(fetched, Some(created.clone()));

    let by_serial = repo.get_by_serial_number("S1").await?;
    assert_eq!(by_serial, Some(created.clone()));
    assert!(repo.get_by_serial_number("S-unknown").await?.is_none());

    let second = repo.create(&robot("R2", "S2")).await?;
    assert_eq!(second.id, 2);

    let all = repo.list().await?;
    assert_eq!(all, vec![created, second]);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_serial_number_is_rejected() -> Result<()> {
    let database = memory_database().await?;
    let repo = SqliteRobotRepository::new(database);

    repo.create(&robot("R1", "S1")).await?;
    let duplicate = repo.create(&robot("Other", "S1")).await;

    match duplicate {
        Err(TrackerError::DuplicateSerialNumber { serial_number }) => {
            assert_eq!(serial_number, "S1")
        }
        other => panic!("Expected DuplicateSerialNumber, got {other:?}"),
    }

    let robots = repo.list().await?;
    assert_eq!(robots.len(), 1);
    assert_eq!(robots[0].name, "R1");

    Ok(())
}

#[tokio::test]
async fn test_get_missing_entities_returns_none() -> Result<()> {
    let database = memory_database().await?;
    let robots = SqliteRobotRepository::new(database.clone());
    let tasks = SqliteMaintenanceTaskRepository::new(database.clone());
    let jobs = SqliteJobRepository::new(database);

    assert!(robots.get_by_id(42).await?.is_none());
    assert!(tasks.get_by_id(42).await?.is_none());
    assert!(jobs.get_by_id(42).await?.is_none());

    // 删除后再次查询同样返回不存在
    let robot = robots.create(&robot("R1", "S1")).await?;
    assert!(robots.delete(robot.id).await?);
    assert!(robots.get_by_id(robot.id).await?.is_none());

    let task = tasks.create(&maintenance_task("T1", 7)).await?;
    assert!(tasks.delete(task.id).await?);
    assert!(tasks.get_by_id(task.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_delete_only_removes_target_row() -> Result<()> {
    let database = memory_database().await?;
    let repo = SqliteRobotRepository::new(database);

    let first = repo.create(&robot("R1", "S1")).await?;
    let second = repo.create(&robot("R2", "S2")).await?;
    let third = repo.create(&robot("R3", "S3")).await?;

    assert!(repo.delete(second.id).await?);

    let remaining = repo.list().await?;
    assert_eq!(remaining, vec![first, third]);

    // 重复删除不影响其他行
    assert!(!repo.delete(second.id).await?);
    assert_eq!(repo.list().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_sqlite_maintenance_task_repository_crud() -> Result<()> {
    let database = memory_database().await?;
    let repo = SqliteMaintenanceTaskRepository::new(database);

    let created = repo.create(&maintenance_task("T1", 7)).await?;
    assert_eq!(created.id, 1);
    assert_eq!(created.description, "T1 description");
    assert_eq!(created.frequency, 7);

    // 名称没有唯一约束
    let same_name = repo.create(&maintenance_task("T1", 30)).await?;
    assert_eq!(same_name.id, 2);

    let all = repo.list().await?;
    assert_eq!(all.len(), 2);

    assert!(repo.delete(created.id).await?);
    assert!(!repo.delete(created.id).await?);
    assert_eq!(repo.list().await?, vec![same_name]);

    Ok(())
}

#[tokio::test]
async fn test_sqlite_job_repository_defaults_and_status_update() -> Result<()> {
    let database = memory_database().await?;
    let repo = SqliteJobRepository::new(database);

    let created = repo.create(&job(1, 1, "2025-01-01")).await?;
    assert_eq!(created.id, 1);
    assert_eq!(created.status, "New");
    assert_eq!(created.due_date.to_string(), "2025-01-01");

    let updated = repo.update_status(created.id, "Done").await?;
    assert_eq!(updated.map(|job| job.status), Some("Done".to_string()));

    // 状态是自由文本
    for status in ["", "In Progress", "完成 ✓", "'; DROP TABLE Jobs; --"] {
        let updated = repo.update_status(created.id, status).await?;
        assert!(updated.is_some());
        let fetched = repo.get_by_id(created.id).await?.expect("job should exist");
        assert_eq!(fetched.status, status);
    }

    assert!(repo.update_status(999, "Done").await?.is_none());

    assert!(repo.delete(created.id).await?);
    assert!(repo.get_by_id(created.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_job_filters_use_and_semantics() -> Result<()> {
    let database = memory_database().await?;
    let repo = SqliteJobRepository::new(database);

    let a = repo.create(&job(1, 1, "2025-01-01")).await?;
    let b = repo.create(&job(1, 2, "2025-02-01")).await?;
    let c = repo.create(&job(2, 1, "2025-03-01")).await?;
    let d = repo.create(&job(2, 2, "2025-04-01")).await?;

    let all = repo.list(&JobFilter::default()).await?;
    assert_eq!(all, vec![a.clone(), b.clone(), c.clone(), d.clone()]);

    let by_robot = repo.list(&JobFilter::by_robot(1)).await?;
    assert_eq!(by_robot, vec![a.clone(), b.clone()]);

    let by_task = repo.list(&JobFilter::by_task(1)).await?;
    assert_eq!(by_task, vec![a, c]);

    let both = repo
        .list(&JobFilter {
            robot_id: Some(2),
            task_id: Some(2),
        })
        .await?;
    assert_eq!(both, vec![d]);

    let none = repo.list(&JobFilter::by_robot(99)).await?;
    assert!(none.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_foreign_keys_block_referenced_delete_when_enabled() -> Result<()> {
    let database = memory_database_with_foreign_keys().await?;
    let robots = SqliteRobotRepository::new(database.clone());
    let tasks = SqliteMaintenanceTaskRepository::new(database.clone());
    let jobs = SqliteJobRepository::new(database);

    let robot = robots.create(&robot("R1", "S1")).await?;
    let task = tasks.create(&maintenance_task("T1", 7)).await?;
    jobs.create(&job(robot.id, task.id, "2025-01-01")).await?;

    let result = robots.delete(robot.id).await;
    assert!(matches!(result, Err(TrackerError::ConstraintViolation(_))));
    assert!(robots.get_by_id(robot.id).await?.is_some());

    let dangling = jobs.create(&job(99, task.id, "2025-01-01")).await;
    assert!(matches!(dangling, Err(TrackerError::ConstraintViolation(_))));

    Ok(())
}

#[tokio::test]
async fn test_delete_leaves_dangling_jobs_without_foreign_keys() -> Result<()> {
    let database = memory_database().await?;
    let robots = SqliteRobotRepository::new(database.clone());
    let jobs = SqliteJobRepository::new(database);

    let robot = robots.create(&robot("R1", "S1")).await?;
    let job = jobs.create(&job(robot.id, 1, "2025-01-01")).await?;

    assert!(robots.delete(robot.id).await?);
    assert_eq!(jobs.get_by_id(job.id).await?, Some(job));

    Ok(())
}

#[tokio::test]
async fn test_file_database_persists_across_connections() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tracker.db");
    let config = DatabaseConfig {
        url: format!("sqlite:{}", path.display()),
        ..DatabaseConfig::default()
    };

    let database = open_database(config.clone()).await?;
    SqliteRobotRepository::new(database.clone())
        .create(&robot("R1", "S1"))
        .await?;
    database.close().await;

    let reopened = open_database(config).await?;
    let robots = SqliteRobotRepository::new(reopened.clone()).list().await?;
    assert_eq!(robots.len(), 1);
    assert_eq!(robots[0].serial_number, "S1");
    reopened.close().await;

    Ok(())
}

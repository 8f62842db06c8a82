use async_trait::async_trait;
use tracing::{debug, instrument};
use tracker_domain::{
    entities::{BaseMaintenanceTask, MaintenanceTask},
    repositories::MaintenanceTaskRepository,
};
use tracker_errors::TrackerResult;

use crate::{
    database::{
        manager::{Database, SqlValue},
        mapping::{MappingHelpers, MAINTENANCE_TASK_COLUMNS},
    },
    error_handling::{EntityKind, RepositoryErrorHelpers, RepositoryOperation},
    repository_context,
};

pub struct SqliteMaintenanceTaskRepository {
    database: Database,
}

impl SqliteMaintenanceTaskRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl MaintenanceTaskRepository for SqliteMaintenanceTaskRepository {
    #[instrument(skip(self, task), fields(task_name = %task.name, frequency = task.frequency))]
    async fn create(&self, task: &BaseMaintenanceTask) -> TrackerResult<MaintenanceTask> {
        let context = repository_context!(RepositoryOperation::Create, EntityKind::MaintenanceTask);

        let result = self
            .database
            .execute(
                "INSERT INTO MaintenanceTasks (name, description, frequency) VALUES (?1, ?2, ?3)",
                &[
                    SqlValue::from(task.name.as_str()),
                    SqlValue::from(task.description.as_str()),
                    SqlValue::Integer(task.frequency),
                ],
            )
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context.clone(), e))?;

        let id = result
            .generated_id()
            .ok_or_else(|| RepositoryErrorHelpers::missing_after_write(context.clone()))?;
        let created = self.get_by_id(id).await?.ok_or_else(|| {
            RepositoryErrorHelpers::missing_after_write(context.clone().with_entity_id(id))
        })?;

        RepositoryErrorHelpers::log_operation_success(
            context,
            &created.entity_description(),
            Some(&format!("频率: {}", created.frequency)),
        );
        Ok(created)
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn get_by_id(&self, id: i64) -> TrackerResult<Option<MaintenanceTask>> {
        let context =
            repository_context!(RepositoryOperation::Read, EntityKind::MaintenanceTask, id = id);

        let row = self
            .database
            .fetch_one(
                &format!("SELECT {MAINTENANCE_TASK_COLUMNS} FROM MaintenanceTasks WHERE id = ?1"),
                &[SqlValue::Integer(id)],
            )
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context, e))?;

        match row {
            Some(row) => {
                let task = MappingHelpers::maintenance_task_from_row(&row)?;
                debug!("查询维护任务成功: ID {}, 名称: {}", task.id, task.name);
                Ok(Some(task))
            }
            None => {
                debug!("查询维护任务不存在: ID {}", id);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    async fn list(&self) -> TrackerResult<Vec<MaintenanceTask>> {
        let context = repository_context!(RepositoryOperation::Query, EntityKind::MaintenanceTask);

        let rows = self
            .database
            .fetch_all(
                &format!("SELECT {MAINTENANCE_TASK_COLUMNS} FROM MaintenanceTasks ORDER BY id"),
                &[],
            )
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context, e))?;

        let tasks = rows
            .iter()
            .map(MappingHelpers::maintenance_task_from_row)
            .collect::<TrackerResult<Vec<_>>>()?;
        debug!("查询维护任务列表成功，返回 {} 个任务", tasks.len());
        Ok(tasks)
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn delete(&self, id: i64) -> TrackerResult<bool> {
        let context =
            repository_context!(RepositoryOperation::Delete, EntityKind::MaintenanceTask, id = id);

        let result = self
            .database
            .execute(
                "DELETE FROM MaintenanceTasks WHERE id = ?1",
                &[SqlValue::Integer(id)],
            )
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context.clone(), e))?;

        let deleted = result.rows_affected > 0;
        if deleted {
            RepositoryErrorHelpers::log_operation_success(
                context,
                &format!("维护任务 (ID: {id})"),
                None,
            );
        } else {
            debug!("删除维护任务时记录不存在: ID {}", id);
        }
        Ok(deleted)
    }
}

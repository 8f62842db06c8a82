use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use tracker_domain::{
    entities::{BaseJob, Job, JobFilter},
    repositories::JobRepository,
};
use tracker_errors::TrackerResult;

use crate::{
    database::{
        manager::{Database, SqlValue},
        mapping::{MappingHelpers, JOB_COLUMNS},
    },
    error_handling::{EntityKind, RepositoryErrorHelpers, RepositoryOperation},
    repository_context,
};

pub struct SqliteJobRepository {
    database: Database,
}

impl SqliteJobRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// 按过滤条件拼接 WHERE 子句，条件之间用 AND 连接
    fn build_list_query(filter: &JobFilter) -> (String, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(robot_id) = filter.robot_id {
            params.push(SqlValue::Integer(robot_id));
            conditions.push(format!("robot_id = ?{}", params.len()));
        }
        if let Some(task_id) = filter.task_id {
            params.push(SqlValue::Integer(task_id));
            conditions.push(format!("task_id = ?{}", params.len()));
        }

        let mut sql = format!("SELECT {JOB_COLUMNS} FROM Jobs");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        (sql, params)
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    #[instrument(skip(self, job), fields(
        robot_id = job.robot_id,
        task_id = job.task_id,
        due_date = %job.due_date,
    ))]
    async fn create(&self, job: &BaseJob) -> TrackerResult<Job> {
        let context = repository_context!(RepositoryOperation::Create, EntityKind::Job)
            .with_additional_info(format!("robot_id={}, task_id={}", job.robot_id, job.task_id));

        // status 列使用表默认值
        let result = self
            .database
            .execute(
                "INSERT INTO Jobs (robot_id, task_id, due_date) VALUES (?1, ?2, ?3)",
                &[
                    SqlValue::Integer(job.robot_id),
                    SqlValue::Integer(job.task_id),
                    SqlValue::Date(job.due_date),
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
            Some(&format!("截止日期: {}", created.due_date)),
        );
        Ok(created)
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: i64) -> TrackerResult<Option<Job>> {
        let context = repository_context!(RepositoryOperation::Read, EntityKind::Job, id = id);

        let row = self
            .database
            .fetch_one(
                &format!("SELECT {JOB_COLUMNS} FROM Jobs WHERE id = ?1"),
                &[SqlValue::Integer(id)],
            )
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context, e))?;

        match row {
            Some(row) => {
                let job = MappingHelpers::job_from_row(&row)?;
                debug!("查询工单成功: ID {}, 状态: {}", job.id, job.status);
                Ok(Some(job))
            }
            None => {
                debug!("查询工单不存在: ID {}", id);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self), fields(
        robot_id = ?filter.robot_id,
        task_id = ?filter.task_id,
    ))]
    async fn list(&self, filter: &JobFilter) -> TrackerResult<Vec<Job>> {
        let context = repository_context!(RepositoryOperation::Query, EntityKind::Job)
            .with_additional_info(format!("{filter:?}"));

        let (sql, params) = Self::build_list_query(filter);
        let rows = self
            .database
            .fetch_all(&sql, &params)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context, e))?;

        let jobs = rows
            .iter()
            .map(MappingHelpers::job_from_row)
            .collect::<TrackerResult<Vec<_>>>()?;
        debug!("查询工单列表成功，返回 {} 个工单", jobs.len());
        Ok(jobs)
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn delete(&self, id: i64) -> TrackerResult<bool> {
        let context = repository_context!(RepositoryOperation::Delete, EntityKind::Job, id = id);

        let result = self
            .database
            .execute("DELETE FROM Jobs WHERE id = ?1", &[SqlValue::Integer(id)])
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context.clone(), e))?;

        let deleted = result.rows_affected > 0;
        if deleted {
            RepositoryErrorHelpers::log_operation_success(
                context,
                &format!("工单 (ID: {id})"),
                None,
            );
        } else {
            debug!("删除工单时记录不存在: ID {}", id);
        }
        Ok(deleted)
    }

    #[instrument(skip(self), fields(job_id = %id, status = %status))]
    async fn update_status(&self, id: i64, status: &str) -> TrackerResult<Option<Job>> {
        let context = repository_context!(RepositoryOperation::Update, EntityKind::Job, id = id);

        let result = self
            .database
            .execute(
                "UPDATE Jobs SET status = ?1 WHERE id = ?2",
                &[SqlValue::from(status), SqlValue::Integer(id)],
            )
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context.clone(), e))?;

        if result.rows_affected == 0 {
            warn!("更新工单状态时工单不存在: ID {}", id);
            return Ok(None);
        }

        let updated = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryErrorHelpers::missing_after_write(context.clone()))?;

        RepositoryErrorHelpers::log_operation_success(
            context,
            &updated.entity_description(),
            Some(&format!("新状态: {}", updated.status)),
        );
        Ok(Some(updated))
    }
}

use async_trait::async_trait;
use tracing::{debug, instrument};
use tracker_domain::{
    entities::{BaseRobot, Robot},
    repositories::RobotRepository,
};
use tracker_errors::TrackerResult;

use crate::{
    database::{
        manager::{Database, SqlValue},
        mapping::{MappingHelpers, ROBOT_COLUMNS},
    },
    error_handling::{EntityKind, RepositoryErrorHelpers, RepositoryOperation},
    repository_context,
};

pub struct SqliteRobotRepository {
    database: Database,
}

impl SqliteRobotRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl RobotRepository for SqliteRobotRepository {
    #[instrument(skip(self, robot), fields(
        robot_name = %robot.name,
        serial_number = %robot.serial_number,
    ))]
    async fn create(&self, robot: &BaseRobot) -> TrackerResult<Robot> {
        let context = repository_context!(
            RepositoryOperation::Create,
            EntityKind::Robot,
            serial_number = &robot.serial_number
        );

        // 序列号唯一性完全交给表上的 UNIQUE 约束判断
        let result = self
            .database
            .execute(
                "INSERT INTO Robots (name, model, serial_number) VALUES (?1, ?2, ?3)",
                &[
                    SqlValue::from(robot.name.as_str()),
                    SqlValue::from(robot.model.as_str()),
                    SqlValue::from(robot.serial_number.as_str()),
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
            Some(&format!("型号: {}", created.model)),
        );
        Ok(created)
    }

    #[instrument(skip(self), fields(robot_id = %id))]
    async fn get_by_id(&self, id: i64) -> TrackerResult<Option<Robot>> {
        let context = repository_context!(RepositoryOperation::Read, EntityKind::Robot, id = id);

        let row = self
            .database
            .fetch_one(
                &format!("SELECT {ROBOT_COLUMNS} FROM Robots WHERE id = ?1"),
                &[SqlValue::Integer(id)],
            )
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context, e))?;

        match row {
            Some(row) => {
                let robot = MappingHelpers::robot_from_row(&row)?;
                debug!("查询机器人成功: ID {}, 名称: {}", robot.id, robot.name);
                Ok(Some(robot))
            }
            None => {
                debug!("查询机器人不存在: ID {}", id);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self), fields(serial_number = %serial_number))]
    async fn get_by_serial_number(&self, serial_number: &str) -> TrackerResult<Option<Robot>> {
        let context = repository_context!(
            RepositoryOperation::Read,
            EntityKind::Robot,
            serial_number = serial_number
        );

        let row = self
            .database
            .fetch_one(
                &format!("SELECT {ROBOT_COLUMNS} FROM Robots WHERE serial_number = ?1"),
                &[SqlValue::from(serial_number)],
            )
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context, e))?;

        row.as_ref().map(MappingHelpers::robot_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self) -> TrackerResult<Vec<Robot>> {
        let context = repository_context!(RepositoryOperation::Query, EntityKind::Robot);

        let rows = self
            .database
            .fetch_all(&format!("SELECT {ROBOT_COLUMNS} FROM Robots ORDER BY id"), &[])
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context, e))?;

        let robots = rows
            .iter()
            .map(MappingHelpers::robot_from_row)
            .collect::<TrackerResult<Vec<_>>>()?;
        debug!("查询机器人列表成功，返回 {} 个机器人", robots.len());
        Ok(robots)
    }

    #[instrument(skip(self), fields(robot_id = %id))]
    async fn delete(&self, id: i64) -> TrackerResult<bool> {
        let context = repository_context!(RepositoryOperation::Delete, EntityKind::Robot, id = id);

        let result = self
            .database
            .execute("DELETE FROM Robots WHERE id = ?1", &[SqlValue::Integer(id)])
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(context.clone(), e))?;

        let deleted = result.rows_affected > 0;
        if deleted {
            RepositoryErrorHelpers::log_operation_success(
                context,
                &format!("机器人 (ID: {id})"),
                None,
            );
        } else {
            debug!("删除机器人时记录不存在: ID {}", id);
        }
        Ok(deleted)
    }
}

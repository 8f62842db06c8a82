use chrono::NaiveDate;
use sqlx::{
    query::Query,
    sqlite::{
        SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
    },
    Sqlite, SqlitePool,
};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info, instrument};
use tracker_config::DatabaseConfig;
use tracker_domain::DEFAULT_JOB_STATUS;
use tracker_errors::{TrackerError, TrackerResult};

/// 语句参数，按 `?1`, `?2` ... 的顺序绑定
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Date(NaiveDate),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

impl ExecutionResult {
    /// INSERT 语句生成的行ID，没有写入任何行时为 `None`
    pub fn generated_id(&self) -> Option<i64> {
        (self.rows_affected > 0 && self.last_insert_id > 0).then_some(self.last_insert_id)
    }
}

/// 进程级共享的存储句柄，启动时创建一次并注入各个仓储
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> TrackerResult<Self> {
        let in_memory = config.url.contains(":memory:");

        let mut connect_options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(config.create_if_missing)
            .foreign_keys(config.enforce_foreign_keys);
        if !in_memory {
            connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
        }

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds));
        if in_memory {
            // 内存库随最后一个连接关闭而消失
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        } else {
            pool_options = pool_options.max_lifetime(Duration::from_secs(1800));
        }

        let pool = pool_options.connect_with(connect_options).await?;

        info!(
            "数据库连接池已创建: {} (外键约束: {})",
            config.url, config.enforce_foreign_keys
        );
        Ok(Self { pool })
    }

    /// 幂等地创建三张表
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> TrackerResult<()> {
        debug!("检查并创建数据库表结构");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS Robots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                model TEXT NOT NULL,
                serial_number TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS MaintenanceTasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                frequency INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        let jobs_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS Jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                robot_id INTEGER NOT NULL,
                task_id INTEGER NOT NULL,
                due_date DATE NOT NULL,
                status TEXT NOT NULL DEFAULT '{DEFAULT_JOB_STATUS}',
                FOREIGN KEY (robot_id) REFERENCES Robots (id),
                FOREIGN KEY (task_id) REFERENCES MaintenanceTasks (id)
            )
            "#
        );
        sqlx::query(&jobs_table).execute(&self.pool).await?;

        info!("✅ 数据库表结构就绪");
        Ok(())
    }

    pub async fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecutionResult, sqlx::Error> {
        let result = bind_params(sql, params).execute(&self.pool).await?;
        Ok(ExecutionResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        })
    }

    pub async fn fetch_one(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<SqliteRow>, sqlx::Error> {
        bind_params(sql, params).fetch_optional(&self.pool).await
    }

    pub async fn fetch_all(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<SqliteRow>, sqlx::Error> {
        bind_params(sql, params).fetch_all(&self.pool).await
    }

    pub async fn health_check(&self) -> TrackerResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| TrackerError::database_error(format!("数据库健康检查失败: {e}")))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("数据库连接池已关闭");
    }
}

fn bind_params<'q>(sql: &'q str, params: &'q [SqlValue]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| match param {
            SqlValue::Integer(value) => query.bind(*value),
            SqlValue::Text(value) => query.bind(value.as_str()),
            SqlValue::Date(value) => query.bind(*value),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    async fn memory_database() -> Database {
        let database = Database::connect(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to open in-memory database");
        database.ensure_schema().await.expect("Failed to create schema");
        database
    }

    #[test]
    fn test_generated_id() {
        let inserted = ExecutionResult {
            rows_affected: 1,
            last_insert_id: 4,
        };
        assert_eq!(inserted.generated_id(), Some(4));

        let untouched = ExecutionResult {
            rows_affected: 0,
            last_insert_id: 4,
        };
        assert_eq!(untouched.generated_id(), None);
    }

    #[test]
    fn test_sql_value_conversions() {
        assert_eq!(SqlValue::from(5_i64), SqlValue::Integer(5));
        assert_eq!(SqlValue::from("New"), SqlValue::Text("New".to_string()));
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(SqlValue::from(date), SqlValue::Date(date));
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let database = memory_database().await;
        database.ensure_schema().await.expect("Second run should succeed");

        let rows = database
            .fetch_all(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('Robots', 'MaintenanceTasks', 'Jobs') ORDER BY name",
                &[],
            )
            .await
            .unwrap();
        let names: Vec<String> = rows.iter().map(|row| row.get("name")).collect();
        assert_eq!(names, vec!["Jobs", "MaintenanceTasks", "Robots"]);
    }

    #[tokio::test]
    async fn test_execute_and_fetch() {
        let database = memory_database().await;

        let result = database
            .execute(
                "INSERT INTO MaintenanceTasks (name, description, frequency) VALUES (?1, ?2, ?3)",
                &[
                    SqlValue::from("Inspect"),
                    SqlValue::from("Visual inspection"),
                    SqlValue::Integer(14),
                ],
            )
            .await
            .unwrap();
        let id = result.generated_id().expect("insert should generate an id");

        let row = database
            .fetch_one("SELECT * FROM MaintenanceTasks WHERE id = ?1", &[SqlValue::Integer(id)])
            .await
            .unwrap()
            .expect("row should exist");
        assert_eq!(row.get::<String, _>("name"), "Inspect");
        assert_eq!(row.get::<i64, _>("frequency"), 14);

        let missing = database
            .fetch_one("SELECT * FROM MaintenanceTasks WHERE id = ?1", &[SqlValue::Integer(999)])
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_job_status_defaults_to_new() {
        let database = memory_database().await;
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        database
            .execute(
                "INSERT INTO Jobs (robot_id, task_id, due_date) VALUES (?1, ?2, ?3)",
                &[SqlValue::Integer(1), SqlValue::Integer(1), SqlValue::Date(date)],
            )
            .await
            .unwrap();

        let row = database
            .fetch_one("SELECT status, due_date FROM Jobs", &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.get::<String, _>("status"), "New");
        assert_eq!(row.get::<NaiveDate, _>("due_date"), date);
    }

    #[tokio::test]
    async fn test_serial_number_unique_constraint() {
        let database = memory_database().await;
        let insert = "INSERT INTO Robots (name, model, serial_number) VALUES (?1, ?2, ?3)";

        database
            .execute(insert, &[SqlValue::from("R1"), SqlValue::from("M1"), SqlValue::from("S1")])
            .await
            .unwrap();
        let duplicate = database
            .execute(insert, &[SqlValue::from("R2"), SqlValue::from("M2"), SqlValue::from("S1")])
            .await;

        match duplicate {
            Err(sqlx::Error::Database(db_error)) => assert!(db_error.is_unique_violation()),
            other => panic!("Expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health_check_and_close() {
        let database = memory_database().await;
        assert!(database.health_check().await.is_ok());

        database.close().await;
        assert!(database.health_check().await.is_err());
    }
}

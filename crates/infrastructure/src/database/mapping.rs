//! Row to entity mapping shared by the SQLite repositories

use sqlx::{sqlite::SqliteRow, Row};
use tracker_domain::entities::{Job, MaintenanceTask, Robot};
use tracker_errors::TrackerResult;

pub const ROBOT_COLUMNS: &str = "id, name, model, serial_number";
pub const MAINTENANCE_TASK_COLUMNS: &str = "id, name, description, frequency";
pub const JOB_COLUMNS: &str = "id, robot_id, task_id, due_date, status";

pub struct MappingHelpers;

impl MappingHelpers {
    pub fn robot_from_row(row: &SqliteRow) -> TrackerResult<Robot> {
        Ok(Robot {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            model: row.try_get("model")?,
            serial_number: row.try_get("serial_number")?,
        })
    }

    pub fn maintenance_task_from_row(row: &SqliteRow) -> TrackerResult<MaintenanceTask> {
        Ok(MaintenanceTask {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            frequency: row.try_get("frequency")?,
        })
    }

    pub fn job_from_row(row: &SqliteRow) -> TrackerResult<Job> {
        Ok(Job {
            id: row.try_get("id")?,
            robot_id: row.try_get("robot_id")?,
            task_id: row.try_get("task_id")?,
            due_date: row.try_get("due_date")?,
            status: row.try_get("status")?,
        })
    }
}

pub mod manager;
pub mod mapping;
pub mod sqlite;

pub use manager::{Database, ExecutionResult, SqlValue};
pub use sqlite::{SqliteJobRepository, SqliteMaintenanceTaskRepository, SqliteRobotRepository};

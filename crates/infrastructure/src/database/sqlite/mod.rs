pub mod sqlite_job_repository;
pub mod sqlite_maintenance_task_repository;
pub mod sqlite_robot_repository;

pub use sqlite_job_repository::SqliteJobRepository;
pub use sqlite_maintenance_task_repository::SqliteMaintenanceTaskRepository;
pub use sqlite_robot_repository::SqliteRobotRepository;

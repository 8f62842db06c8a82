pub mod health;
pub mod jobs;
pub mod maintenance_tasks;
pub mod robots;

pub mod entities;
pub mod notification;
pub mod repositories;

pub use entities::*;
pub use notification::*;
pub use repositories::*;
pub use tracker_errors::{TrackerError, TrackerResult};

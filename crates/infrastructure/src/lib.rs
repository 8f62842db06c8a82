pub mod database;
pub mod error_handling;
pub mod notification;

pub use database::*;
pub use notification::HttpJobNotifier;

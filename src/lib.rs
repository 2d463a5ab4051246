pub mod activity;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod storage;

pub use activity::{ActivityLog, Channel, MemoryLog, TracingActivityLog};
pub use config::AppConfig;
pub use crate::core::{SyncEngine, DEFAULT_DESTINATION};
pub use error::{SyncError, SyncResult};

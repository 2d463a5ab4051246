pub mod comparator;
pub mod engine;
pub mod monitor;
pub mod versioning;

pub use comparator::{ListingDiff, SyncAction};
pub use engine::{DirectoryPair, SyncEngine, DEFAULT_DESTINATION};
pub use monitor::{ChangeMonitor, MonitorState, TickOutcome};
pub use versioning::{Versioner, VERSION_TIMESTAMP_FORMAT};

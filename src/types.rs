pub mod aggregate;
pub mod group_key;
pub mod record;
pub mod table;

// Re-export types for convenience.
pub use crate::types::aggregate::Aggregate;
pub use crate::types::group_key::{Channel, GroupKey, GroupKeyRef};
pub use crate::types::record::SensorRecord;
pub use crate::types::table::GroupTable;

pub mod reader;
pub mod types;

pub use reader::{FileSnapshotReader, SnapshotReader};
pub use types::{
    Anomaly, QueryAnalysis, RiskDetail, RiskEntry, SecurityAudit, SecurityStatus,
    SystemSnapshots, CRITICAL_CLASSIFICATION,
};

pub mod context;
pub mod session;
pub mod snapshot;
pub mod storage;

pub use context::ContextAssembler;
pub use session::{
    derive_title, new_session_id, Message, Role, SessionLocks, SessionRecord, SessionSummary,
};
pub use snapshot::{
    Anomaly, FileSnapshotReader, QueryAnalysis, RiskEntry, SecurityAudit, SecurityStatus,
    SnapshotReader, SystemSnapshots,
};
pub use storage::{JsonSessionStore, SessionStore};

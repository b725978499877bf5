pub mod lock;
pub mod types;

pub use lock::SessionLocks;
pub use types::{
    derive_title, is_valid_session_id, new_session_id, Message, Role, SessionRecord,
    SessionSummary, DEFAULT_TITLE,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TITLE_MAX_CHARS: usize = 30;
pub const TITLE_ELLIPSIS: &str = "...";
pub const DEFAULT_TITLE: &str = "New conversation";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// On-disk shape of a persisted conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub title: String,
    pub last_update: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl SessionRecord {
    /// Build a record whose title is derived from `messages`.
    pub fn new(id: impl Into<String>, messages: Vec<Message>, last_update: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: derive_title(&messages),
            last_update,
            messages,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            last_update: self.last_update,
        }
    }

    /// A completed turn always appends a user/assistant pair.
    pub fn has_partial_turn(&self) -> bool {
        self.messages.len() % 2 != 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub last_update: DateTime<Utc>,
}

/// Title shown in the session index.
///
/// Recomputed on every save from the first user message, so it only changes if
/// that message changes.
pub fn derive_title(messages: &[Message]) -> String {
    let Some(first) = messages.iter().find(|m| m.role == Role::User) else {
        return DEFAULT_TITLE.to_string();
    };

    if first.content.chars().count() > TITLE_MAX_CHARS {
        let mut title: String = first.content.chars().take(TITLE_MAX_CHARS).collect();
        title.push_str(TITLE_ELLIPSIS);
        title
    } else {
        first.content.clone()
    }
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Ids double as file names, so only a conservative alphabet is accepted.
pub fn is_valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id.len() <= 128
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

use dba_llm::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_SYSTEM_ROLE};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_RETRIEVAL_K: usize = 3;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Holds the analysis snapshots plus the `sessions/` directory.
    pub data_dir: PathBuf,
    pub knowledge_dir: Option<PathBuf>,
    pub llm_base_url: String,
    pub model: String,
    /// System message sent ahead of every prompt.
    pub system_role: String,
    pub api_key: Option<String>,
    pub retrieval_k: usize,
    pub serialize_sessions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: default_data_dir(),
            knowledge_dir: None,
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_role: DEFAULT_SYSTEM_ROLE.to_string(),
            api_key: None,
            retrieval_k: DEFAULT_RETRIEVAL_K,
            serialize_sessions: false,
        }
    }
}

impl ServerConfig {
    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    pub fn knowledge_dir(&self) -> PathBuf {
        self.knowledge_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("knowledge"))
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".dba-assistant")
}

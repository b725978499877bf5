use dba_core::{
    ContextAssembler, FileSnapshotReader, JsonSessionStore, SessionLocks, SessionStore,
    SnapshotReader,
};
use dba_llm::{CompletionService, KnowledgeBase, OpenAIProvider, RetrievalService};
use std::io;
use std::sync::Arc;

use crate::config::{ServerConfig, DEFAULT_RETRIEVAL_K};

pub const SYSTEM_INSTRUCTION: &str = "You are the intelligent assistant of the Oracle DBA platform. \
You have access to technical documentation through retrieval and to the latest audit, \
performance and anomaly reports. Answer questions about optimization, security, backups \
or anomalies concisely and professionally.";

pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub snapshots: Arc<dyn SnapshotReader>,
    pub retrieval: Arc<dyn RetrievalService>,
    pub llm: Arc<dyn CompletionService>,
    pub assembler: ContextAssembler,
    pub retrieval_k: usize,
    /// `None` keeps the unlocked load-modify-save behaviour.
    pub session_locks: Option<SessionLocks>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        snapshots: Arc<dyn SnapshotReader>,
        retrieval: Arc<dyn RetrievalService>,
        llm: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            store,
            snapshots,
            retrieval,
            llm,
            assembler: ContextAssembler::new(),
            retrieval_k: DEFAULT_RETRIEVAL_K,
            session_locks: None,
        }
    }

    pub fn with_retrieval_k(mut self, retrieval_k: usize) -> Self {
        self.retrieval_k = retrieval_k;
        self
    }

    pub fn with_session_locks(mut self) -> Self {
        self.session_locks = Some(SessionLocks::new());
        self
    }

    pub async fn from_config(config: &ServerConfig) -> io::Result<Self> {
        let sessions_dir = config.sessions_dir();
        log::info!("Initializing session storage at: {:?}", sessions_dir);
        let store = JsonSessionStore::new(&sessions_dir);
        store.init().await?;

        let knowledge_dir = config.knowledge_dir();
        let knowledge = match KnowledgeBase::load(&knowledge_dir).await {
            Ok(knowledge) => knowledge,
            Err(e) => {
                log::error!("Failed to index knowledge at {:?}: {}", knowledge_dir, e);
                KnowledgeBase::default()
            }
        };

        if config.api_key.is_none() {
            log::warn!("No LLM API key configured; chat replies will report the missing key");
        }
        let llm = OpenAIProvider::new(config.api_key.clone())
            .with_base_url(config.llm_base_url.clone())
            .with_model(config.model.clone())
            .with_system_role(config.system_role.clone());
        log::info!(
            "Using completion endpoint {} with model {}",
            config.llm_base_url,
            llm.model()
        );

        let state = Self::new(
            Arc::new(store),
            Arc::new(FileSnapshotReader::new(&config.data_dir)),
            Arc::new(knowledge),
            Arc::new(llm),
        )
        .with_retrieval_k(config.retrieval_k);

        Ok(if config.serialize_sessions {
            log::info!("Per-session locking enabled");
            state.with_session_locks()
        } else {
            state
        })
    }
}

pub mod keyword;

use async_trait::async_trait;

pub use keyword::{KnowledgeBase, KnowledgeDocument};

/// Documentation lookup used to ground chat prompts.
#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Up to `k` documents, most relevant first. Failures yield an empty list.
    async fn retrieve(&self, query: &str, k: usize) -> Vec<String>;
}

/// Retrieval that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRetrieval;

#[async_trait]
impl RetrievalService for NoRetrieval {
    async fn retrieve(&self, _query: &str, _k: usize) -> Vec<String> {
        Vec::new()
    }
}

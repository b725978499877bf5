pub mod error;
pub mod openai;
pub mod provider;
pub mod retrieval;

pub use error::LLMError;
pub use openai::OpenAIProvider;
pub use provider::{CompletionOutcome, CompletionService};
pub use retrieval::{KnowledgeBase, KnowledgeDocument, NoRetrieval, RetrievalService};

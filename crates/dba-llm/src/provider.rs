use async_trait::async_trait;

/// What came back from the completion service.
///
/// Upstream failures carry a human-readable description so the caller can
/// still answer the user, but they stay distinguishable from real replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Reply(String),
    UpstreamFailure(String),
}

impl CompletionOutcome {
    pub fn text(&self) -> &str {
        match self {
            CompletionOutcome::Reply(text) | CompletionOutcome::UpstreamFailure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            CompletionOutcome::Reply(text) | CompletionOutcome::UpstreamFailure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CompletionOutcome::UpstreamFailure(_))
    }
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generate a reply for a fully assembled prompt. Never fails; see [`CompletionOutcome`].
    async fn generate(&self, prompt: &str) -> CompletionOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_text_is_shared_by_both_variants() {
        let reply = CompletionOutcome::Reply("Use a composite index.".to_string());
        let failure = CompletionOutcome::UpstreamFailure("timeout".to_string());

        assert_eq!(reply.text(), "Use a composite index.");
        assert!(!reply.is_failure());
        assert_eq!(failure.clone().into_text(), "timeout");
        assert!(failure.is_failure());
    }
}

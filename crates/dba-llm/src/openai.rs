use crate::error::{LLMError, Result};
use crate::provider::{CompletionOutcome, CompletionService};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_SYSTEM_ROLE: &str = "You are a helpful assistant.";

/// Non-streaming client for OpenAI-compatible `chat/completions` endpoints.
pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    system_role: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_role: DEFAULT_SYSTEM_ROLE.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_role(mut self, system_role: impl Into<String>) -> Self {
        self.system_role = system_role.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LLMError::Auth("no API key configured".to_string()))?;

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": self.system_role},
                {"role": "user", "content": prompt},
            ],
            "stream": false,
        });

        log::debug!(
            "Sending completion request to {} (model: {}, prompt: {} chars)",
            self.base_url,
            self.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(LLMError::Api(format!("HTTP {}: {}", status, text)));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LLMError::EmptyResponse)
    }
}

#[async_trait]
impl CompletionService for OpenAIProvider {
    async fn generate(&self, prompt: &str) -> CompletionOutcome {
        match self.complete(prompt).await {
            Ok(reply) => CompletionOutcome::Reply(reply),
            Err(error) => {
                log::error!("Completion request failed: {}", error);
                CompletionOutcome::UpstreamFailure(format!("Completion service error: {}", error))
            }
        }
    }
}

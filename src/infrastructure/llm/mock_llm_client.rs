use crate::application::ports::{CompletionRequest, LlmClient, LlmClientError};

/// Echoes a canned reply; used when no LLM key is configured locally.
pub struct MockLlmClient;

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmClientError> {
        Ok(format!(
            "Mock enhancement ({} chars of input)",
            request.user_prompt.len()
        ))
    }
}

//! Chat session over an OpenAI-compatible endpoint.

use super::types::{ChatMessage, ChatRequest, parse_chat_response};
use crate::providers::ProviderKind;
use crate::tools::http::truncate;
use async_trait::async_trait;
use roundtable_application::ports::llm_gateway::{GatewayError, LlmSession};
use roundtable_domain::Model;
use tokio::sync::Mutex;
use tracing::debug;

pub struct OpenAiCompatSession {
    client: reqwest::Client,
    kind: ProviderKind,
    endpoint: String,
    api_key: String,
    model: Model,
    max_tokens: u32,
    /// Conversation history, resent in full on every call
    messages: Mutex<Vec<ChatMessage>>,
}

impl OpenAiCompatSession {
    pub(crate) fn new(
        client: reqwest::Client,
        kind: ProviderKind,
        endpoint: String,
        api_key: String,
        model: Model,
        max_tokens: u32,
        system_prompt: Option<&str>,
    ) -> Self {
        let messages = system_prompt
            .filter(|p| !p.trim().is_empty())
            .map(|p| vec![ChatMessage::system(p)])
            .unwrap_or_default();
        Self {
            client,
            kind,
            endpoint,
            api_key,
            model,
            max_tokens,
            messages: Mutex::new(messages),
        }
    }

    fn request<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatRequest<'a> {
        let (max_tokens, max_completion_tokens) = match self.kind {
            ProviderKind::OpenAi => (None, Some(self.max_tokens)),
            _ => (Some(self.max_tokens), None),
        };
        ChatRequest {
            model: self.model.as_str(),
            messages,
            max_tokens,
            max_completion_tokens,
        }
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        debug!(
            provider = %self.kind,
            model = %self.model,
            messages = messages.len(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(messages))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else if e.is_connect() {
                    GatewayError::ConnectionError(format!("{}: {}", self.endpoint, e))
                } else {
                    GatewayError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("Failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "{} API error {}: {}",
                self.kind,
                status,
                truncate(&body, 500)
            )));
        }

        parse_chat_response(&body)
    }
}

#[async_trait]
impl LlmSession for OpenAiCompatSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let mut messages = self.messages.lock().await;
        messages.push(ChatMessage::user(content));

        match self.complete(&messages).await {
            Ok(reply) => {
                messages.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                // A failed exchange must not leave a dangling user message
                messages.pop();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(kind: ProviderKind, endpoint: &str) -> OpenAiCompatSession {
        OpenAiCompatSession::new(
            reqwest::Client::new(),
            kind,
            endpoint.to_string(),
            "sk-test".to_string(),
            Model::O3Mini,
            2048,
            Some("You are Agent 3."),
        )
    }

    #[test]
    fn test_openai_uses_completion_token_limit() {
        let s = session(ProviderKind::OpenAi, "http://localhost");
        let json = serde_json::to_value(s.request(&[])).unwrap();
        assert_eq!(json["max_completion_tokens"], 2048);
        assert!(json.get("max_tokens").is_none());

        let s = session(ProviderKind::DeepSeek, "http://localhost");
        let json = serde_json::to_value(s.request(&[])).unwrap();
        assert_eq!(json["max_tokens"], 2048);
    }

    #[tokio::test]
    async fn test_failed_send_keeps_history_clean() {
        // Nothing listens on port 1
        let s = session(ProviderKind::DeepSeek, "http://127.0.0.1:1/chat/completions");
        let err = s.send("Describe your word.").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::ConnectionError(_) | GatewayError::RequestFailed(_)
        ));

        let messages = s.messages.lock().await;
        assert_eq!(*messages, vec![ChatMessage::system("You are Agent 3.")]);
    }
}

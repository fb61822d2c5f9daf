use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::errors::{ListingError, Result};
use crate::log;
use crate::wire::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

/// Chat-completions client for the OpenAI HTTP API. One request per call,
/// no retries.
pub struct OpenAiClient {
    model: String,
    api_key: String,
    api_base: String,
    temperature: f32,
    timeout: Duration,
    artifacts_dir: Option<PathBuf>,
    client: Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(cfg: &Config, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ListingError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            model: cfg.model.clone(),
            api_key,
            api_base: cfg.api_base.clone(),
            temperature: cfg.temperature,
            timeout: Duration::from_secs(cfg.timeout_secs),
            artifacts_dir: cfg.save_exchanges.then(|| PathBuf::from(&cfg.data_dir)),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl super::CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: self.temperature,
            response_format: ResponseFormat::json_object(),
        };

        let url = self.endpoint();
        tracing::debug!(%url, model = %self.model, "sending chat completion request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ListingError::Completion(format!("request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ListingError::Completion(format!("failed to read response body: {e}")))?;

        tracing::debug!(%status, bytes = text.len(), "chat completion response received");

        if let Some(dir) = &self.artifacts_dir {
            // Debug artifacts are best effort.
            if let Err(e) = log::save_exchange(dir, &body, &text) {
                tracing::warn!(error = %e, "could not save exchange artifacts");
            }
        }

        if !status.is_success() {
            return Err(ListingError::Completion(format!("API error ({status}): {text}")));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ListingError::Completion(format!("malformed API response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ListingError::Completion("API response contained no message content".into()))
    }
}

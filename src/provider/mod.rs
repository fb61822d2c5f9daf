use async_trait::async_trait;

use crate::config::Config;
use crate::errors::Result;
use crate::prompt::{GENERATION_SYSTEM_PROMPT, REWRITE_SYSTEM_PROMPT};
use crate::wire::{self, ListingOutputs, OutputField};

pub mod openai;

/// A chat-completion backend. Implementors only move text; the provided
/// methods own the system instructions and the response shape checks.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one system + user exchange in JSON-object mode and returns the
    /// raw message content.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    async fn generate(&self, prompt: &str) -> Result<ListingOutputs> {
        let content = self.complete(GENERATION_SYSTEM_PROMPT, prompt).await?;
        wire::parse_outputs(&content)
    }

    async fn rewrite(&self, field: OutputField, prompt: &str) -> Result<String> {
        let content = self.complete(REWRITE_SYSTEM_PROMPT, prompt).await?;
        wire::parse_rewrite(field, &content)
    }
}

pub type DynClient = Box<dyn CompletionClient>;

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Box<T> {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        (**self).complete(system, user).await
    }
}

pub fn make_client(cfg: &Config) -> Result<DynClient> {
    let api_key = cfg.api_key()?;
    Ok(Box::new(openai::OpenAiClient::new(cfg, api_key)?))
}

// src/llm/mod.rs
//! Language-model capability: submit a system and user prompt, get back the
//! raw JSON text the model produced.

pub mod openai_client;

pub use openai_client::OpenAiClient;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{0} not configured")]
    MissingCredentials(&'static str),

    #[error("language model rejected credentials (status {status})")]
    Unauthorized { status: u16 },

    #[error("language model request failed: {0}")]
    Request(String),

    #[error("language model returned error {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub json_mode: bool,
}

impl CompletionRequest {
    pub fn json(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
            json_mode: true,
        }
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// `Ok(None)` when the model answered without any content.
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, LlmError>;
}

pub mod client;
pub mod openai;
pub mod prompts;
pub mod validation;

use std::future::Future;

use anyhow::Result;

use crate::config::{LlmConfig, LlmProvider};

pub use client::*;
pub use openai::*;
pub use prompts::*;
pub use validation::*;

/// A model that answers a prompt with a single JSON object
pub trait LanguageModel {
    fn generate(&self, system: &str, user: &str) -> impl Future<Output = Result<serde_json::Value>>;
}

/// The configured provider's client
pub enum ModelClient {
    Anthropic(AnthropicClient),
    OpenAi(OpenAiClient),
}

impl ModelClient {
    pub fn from_config(llm: &LlmConfig) -> Result<Self> {
        Ok(match llm.provider {
            LlmProvider::Anthropic => Self::Anthropic(AnthropicClient::new(
                AnthropicConfig::from_env(llm)?,
            )),
            LlmProvider::OpenAi => Self::OpenAi(OpenAiClient::from_env(llm)?),
        })
    }
}

impl LanguageModel for ModelClient {
    async fn generate(&self, system: &str, user: &str) -> Result<serde_json::Value> {
        match self {
            Self::Anthropic(client) => client.generate(system, user).await,
            Self::OpenAi(client) => client.generate(system, user).await,
        }
    }
}

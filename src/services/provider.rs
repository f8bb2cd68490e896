use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_openai::types::chat::{
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Seam to the external text-generation provider. Everything the engine
/// needs from it is a prompt-in, text-out completion call; callers are
/// expected to catch failures and route to deterministic fallbacks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerationProvider: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32)
        -> AppResult<String>;
}

/// Chat-completion client for any OpenAI-compatible endpoint (the
/// reference deployment points at Groq). Calls are bounded by the
/// configured timeout; a slow provider becomes a provider error, never
/// a hung request.
pub struct ChatCompletionProvider {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl ChatCompletionProvider {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.provider_api_base)
            .with_api_key(config.provider_api_key.expose_secret());

        Self {
            client: Client::with_config(openai_config),
            model: config.provider_model.clone(),
            timeout: config.provider_timeout,
        }
    }
}

#[async_trait]
impl TextGenerationProvider for ChatCompletionProvider {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> AppResult<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| AppError::ProviderError(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([message.into()])
            .max_tokens(max_tokens)
            .temperature(temperature)
            .build()
            .map_err(|e| AppError::ProviderError(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                AppError::ProviderError(format!(
                    "provider call timed out after {:?}",
                    self.timeout
                ))
            })?
            .map_err(|e| AppError::ProviderError(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AppError::ProviderError(
                "provider returned an empty completion".to_string(),
            ));
        }

        Ok(content)
    }
}

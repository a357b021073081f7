// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use crate::llm::provider::{CompletionOptions, CompletionResponse, LLMProvider, Message, Pricing};
use crate::llm::providers::chat_api::{self, ChatRequest, ChatResponse};
use crate::utils::error::LintsmithError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MAX_TOKENS: usize = 4096;

/// OpenRouter LLM provider for accessing multiple models via a unified API.
///
/// Uses the OpenAI-compatible `/chat/completions` endpoint with a
/// 120-second request timeout. A 429 response becomes
/// [`LintsmithError::RateLimited`] so the client can back off.
///
/// # Examples
///
/// ```no_run
/// use lintsmith::llm::providers::openrouter::OpenRouterProvider;
///
/// let provider = OpenRouterProvider::new(
///     "your-api-key".to_string(),
///     "openai/gpt-4o".to_string(),
/// ).expect("Failed to create provider");
/// ```
pub struct OpenRouterProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider with the given API key and model.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: String, model: String) -> Result<Self, LintsmithError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LintsmithError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            api_key,
            model,
            base_url: OPENROUTER_BASE_URL.to_string(),
            client,
        })
    }

    /// Creates a provider reading the `OPENROUTER_API_KEY` environment variable.
    pub fn from_env(model: String) -> Result<Self, LintsmithError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| LintsmithError::missing_api_key("openrouter"))?;
        Self::new(api_key, model)
    }

    /// Point the provider at a different API root (trailing slash optional).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LLMProvider for OpenRouterProvider {
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LintsmithError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: chat_api::to_chat_messages(messages),
            max_tokens: Some(options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Title", "lintsmith")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(LintsmithError::RateLimited {
                provider: "openrouter".to_string(),
                retry_after,
            });
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(chat_api::error_from_body("openrouter", status, &error_text));
        }

        let body: ChatResponse = response.json().await?;
        chat_api::into_completion("openrouter", body)
    }

    fn name(&self) -> &str {
        "openrouter"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn pricing(&self) -> Pricing {
        // Per-model prices would need the models endpoint; not tracked yet.
        Pricing::FREE
    }
}

// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use crate::llm::provider::{CompletionOptions, CompletionResponse, LLMProvider, Message, Pricing};
use crate::llm::providers::chat_api::{self, ChatRequest, ChatResponse};
use crate::utils::error::LintsmithError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Local Ollama server, addressed through its OpenAI-compatible endpoint.
///
/// Local inference is slow on large models, so the request timeout is
/// longer than for cloud providers.
pub struct OllamaProvider {
    host: String,
    model: String,
    client: Client,
}

impl OllamaProvider {
    pub fn new(host: String, model: String) -> Result<Self, LintsmithError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .map_err(|e| LintsmithError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            model,
            client,
        })
    }

    /// Host from `OLLAMA_HOST`, falling back to `configured`, then localhost.
    pub fn from_env(configured: Option<&str>, model: String) -> Result<Self, LintsmithError> {
        let host = std::env::var("OLLAMA_HOST")
            .ok()
            .or_else(|| configured.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string());
        Self::new(host, model)
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LintsmithError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: chat_api::to_chat_messages(messages),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.host))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LintsmithError::Provider {
                provider: "ollama".to_string(),
                message: format!(
                    "model '{}' not found; run `ollama pull {}`",
                    self.model, self.model
                ),
            });
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(chat_api::error_from_body("ollama", status, &error_text));
        }

        let body: ChatResponse = response.json().await?;
        chat_api::into_completion("ollama", body)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn pricing(&self) -> Pricing {
        Pricing::FREE
    }
}

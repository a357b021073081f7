// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use crate::llm::provider::{CompletionOptions, CompletionResponse, LLMProvider, Message, Pricing};
use crate::utils::error::LintsmithError;
use std::time::Duration;

/// Configuration for retry behavior on transient failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 30000,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (0-indexed).
    ///
    /// Exponential in `retry`, capped at `max_delay_ms`. A server-provided
    /// `retry_after` replaces the computed value but is still capped.
    pub fn delay_for(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let max = Duration::from_millis(self.max_delay_ms);
        if let Some(after) = retry_after {
            return after.min(max);
        }
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        let millis = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(millis).min(max)
    }
}

pub struct LLMClient {
    provider: Box<dyn LLMProvider>,
    retry_config: RetryConfig,
}

impl LLMClient {
    pub fn new(provider: Box<dyn LLMProvider>) -> Self {
        Self {
            provider,
            retry_config: RetryConfig::default(),
        }
    }

    /// Create a new LLMClient with custom retry configuration.
    pub fn with_retry_config(provider: Box<dyn LLMProvider>, retry_config: RetryConfig) -> Self {
        Self {
            provider,
            retry_config,
        }
    }

    /// Complete a prompt using the configured LLM provider.
    ///
    /// Rate-limit and network errors are retried with exponential backoff
    /// up to `max_retries` times. Every other error is returned on first
    /// occurrence.
    pub async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LintsmithError> {
        let mut retry = 0;
        loop {
            match self.provider.complete(messages, options).await {
                Ok(response) => {
                    tracing::debug!(
                        provider = self.provider.name(),
                        model = self.provider.model(),
                        prompt_tokens = response.prompt_tokens,
                        completion_tokens = response.completion_tokens,
                        cost_usd = self
                            .pricing()
                            .calculate_cost(response.prompt_tokens, response.completion_tokens),
                        "LLM completion finished"
                    );
                    return Ok(response);
                }
                Err(err) if err.is_transient() && retry < self.retry_config.max_retries => {
                    let retry_after = match &err {
                        LintsmithError::RateLimited { retry_after, .. } => *retry_after,
                        _ => None,
                    };
                    let delay = self.retry_config.delay_for(retry, retry_after);
                    retry += 1;
                    tracing::warn!(
                        "{} (retry {}/{} in {:?})",
                        err,
                        retry,
                        self.retry_config.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Get the provider name.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Get the model name from the provider.
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Per-token pricing of the underlying provider.
    pub fn pricing(&self) -> Pricing {
        self.provider.pricing()
    }

    /// Get the retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }
}

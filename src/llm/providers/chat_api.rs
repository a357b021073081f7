// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! Wire types for the OpenAI-compatible chat completions API.
//!
//! OpenRouter and Ollama (`/v1/chat/completions`) both speak this dialect.

use crate::llm::provider::{CompletionResponse, Message};
use crate::utils::error::LintsmithError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatError {
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub message: Option<String>,
    pub code: Option<serde_json::Value>,
}

pub(crate) fn to_chat_messages(messages: &[Message]) -> Vec<ChatMessage<'_>> {
    messages
        .iter()
        .map(|m| ChatMessage {
            role: &m.role,
            content: &m.content,
        })
        .collect()
}

/// Convert a successful response body into a `CompletionResponse`.
///
/// An empty `choices` array is a provider error, not an empty completion.
pub(crate) fn into_completion(
    provider: &str,
    body: ChatResponse,
) -> Result<CompletionResponse, LintsmithError> {
    let (prompt_tokens, completion_tokens) = body
        .usage
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or((0, 0));

    let content = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LintsmithError::Provider {
            provider: provider.to_string(),
            message: "Response contained no choices".to_string(),
        })?
        .message
        .content
        .unwrap_or_default();

    Ok(CompletionResponse::new(
        content,
        prompt_tokens,
        completion_tokens,
    ))
}

/// Build a provider error from a non-success HTTP body.
pub(crate) fn error_from_body(
    provider: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> LintsmithError {
    if let Ok(ChatError {
        error: Some(detail),
    }) = serde_json::from_str::<ChatError>(body)
    {
        let error_type = detail
            .error_type
            .or_else(|| detail.code.map(|c| c.to_string()))
            .unwrap_or_else(|| "unknown".to_string());
        let message = detail
            .message
            .unwrap_or_else(|| "Unknown error".to_string());
        return LintsmithError::Provider {
            provider: provider.to_string(),
            message: format!("{}: {}", error_type, message),
        };
    }

    LintsmithError::Provider {
        provider: provider.to_string(),
        message: format!("HTTP {}: {}", status, body),
    }
}

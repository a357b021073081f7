// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! Example and rule generation.
//!
//! This module provides:
//! - The data model shared with the workflow (rule names, example sets, rule sources)
//! - Prompt templates for both generation steps
//! - The [`Generator`] seam and its LLM-backed implementation

pub mod prompts;
pub mod rules;

pub use rules::{
    CodeExamples, EXAMPLES_PER_KIND, ExampleSet, RuleName, RuleSource, RuleSpec,
    parse_examples_response, parse_rule_response,
};

use crate::llm::client::LLMClient;
use crate::llm::provider::{CompletionOptions, Message};
use crate::utils::error::LintsmithError;
use async_trait::async_trait;

/// What the rule generator is told when a previous candidate failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryFeedback {
    /// 1-indexed number of the attempt that failed.
    pub attempt: u32,
    pub previous_source: Option<String>,
    pub last_error: String,
}

/// The two generation calls the workflow depends on.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a rule name and an [`ExampleSet`] for the description.
    ///
    /// Implementations handle malformed output themselves; an error here
    /// means the step could not be completed.
    async fn generate_examples(&self, spec: &RuleSpec) -> Result<CodeExamples, LintsmithError>;

    /// Produce a candidate implementation for the description.
    async fn implement_rule(
        &self,
        spec: &RuleSpec,
        feedback: Option<&RetryFeedback>,
    ) -> Result<RuleSource, LintsmithError>;
}

/// [`Generator`] backed by two LLM clients, one per step.
pub struct LlmGenerator {
    examples_client: LLMClient,
    rule_client: LLMClient,
    shape_retries: u32,
}

impl LlmGenerator {
    /// `shape_retries` is how many times each step may re-ask after a reply
    /// that does not parse, so a step sends at most `shape_retries + 1`
    /// requests. Zero disables re-asking.
    pub fn new(examples_client: LLMClient, rule_client: LLMClient, shape_retries: u32) -> Self {
        Self {
            examples_client,
            rule_client,
            shape_retries,
        }
    }

    /// Ask `client` until `parse` accepts the reply.
    ///
    /// A rejected reply is appended to the conversation along with the
    /// parse error. Provider errors end the loop immediately.
    async fn ask_until_parsed<T>(
        &self,
        client: &LLMClient,
        step: &str,
        mut messages: Vec<Message>,
        options: &CompletionOptions,
        parse: impl Fn(&str) -> Result<T, LintsmithError>,
    ) -> Result<T, LintsmithError> {
        let mut reask = 0;
        loop {
            let response = client.complete(&messages, options).await?;
            let err = match parse(&response.content) {
                Ok(parsed) => return Ok(parsed),
                Err(err) => err,
            };
            tracing::warn!(
                step,
                reask,
                max = self.shape_retries,
                "Rejected malformed generator output: {}",
                err
            );
            if reask == self.shape_retries {
                return Err(err);
            }
            reask += 1;
            messages.push(Message {
                role: "assistant".to_string(),
                content: response.content,
            });
            messages.push(Message::user(prompts::build_shape_retry_note(
                &err.to_string(),
            )));
        }
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate_examples(&self, spec: &RuleSpec) -> Result<CodeExamples, LintsmithError> {
        let messages = vec![
            Message::system(prompts::EXAMPLES_SYSTEM),
            Message::user(prompts::build_examples_prompt(&spec.description)),
        ];
        self.ask_until_parsed(
            &self.examples_client,
            "examples",
            messages,
            &CompletionOptions::default(),
            parse_examples_response,
        )
        .await
    }

    async fn implement_rule(
        &self,
        spec: &RuleSpec,
        feedback: Option<&RetryFeedback>,
    ) -> Result<RuleSource, LintsmithError> {
        let attempt = feedback.map_or(1, |f| f.attempt + 1);
        let messages = vec![
            Message::system(prompts::RULE_SYSTEM),
            Message::user(prompts::build_rule_prompt(&spec.description, feedback)),
        ];
        let options = CompletionOptions {
            temperature: prompts::retry_temperature(attempt),
            ..CompletionOptions::default()
        };
        self.ask_until_parsed(
            &self.rule_client,
            "rule",
            messages,
            &options,
            parse_rule_response,
        )
        .await
    }
}

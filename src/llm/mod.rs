// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

pub mod client;
pub mod provider;
pub mod providers;

pub use client::{LLMClient, RetryConfig};
pub use provider::{CompletionOptions, CompletionResponse, LLMProvider, Message, Pricing};

// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

#[cfg(any(feature = "openrouter", feature = "ollama"))]
pub(crate) mod chat_api;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openrouter")]
pub mod openrouter;

use crate::cli::config::ProvidersConfig;
use crate::llm::provider::LLMProvider;
use crate::utils::error::LintsmithError;

/// Providers compiled into this build.
pub const AVAILABLE_PROVIDERS: &[&str] = &[
    #[cfg(feature = "openrouter")]
    "openrouter",
    #[cfg(feature = "ollama")]
    "ollama",
];

/// Construct the provider named `name` serving `model`.
///
/// # Errors
///
/// Returns a validation error for unknown or disabled providers, and for
/// missing API keys.
pub fn build_provider(
    name: &str,
    model: &str,
    providers: &ProvidersConfig,
) -> Result<Box<dyn LLMProvider>, LintsmithError> {
    // Silences unused warnings when every provider feature is off.
    let _ = (model, providers);

    match name {
        #[cfg(feature = "openrouter")]
        "openrouter" => {
            let mut provider = openrouter::OpenRouterProvider::from_env(model.to_string())?;
            if let Some(base_url) = providers
                .openrouter
                .as_ref()
                .and_then(|c| c.base_url.as_deref())
            {
                provider = provider.with_base_url(base_url);
            }
            Ok(Box::new(provider))
        }
        #[cfg(feature = "ollama")]
        "ollama" => {
            let host = providers.ollama.as_ref().and_then(|c| c.host.as_deref());
            Ok(Box::new(ollama::OllamaProvider::from_env(
                host,
                model.to_string(),
            )?))
        }
        other => Err(LintsmithError::invalid_provider(other)),
    }
}

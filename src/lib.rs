//! # lintsmith
//!
//! lintsmith turns a plain-language description into a custom ESLint rule that
//! has been checked against examples before it is handed over.
//!
//! ## Workflow
//!
//! 1. **Generating examples**: an LLM names the rule and writes three snippets
//!    that must be flagged and three that must not.
//! 2. **Implementing the rule**: a second LLM call writes the rule module.
//! 3. **Validating**: the candidate is written to a scratch file and every
//!    example is run through ESLint with it loaded.
//!
//! A failing implementation is retried with the previous source and the
//! failure reason as feedback. A positive example that is not flagged sends
//! the run back to example generation. Both loops are bounded, and every path
//! ends in exactly one [`workflow::WorkflowOutcome`].
//!
//! ## Configuration
//!
//! The `MergedConfig` struct is the resolved configuration after combining
//! CLI flags, environment variables and config files. See [`cli::config`]
//! for precedence rules.

pub mod checker;
pub mod cli;
pub mod generator;
pub mod llm;
pub mod mcp;
pub mod output;
pub mod utils;
pub mod workflow;

use anyhow::{Context, Result};
use checker::{EslintChecker, EslintSettings};
use cli::config::ProvidersConfig;
use generator::LlmGenerator;
use llm::client::LLMClient;
use output::ArtifactStore;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use utils::error::LintsmithError;
use utils::progress::PhaseSpinner;
use workflow::{Limits, RuleWorkflow, WorkflowOutcome, WorkflowSettings};

/// Final merged configuration from CLI args, environment and config files.
#[derive(Debug, Clone, Serialize)]
pub struct MergedConfig {
    #[serde(skip)]
    pub description: Option<String>,
    pub provider: String,
    pub examples_model: String,
    pub rule_model: String,
    pub max_attempts: u32,
    pub max_example_rounds: u32,
    pub step_timeout_secs: u64,
    pub shape_retries: u32,
    pub generated_dir: PathBuf,
    pub rules_dir: PathBuf,
    pub scratch_file: String,
    pub checker: EslintSettings,
    pub providers: ProvidersConfig,
    #[serde(skip)]
    pub dry_run: bool,
    #[serde(skip)]
    pub verbose: u8,
    #[serde(skip)]
    pub quiet: bool,
}

impl MergedConfig {
    /// Retry bounds. `max_attempts` must be 1 to 5; `max_example_rounds` at least 1.
    pub fn limits(&self) -> Result<Limits, LintsmithError> {
        let attempts = u64::from(self.max_attempts);
        if !(1..=u64::from(Limits::MAX_ATTEMPTS)).contains(&attempts) {
            return Err(LintsmithError::invalid_limit(
                "max_attempts",
                attempts,
                1..=u64::from(Limits::MAX_ATTEMPTS),
            ));
        }
        if self.max_example_rounds == 0 {
            return Err(LintsmithError::invalid_limit(
                "max_example_rounds",
                u64::from(self.max_example_rounds),
                1..=u64::MAX,
            ));
        }
        Ok(Limits {
            max_attempts: self.max_attempts,
            max_example_rounds: self.max_example_rounds,
        })
    }

    pub fn workflow_settings(&self) -> Result<WorkflowSettings, LintsmithError> {
        let limits = self.limits()?;
        if self.step_timeout_secs == 0 {
            return Err(LintsmithError::invalid_limit(
                "step_timeout_secs",
                self.step_timeout_secs,
                1..=u64::MAX,
            ));
        }
        Ok(WorkflowSettings {
            limits,
            step_timeout: Duration::from_secs(self.step_timeout_secs),
        })
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise verbosity picks the level. Logs go to
/// stderr so stdout only carries the final message.
pub fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lintsmith={}", default_level)));

    // Ignore the error when a subscriber is already installed (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run one rule request.
///
/// Returns `None` for a dry run. Setup problems (unknown provider, missing
/// API key, unusable checker) are errors; anything that happens once the
/// workflow has started is reported through the outcome.
pub async fn run(config: MergedConfig) -> Result<Option<WorkflowOutcome>> {
    tracing::info!("lintsmith v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Configuration: provider={}, examples_model={}, rule_model={}, max_attempts={}, max_example_rounds={}",
        config.provider,
        config.examples_model,
        config.rule_model,
        config.max_attempts,
        config.max_example_rounds
    );

    config
        .workflow_settings()
        .context("Invalid workflow configuration")?;

    if config.dry_run {
        utils::dry_run::display_dry_run(&config)?;
        return Ok(None);
    }

    let description = config
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| LintsmithError::Config("a rule description is required".to_string()))?;

    let outcome = create_rule(&config, description, PhaseSpinner::new(config.quiet)).await?;
    Ok(Some(outcome))
}

/// Build the providers, checker and store from `config` and run the
/// workflow once for `description`.
pub async fn create_rule(
    config: &MergedConfig,
    description: &str,
    spinner: PhaseSpinner,
) -> Result<WorkflowOutcome> {
    let settings = config
        .workflow_settings()
        .context("Invalid workflow configuration")?;

    let examples_provider =
        llm::providers::build_provider(&config.provider, &config.examples_model, &config.providers)
            .context("Failed to set up the examples model")?;
    let rule_provider =
        llm::providers::build_provider(&config.provider, &config.rule_model, &config.providers)
            .context("Failed to set up the rule model")?;

    let generator = LlmGenerator::new(
        LLMClient::new(examples_provider),
        LLMClient::new(rule_provider),
        config.shape_retries,
    );

    let checker = EslintChecker::new(config.checker.clone());
    checker.probe().await.context("ESLint checker unusable")?;

    let store = ArtifactStore::new(
        config.generated_dir.clone(),
        config.rules_dir.clone(),
        config.scratch_file.clone(),
    );

    Ok(RuleWorkflow::new(generator, checker, store, settings)
        .with_spinner(spinner)
        .run(description)
        .await)
}

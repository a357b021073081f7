// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management using the `config` crate for hierarchical discovery and merging.
//!
//! ## Configuration Sources (in precedence order, highest to lowest):
//! 1. **CLI flags** - applied by [`merge_config`]
//! 2. **Environment variables** - `LINTSMITH_<SECTION>__<KEY>`, e.g. `LINTSMITH_WORKFLOW__MAX_ATTEMPTS=3`
//! 3. **Config files** - lowest precedence
//!
//! ## Config File Discovery (in merge order, later overrides earlier):
//! 1. `~/.config/lintsmith/config.toml`
//! 2. `lintsmith.toml` in the git repository root
//! 3. `./lintsmith.toml`
//! 4. Explicit `--config` path
//!
//! ## Example
//!
//! ```toml
//! [general]
//! provider = "openrouter"
//!
//! [models]
//! examples = "openai/gpt-4o"
//! rule = "openai/o4-mini"
//!
//! [workflow]
//! max_attempts = 5
//!
//! [checker]
//! working_dir = "frontend"
//! ```

use crate::MergedConfig;
use crate::checker::EslintSettings;
use crate::cli::args::Args;
use crate::utils::error::LintsmithError;
use crate::workflow::Limits;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "lintsmith.toml";

/// Root configuration structure loaded from config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub checker: EslintSettings,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
        }
    }
}

fn default_provider() -> String {
    "openrouter".to_string()
}

/// One model per generation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub examples: String,
    pub rule: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            examples: "openai/gpt-4o".to_string(),
            rule: "openai/o4-mini".to_string(),
        }
    }
}

/// Retry budget and timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub max_attempts: u32,
    pub max_example_rounds: u32,
    pub step_timeout_secs: u64,
    /// Re-asks per generator call after malformed output.
    pub shape_retries: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            max_attempts: limits.max_attempts,
            max_example_rounds: limits.max_example_rounds,
            step_timeout_secs: 300,
            shape_retries: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub generated_dir: PathBuf,
    pub rules_dir: PathBuf,
    /// File name of the candidate rule inside `generated_dir`.
    pub scratch_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            generated_dir: PathBuf::from("generated"),
            rules_dir: PathBuf::from("rules"),
            scratch_file: "custom-rule.js".to_string(),
        }
    }
}

/// LLM provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    pub openrouter: Option<OpenRouterConfig>,
    pub ollama: Option<OllamaConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub host: Option<String>,
}

fn discover_config_paths(explicit_path: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(user_config) = get_user_config_path() {
        paths.push(user_config);
    }

    let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);

    let git_root = find_git_root(Path::new(".")).unwrap_or_else(|err| {
        tracing::warn!("Skipping repository config: {}", err);
        None
    });
    if let Some(git_root) = git_root {
        let git_config = git_root.join(CONFIG_FILE_NAME);
        // Skip when the git root is the current directory; it is added below.
        let is_cwd = std::env::current_dir()
            .map(|cwd| cwd == git_root)
            .unwrap_or(false);
        if git_config.exists() && !is_cwd {
            paths.push(git_config);
        }
    }

    if current_dir_config.exists() {
        paths.push(current_dir_config);
    }

    if explicit_path != Path::new(CONFIG_FILE_NAME) && explicit_path.exists() {
        paths.push(explicit_path.to_path_buf());
    }

    paths
}

/// Working directory of the repository containing `start`, if any.
///
/// Not being inside a repository is not an error; a repository that cannot
/// be opened is.
fn find_git_root(start: &Path) -> Result<Option<PathBuf>, LintsmithError> {
    match git2::Repository::discover(start) {
        Ok(repo) => Ok(repo.workdir().map(Path::to_path_buf)),
        Err(err) if err.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join("lintsmith").join("config.toml"))
        .filter(|path| path.exists())
}

/// Load configuration from discovered config files and environment variables.
pub fn load(args: &Args) -> Result<Config> {
    if args.config != Path::new(CONFIG_FILE_NAME) && !args.config.exists() {
        return Err(LintsmithError::Config(format!(
            "Config file not found: {}",
            args.config.display()
        )))
        .context("Failed to load configuration");
    }
    load_from(&discover_config_paths(&args.config))
}

/// Load configuration from explicit files (in merge order) plus the environment.
pub fn load_from(paths: &[PathBuf]) -> Result<Config> {
    let mut builder = config::Config::builder();

    for config_path in paths {
        tracing::debug!("Loading config from {}", config_path.display());
        builder = builder.add_source(config::File::from(config_path.as_path()));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("LINTSMITH")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let settings = builder.build().context("Failed to build configuration")?;

    settings
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Apply explicitly given CLI flags on top of the loaded configuration.
pub fn merge_config(args: &Args, config: Config) -> MergedConfig {
    let Config {
        general,
        models,
        workflow,
        paths,
        checker,
        providers,
    } = config;

    MergedConfig {
        description: args.description.clone(),
        provider: args.provider.clone().unwrap_or(general.provider),
        examples_model: args.examples_model.clone().unwrap_or(models.examples),
        rule_model: args.rule_model.clone().unwrap_or(models.rule),
        max_attempts: args.max_attempts.unwrap_or(workflow.max_attempts),
        max_example_rounds: args
            .max_example_rounds
            .unwrap_or(workflow.max_example_rounds),
        step_timeout_secs: workflow.step_timeout_secs,
        shape_retries: workflow.shape_retries,
        generated_dir: args.generated_dir.clone().unwrap_or(paths.generated_dir),
        rules_dir: args.rules_dir.clone().unwrap_or(paths.rules_dir),
        scratch_file: paths.scratch_file,
        checker,
        providers,
        dry_run: args.dry_run,
        verbose: args.verbose,
        quiet: args.quiet,
    }
}

// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use std::path::PathBuf;

/// CLI argument parsing with environment variable support.
///
/// Flags left unset fall back to config files, then to built-in defaults.
/// Example: `LINTSMITH_PROVIDER=ollama` is overridden by `--provider openrouter`.
#[derive(Parser, Debug, Default)]
#[command(name = "lintsmith")]
#[command(about = "Generate and validate a custom ESLint rule from a plain-language description")]
#[command(version)]
pub struct Args {
    /// What the rule should enforce, in plain language
    pub description: Option<String>,

    /// LLM provider
    #[arg(short, long, env = "LINTSMITH_PROVIDER")]
    pub provider: Option<String>,

    /// Model that writes the test examples
    #[arg(long, env = "LINTSMITH_EXAMPLES_MODEL")]
    pub examples_model: Option<String>,

    /// Model that implements the rule
    #[arg(long, env = "LINTSMITH_RULE_MODEL")]
    pub rule_model: Option<String>,

    /// Config file path
    #[arg(short, long, default_value = "lintsmith.toml", env = "LINTSMITH_CONFIG")]
    pub config: PathBuf,

    /// Directory validated rules are written to
    #[arg(long)]
    pub rules_dir: Option<PathBuf>,

    /// Directory for the scratch rule used during validation
    #[arg(long)]
    pub generated_dir: Option<PathBuf>,

    /// Failed implementation attempts before giving up
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Example sets that may be generated before giving up
    #[arg(long)]
    pub max_example_rounds: Option<u32>,

    /// Serve the create_lint_rule tool over MCP on stdio instead of running once
    #[arg(long, conflicts_with = "dry_run")]
    pub mcp: bool,

    /// Show the resolved configuration without calling the LLM or ESLint
    #[arg(long, env = "LINTSMITH_DRY_RUN")]
    pub dry_run: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print the final result
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! Running candidate rules against example snippets.
//!
//! The [`Checker`] trait keeps the workflow independent of the linter. The
//! production implementation, [`eslint::EslintChecker`], shells out to
//! ESLint once per snippet.

pub mod eslint;

pub use eslint::{EslintChecker, EslintSettings};

use crate::utils::error::LintsmithError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A single problem reported by the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// `None` for parse errors, which are not attributed to a rule.
    #[serde(default)]
    pub rule_id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub severity: u8,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
    #[serde(default)]
    pub fatal: bool,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, "{}:{} ", line, column)?;
        }
        write!(f, "{}", self.message)?;
        if let Some(rule_id) = &self.rule_id {
            write!(f, " ({})", rule_id)?;
        }
        Ok(())
    }
}

/// Lints one snippet with a candidate rule loaded from `rule_path`.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, snippet: &str, rule_path: &Path)
    -> Result<Vec<Violation>, LintsmithError>;
}

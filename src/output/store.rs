// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! Filesystem artifacts of a workflow run.
//!
//! - The scratch rule file the checker loads during validation
//! - The final rule file, named after the generated rule
//! - A backup of any rule file that gets overwritten

use crate::generator::{RuleName, RuleSource};
use crate::utils::error::LintsmithError;
use std::path::{Path, PathBuf};

/// Extension of persisted rule files.
pub const RULE_EXTENSION: &str = "js";

/// Result of persisting a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRule {
    /// Path the rule was written to
    pub path: PathBuf,
    /// Previous version of the file, if one was replaced
    pub backup_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    generated_dir: PathBuf,
    rules_dir: PathBuf,
    scratch_file: String,
}

impl ArtifactStore {
    pub fn new(
        generated_dir: impl Into<PathBuf>,
        rules_dir: impl Into<PathBuf>,
        scratch_file: impl Into<String>,
    ) -> Self {
        Self {
            generated_dir: generated_dir.into(),
            rules_dir: rules_dir.into(),
            scratch_file: scratch_file.into(),
        }
    }

    /// Where the candidate rule lives while it is being validated.
    pub fn scratch_path(&self) -> PathBuf {
        self.generated_dir.join(&self.scratch_file)
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Final location for a rule with the given name.
    pub fn rule_path(&self, name: &RuleName) -> PathBuf {
        self.rules_dir
            .join(format!("{}.{}", name.as_str(), RULE_EXTENSION))
    }

    /// Write the candidate to the scratch location, replacing any previous one.
    pub fn write_scratch(&self, source: &RuleSource) -> Result<PathBuf, LintsmithError> {
        std::fs::create_dir_all(&self.generated_dir)?;
        let path = self.scratch_path();
        std::fs::write(&path, source.as_str())?;
        tracing::debug!("Wrote scratch rule to {}", path.display());
        Ok(path)
    }

    /// Remove the scratch file. Missing files are not an error.
    pub fn delete_scratch(&self) -> Result<(), LintsmithError> {
        let path = self.scratch_path();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed scratch rule {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the validated rule to `<rules_dir>/<name>.js`.
    ///
    /// An existing file is first copied to `<name>.js.bak`.
    pub fn persist_rule(
        &self,
        name: &RuleName,
        source: &RuleSource,
    ) -> Result<PersistedRule, LintsmithError> {
        std::fs::create_dir_all(&self.rules_dir).map_err(|e| {
            LintsmithError::Config(format!(
                "Failed to create directory {}: {}",
                self.rules_dir.display(),
                e
            ))
        })?;

        let path = self.rule_path(name);
        let backup_path = if path.exists() {
            let backup = path.with_extension(format!("{}.bak", RULE_EXTENSION));
            std::fs::copy(&path, &backup)?;
            tracing::info!("Backed up existing rule to {}", backup.display());
            Some(backup)
        } else {
            None
        };

        std::fs::write(&path, source.as_str())?;
        tracing::info!("Wrote rule {} to {}", name, path.display());

        Ok(PersistedRule { path, backup_path })
    }
}

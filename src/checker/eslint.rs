// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use crate::checker::{Checker, Violation};
use crate::utils::error::LintsmithError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// How ESLint is invoked. Deserialized from the `[checker]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EslintSettings {
    /// Executable to run.
    pub program: String,
    /// Arguments placed before the ESLint flags (`["eslint"]` for npx).
    pub program_args: Vec<String>,
    /// Rule id the candidate is registered under, enabled at level 2.
    pub rule_id: String,
    /// Virtual filename for stdin, which decides the parser ESLint picks.
    pub stdin_filename: String,
    /// Values for repeated `--parser-options` flags.
    pub parser_options: Vec<String>,
    /// Pass `--rulesdir <scratch dir>` so ESLint loads the candidate directly.
    pub use_rulesdir: bool,
    /// Directory ESLint runs in; its config registers the candidate plugin.
    pub working_dir: PathBuf,
    /// Upper bound for a single ESLint run.
    pub timeout_secs: u64,
}

impl Default for EslintSettings {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            program_args: vec!["eslint".to_string()],
            rule_id: "example/custom-rule".to_string(),
            stdin_filename: "file.jsx".to_string(),
            parser_options: vec![
                "ecmaVersion:latest".to_string(),
                "sourceType:module".to_string(),
                "ecmaFeatures.jsx:true".to_string(),
            ],
            use_rulesdir: false,
            working_dir: PathBuf::from("."),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EslintFileResult {
    #[serde(default)]
    messages: Vec<Violation>,
}

/// [`Checker`] that pipes each snippet into a fresh ESLint process.
#[derive(Debug, Clone)]
pub struct EslintChecker {
    settings: EslintSettings,
}

impl EslintChecker {
    pub fn new(settings: EslintSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EslintSettings {
        &self.settings
    }

    /// Full argument list for linting stdin with the candidate at `rule_path`.
    pub fn build_args(&self, rule_path: &Path) -> Vec<String> {
        let s = &self.settings;
        let mut args = s.program_args.clone();
        args.push("--stdin".to_string());
        args.push("--stdin-filename".to_string());
        args.push(s.stdin_filename.clone());
        for option in &s.parser_options {
            args.push("--parser-options".to_string());
            args.push(option.clone());
        }
        if s.use_rulesdir {
            if let Some(dir) = rule_path.parent() {
                args.push("--rulesdir".to_string());
                args.push(dir.display().to_string());
            }
        }
        args.push("--rule".to_string());
        args.push(format!("{}: 2", s.rule_id));
        args.push("-f".to_string());
        args.push("json".to_string());
        args
    }

    /// Verify the checker can be started at all.
    ///
    /// Runs `<program> <program_args> --version`. A failure here means the
    /// workflow cannot produce meaningful validation results.
    pub async fn probe(&self) -> Result<String, LintsmithError> {
        let mut command = Command::new(&self.settings.program);
        command
            .args(&self.settings.program_args)
            .arg("--version")
            .current_dir(&self.settings.working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout(), command.output())
            .await
            .map_err(|_| LintsmithError::Timeout {
                operation: format!("{} --version", self.settings.program),
                elapsed: self.timeout(),
            })?
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(LintsmithError::Checker(format!(
                "{} --version exited with {:?}: {}",
                self.settings.program,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs.max(1))
    }

    fn spawn_error(&self, err: std::io::Error) -> LintsmithError {
        if err.kind() == std::io::ErrorKind::NotFound {
            LintsmithError::Checker(format!(
                "checker program '{}' not found",
                self.settings.program
            ))
        } else {
            LintsmithError::Checker(format!(
                "failed to start '{}': {}",
                self.settings.program, err
            ))
        }
    }
}

/// Parse ESLint `-f json` output into the violations of the first file.
pub fn parse_eslint_output(stdout: &str) -> Result<Vec<Violation>, LintsmithError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let results: Vec<EslintFileResult> = serde_json::from_str(trimmed).map_err(|e| {
        LintsmithError::Checker(format!("unexpected ESLint output ({}): {}", e, trimmed))
    })?;
    Ok(results
        .into_iter()
        .next()
        .map(|r| r.messages)
        .unwrap_or_default())
}

#[async_trait]
impl Checker for EslintChecker {
    async fn check(
        &self,
        snippet: &str,
        rule_path: &Path,
    ) -> Result<Vec<Violation>, LintsmithError> {
        let args = self.build_args(rule_path);
        tracing::trace!(program = %self.settings.program, ?args, "Running checker");

        let mut child = Command::new(&self.settings.program)
            .args(&args)
            .current_dir(&self.settings.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(snippet.as_bytes())
                .await
                .map_err(|e| LintsmithError::Checker(format!("failed to write stdin: {}", e)))?;
            // Dropping stdin closes the pipe so ESLint sees EOF.
        }

        let output = tokio::time::timeout(self.timeout(), child.wait_with_output())
            .await
            .map_err(|_| LintsmithError::Timeout {
                operation: "checker run".to_string(),
                elapsed: self.timeout(),
            })?
            .map_err(|e| LintsmithError::Checker(format!("checker run failed: {}", e)))?;

        // ESLint exits 1 when it reports problems; anything else is a failure.
        match output.status.code() {
            Some(0) | Some(1) => {}
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detail = if stderr.trim().is_empty() {
                    String::from_utf8_lossy(&output.stdout).trim().to_string()
                } else {
                    stderr.trim().to_string()
                };
                return Err(LintsmithError::Checker(format!(
                    "exited with status {:?}: {}",
                    code, detail
                )));
            }
        }

        let violations = parse_eslint_output(&String::from_utf8_lossy(&output.stdout))?;
        tracing::debug!(violations = violations.len(), "Checker finished");
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_match_eslint_cli() {
        let checker = EslintChecker::new(EslintSettings::default());
        let args = checker.build_args(Path::new("generated/custom-rule.js"));
        assert_eq!(args[0], "eslint");
        assert!(args.contains(&"--stdin".to_string()));
        assert!(args.contains(&"file.jsx".to_string()));
        assert!(args.contains(&"example/custom-rule: 2".to_string()));
        assert_eq!(
            args.iter().filter(|a| *a == "--parser-options").count(),
            3
        );
        assert!(!args.contains(&"--rulesdir".to_string()));
        assert_eq!(&args[args.len() - 2..], ["-f", "json"]);
    }

    #[test]
    fn test_rulesdir_points_at_scratch_dir() {
        let settings = EslintSettings {
            use_rulesdir: true,
            rule_id: "custom-rule".to_string(),
            ..EslintSettings::default()
        };
        let checker = EslintChecker::new(settings);
        let args = checker.build_args(Path::new("/tmp/work/custom-rule.js"));
        let idx = args
            .iter()
            .position(|a| a == "--rulesdir")
            .expect("rulesdir flag present");
        assert_eq!(args[idx + 1], "/tmp/work");
    }

    #[test]
    fn test_parse_eslint_output() {
        let stdout = r#"[{"filePath": "file.jsx", "messages": [
            {"ruleId": "example/custom-rule", "severity": 2, "message": "No var",
             "line": 1, "column": 1, "nodeType": "VariableDeclaration"}],
            "errorCount": 1}]"#;
        let violations = parse_eslint_output(stdout).expect("should parse");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_id.as_deref(), Some("example/custom-rule"));
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_eslint_output("").expect("empty").is_empty());
        assert!(parse_eslint_output("[]").expect("no files").is_empty());
    }

    #[test]
    fn test_parse_garbage_output() {
        let err = parse_eslint_output("Oops! Something went wrong").expect_err("not json");
        assert!(matches!(err, LintsmithError::Checker(_)));
    }
}

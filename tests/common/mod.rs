//! Common test utilities and fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lintsmith::checker::{Checker, Violation};
use lintsmith::generator::{
    CodeExamples, ExampleSet, Generator, RetryFeedback, RuleName, RuleSource, RuleSpec,
};
use lintsmith::output::ArtifactStore;
use lintsmith::utils::error::LintsmithError;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Marker the fake checker treats as a violation of the generated rule.
pub const VIOLATION_MARKER: &str = "var ";

/// Marker in a rule source that makes the fake checker flag every snippet.
pub const OVERREACHING_MARKER: &str = "// flags everything";

/// Marker in a rule source that makes the fake checker flag nothing.
pub const INERT_MARKER: &str = "// flags nothing";

/// Creates a temporary directory for test fixtures.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Store rooted in `dir` using `generated/custom-rule.js` and `rules/`.
pub fn create_store(dir: &TempDir) -> ArtifactStore {
    ArtifactStore::new(
        dir.path().join("generated"),
        dir.path().join("rules"),
        "custom-rule.js",
    )
}

pub fn rule_name() -> RuleName {
    RuleName::new("no-var-declarations").expect("valid rule name")
}

/// Three `var` snippets and three that use `let`/`const`.
pub fn no_var_examples() -> CodeExamples {
    CodeExamples {
        rule_name: rule_name(),
        examples: ExampleSet::new(
            vec![
                "var a = 1;".to_string(),
                "function f() { var b = 2; }".to_string(),
                "for (var i = 0; i < 3; i++) {}".to_string(),
            ],
            vec![
                "const a = 1;".to_string(),
                "let b = 2;".to_string(),
                "const variance = 3;".to_string(),
            ],
        )
        .expect("valid example set"),
    }
}

pub fn correct_rule() -> RuleSource {
    RuleSource::new(
        r#"module.exports = {
  meta: { type: "suggestion", messages: { noVar: "Use let or const" } },
  create(context) {
    return {
      VariableDeclaration(node) {
        if (node.kind === "var") context.report({ node, messageId: "noVar" });
      },
    };
  },
};"#,
    )
    .expect("valid rule source")
}

pub fn overreaching_rule() -> RuleSource {
    RuleSource::new(format!(
        "{}\nmodule.exports = {{ create(context) {{ return {{ Program(node) {{ context.report({{ node, message: \"x\" }}); }} }}; }} }};",
        OVERREACHING_MARKER
    ))
    .expect("valid rule source")
}

pub fn inert_rule() -> RuleSource {
    RuleSource::new(format!(
        "{}\nmodule.exports = {{ create() {{ return {{}}; }} }};",
        INERT_MARKER
    ))
    .expect("valid rule source")
}

struct GeneratorScript {
    examples: Mutex<VecDeque<Result<CodeExamples, LintsmithError>>>,
    rules: Mutex<VecDeque<Result<RuleSource, LintsmithError>>>,
    example_calls: AtomicUsize,
    rule_calls: AtomicUsize,
    feedback: Mutex<Vec<Option<RetryFeedback>>>,
}

/// Generator that replays scripted results.
///
/// Once a script runs out, the last scripted value is not repeated; the
/// defaults are [`no_var_examples`] and [`correct_rule`].
#[derive(Clone)]
pub struct ScriptedGenerator {
    script: Arc<GeneratorScript>,
}

impl ScriptedGenerator {
    pub fn new(
        examples: Vec<Result<CodeExamples, LintsmithError>>,
        rules: Vec<Result<RuleSource, LintsmithError>>,
    ) -> Self {
        Self {
            script: Arc::new(GeneratorScript {
                examples: Mutex::new(examples.into()),
                rules: Mutex::new(rules.into()),
                example_calls: AtomicUsize::new(0),
                rule_calls: AtomicUsize::new(0),
                feedback: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Always answers with good examples and `rule`.
    pub fn always(rule: RuleSource) -> Self {
        Self::new(Vec::new(), (0..16).map(|_| Ok(rule.clone())).collect())
    }

    pub fn example_calls(&self) -> usize {
        self.script.example_calls.load(Ordering::SeqCst)
    }

    pub fn rule_calls(&self) -> usize {
        self.script.rule_calls.load(Ordering::SeqCst)
    }

    /// Feedback passed to each `implement_rule` call, in order.
    pub fn feedback(&self) -> Vec<Option<RetryFeedback>> {
        self.script.feedback.lock().expect("feedback lock").clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate_examples(&self, _spec: &RuleSpec) -> Result<CodeExamples, LintsmithError> {
        self.script.example_calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .examples
            .lock()
            .expect("examples lock")
            .pop_front()
            .unwrap_or_else(|| Ok(no_var_examples()))
    }

    async fn implement_rule(
        &self,
        _spec: &RuleSpec,
        feedback: Option<&RetryFeedback>,
    ) -> Result<RuleSource, LintsmithError> {
        self.script.rule_calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .feedback
            .lock()
            .expect("feedback lock")
            .push(feedback.cloned());
        self.script
            .rules
            .lock()
            .expect("rules lock")
            .pop_front()
            .unwrap_or_else(|| Ok(correct_rule()))
    }
}

#[derive(Default)]
struct CheckerLog {
    calls: AtomicUsize,
    missing_rule_file: AtomicUsize,
}

/// Checker that reads the candidate rule from disk and decides by marker.
///
/// - rules containing [`OVERREACHING_MARKER`] flag every snippet
/// - rules containing [`INERT_MARKER`] flag nothing
/// - any other rule flags snippets containing [`VIOLATION_MARKER`]
#[derive(Clone, Default)]
pub struct MarkerChecker {
    log: Arc<CheckerLog>,
    broken: bool,
}

impl MarkerChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A checker whose every invocation fails.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }

    /// Invocations where the rule file did not exist.
    pub fn missing_rule_file(&self) -> usize {
        self.log.missing_rule_file.load(Ordering::SeqCst)
    }
}

fn violation(message: &str) -> Violation {
    Violation {
        rule_id: Some("example/custom-rule".to_string()),
        message: message.to_string(),
        severity: 2,
        line: Some(1),
        column: Some(1),
        fatal: false,
    }
}

#[async_trait]
impl Checker for MarkerChecker {
    async fn check(
        &self,
        snippet: &str,
        rule_path: &Path,
    ) -> Result<Vec<Violation>, LintsmithError> {
        self.log.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(LintsmithError::Checker(
                "eslint exited with status 2: Oops! Something went wrong!".to_string(),
            ));
        }

        let Ok(rule) = std::fs::read_to_string(rule_path) else {
            self.log.missing_rule_file.fetch_add(1, Ordering::SeqCst);
            return Err(LintsmithError::Checker(format!(
                "rule file {} not found",
                rule_path.display()
            )));
        };

        let flagged = if rule.contains(OVERREACHING_MARKER) {
            true
        } else if rule.contains(INERT_MARKER) {
            false
        } else {
            snippet.contains(VIOLATION_MARKER)
        };

        Ok(if flagged {
            vec![violation("Use let or const")]
        } else {
            Vec::new()
        })
    }
}

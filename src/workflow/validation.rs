// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use crate::checker::{Checker, Violation};
use crate::generator::ExampleSet;
use crate::workflow::state::Event;
use std::path::Path;

/// Outcome of running every example through the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    /// A positive example was not flagged.
    MissingViolation { snippet: String },
    /// The checker reported a fatal parse error for an example.
    UnparseableExample { snippet: String, message: String },
    /// A negative example was flagged.
    UnexpectedViolations {
        snippet: String,
        violations: Vec<Violation>,
    },
    /// The checker itself failed.
    CheckerError(String),
}

impl From<Verdict> for Event {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Passed => Event::ValidationPassed,
            Verdict::MissingViolation { snippet } => Event::MissingViolation { snippet },
            Verdict::UnparseableExample { snippet, message } => Event::InvalidExample {
                snippet,
                reason: message,
            },
            Verdict::UnexpectedViolations {
                snippet,
                violations,
            } => {
                let details = violations
                    .iter()
                    .map(|v| format!("  - {}", v))
                    .collect::<Vec<_>>()
                    .join("\n");
                Event::ValidationFailed(format!(
                    "Unexpected violation in negative example:\n{}\n{}",
                    snippet.trim(),
                    details
                ))
            }
            Verdict::CheckerError(message) => {
                Event::ValidationFailed(format!("Checker invocation failed: {}", message))
            }
        }
    }
}

fn fatal_message(violations: &[Violation]) -> Option<String> {
    violations
        .iter()
        .find(|v| v.fatal)
        .map(|v| v.message.clone())
}

/// Check positives first, then negatives, stopping at the first failure.
///
/// A fatal violation means the snippet itself did not parse, which says
/// nothing about the rule, so it is reported as a bad example on either side.
pub async fn validate_examples<C: Checker + ?Sized>(
    checker: &C,
    examples: &ExampleSet,
    rule_path: &Path,
) -> Verdict {
    for snippet in examples.positive() {
        let violations = match checker.check(snippet, rule_path).await {
            Ok(violations) => violations,
            Err(e) => return Verdict::CheckerError(e.to_string()),
        };
        if let Some(message) = fatal_message(&violations) {
            tracing::warn!("Positive example does not parse: {}", message);
            return Verdict::UnparseableExample {
                snippet: snippet.clone(),
                message,
            };
        }
        if violations.is_empty() {
            tracing::warn!("Expected a violation, got none:\n{}", snippet);
            return Verdict::MissingViolation {
                snippet: snippet.clone(),
            };
        }
        tracing::debug!(count = violations.len(), "Positive example flagged");
    }

    for snippet in examples.negative() {
        let violations = match checker.check(snippet, rule_path).await {
            Ok(violations) => violations,
            Err(e) => return Verdict::CheckerError(e.to_string()),
        };
        if let Some(message) = fatal_message(&violations) {
            tracing::warn!("Negative example does not parse: {}", message);
            return Verdict::UnparseableExample {
                snippet: snippet.clone(),
                message,
            };
        }
        if !violations.is_empty() {
            tracing::warn!("Unexpected violation:\n{}", snippet);
            return Verdict::UnexpectedViolations {
                snippet: snippet.clone(),
                violations,
            };
        }
    }

    Verdict::Passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::LintsmithError;
    use async_trait::async_trait;

    #[test]
    fn test_unexpected_violations_message_lists_violations() {
        let event: Event = Verdict::UnexpectedViolations {
            snippet: "let a = 1;".to_string(),
            violations: vec![Violation {
                rule_id: Some("example/custom-rule".to_string()),
                message: "Use const".to_string(),
                severity: 2,
                line: Some(1),
                column: Some(1),
                fatal: false,
            }],
        }
        .into();
        let Event::ValidationFailed(message) = event else {
            panic!("expected ValidationFailed");
        };
        assert!(message.contains("let a = 1;"));
        assert!(message.contains("Use const"));
    }

    /// Checker that reports a parse error for one snippet and flags `var` elsewhere.
    struct ParseErrorChecker {
        broken: &'static str,
    }

    #[async_trait]
    impl Checker for ParseErrorChecker {
        async fn check(
            &self,
            snippet: &str,
            _rule_path: &Path,
        ) -> Result<Vec<Violation>, LintsmithError> {
            if snippet == self.broken {
                return Ok(vec![Violation {
                    rule_id: None,
                    message: "Parsing error: Unexpected token".to_string(),
                    severity: 2,
                    line: Some(1),
                    column: Some(5),
                    fatal: true,
                }]);
            }
            if snippet.contains("var ") {
                return Ok(vec![Violation {
                    rule_id: Some("example/custom-rule".to_string()),
                    message: "Unexpected var".to_string(),
                    severity: 2,
                    line: Some(1),
                    column: Some(1),
                    fatal: false,
                }]);
            }
            Ok(Vec::new())
        }
    }

    fn examples() -> ExampleSet {
        let to_vec = |items: [&str; 3]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        ExampleSet::new(
            to_vec(["var a = 1;", "var b;", "var c = a;"]),
            to_vec(["let a = 1;", "let = ;", "const c = 3;"]),
        )
        .expect("valid examples")
    }

    #[tokio::test]
    async fn test_parse_error_in_negative_is_not_a_rule_failure() {
        let checker = ParseErrorChecker { broken: "let = ;" };
        let verdict = validate_examples(&checker, &examples(), Path::new("rule.js")).await;
        assert_eq!(
            verdict,
            Verdict::UnparseableExample {
                snippet: "let = ;".to_string(),
                message: "Parsing error: Unexpected token".to_string(),
            }
        );
        assert!(matches!(
            Event::from(verdict),
            Event::InvalidExample { ref snippet, .. } if snippet == "let = ;"
        ));
    }

    #[tokio::test]
    async fn test_parse_error_in_positive_is_not_counted_as_flagged() {
        let checker = ParseErrorChecker { broken: "var b;" };
        let verdict = validate_examples(&checker, &examples(), Path::new("rule.js")).await;
        assert!(matches!(verdict, Verdict::UnparseableExample { ref snippet, .. } if snippet == "var b;"));
    }

    #[test]
    fn test_checker_error_becomes_validation_failure() {
        let event: Event = Verdict::CheckerError("exited with status Some(2)".to_string()).into();
        assert!(matches!(event, Event::ValidationFailed(ref m) if m.contains("Some(2)")));
    }
}

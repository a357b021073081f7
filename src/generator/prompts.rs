// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! Prompt construction for example generation and rule implementation.
//!
//! Templates live in `prompts/` and are embedded at compile time. The
//! `{description}` placeholder is replaced literally; the templates contain
//! other braces (JSON, JavaScript) that must survive untouched.

use crate::generator::RetryFeedback;

/// Load the example generation prompt template.
pub fn examples_prompt() -> &'static str {
    include_str!("../../prompts/examples.md")
}

/// Load the rule implementation prompt template.
pub fn rule_prompt() -> &'static str {
    include_str!("../../prompts/rule.md")
}

/// System message for the example generator.
pub const EXAMPLES_SYSTEM: &str =
    "You are an ESLint test-case creator. You produce thorough positive and negative snippets for a rule.";

/// System message for the rule generator.
pub const RULE_SYSTEM: &str = "You are an ESLint rule implementor. You turn requirements into a fully functional rule with id `custom-rule`.";

/// Build the example generation prompt.
pub fn build_examples_prompt(description: &str) -> String {
    examples_prompt().replace("{description}", description.trim())
}

/// Build the rule implementation prompt.
///
/// On a retry, the previous candidate and the error it produced are appended
/// so the model can correct itself instead of starting over.
pub fn build_rule_prompt(description: &str, feedback: Option<&RetryFeedback>) -> String {
    let mut prompt = rule_prompt().replace("{description}", description.trim());

    if let Some(feedback) = feedback {
        prompt.push_str(&format!(
            "\n\nYour previous implementation (attempt {}) failed validation.\n\n<validation_error>\n{}\n</validation_error>\n",
            feedback.attempt, feedback.last_error
        ));
        if let Some(previous) = &feedback.previous_source {
            prompt.push_str(&format!(
                "\n<previous_implementation>\n{}\n</previous_implementation>\n",
                previous.trim()
            ));
        }
        prompt.push_str("\nReturn a corrected implementation that fixes this error.");
    }

    prompt
}

/// Note appended to a prompt after the model returned malformed output.
pub fn build_shape_retry_note(error: &str) -> String {
    format!(
        "Your previous answer was rejected: {}\nAnswer again, following the required output format exactly.",
        error
    )
}

/// Sampling temperature for rule attempt `attempt` (1-indexed).
///
/// The first attempt uses the provider default; retries start at 0.7 and
/// rise by 0.1 per attempt, capped at 0.9.
pub fn retry_temperature(attempt: u32) -> Option<f32> {
    if attempt <= 1 {
        return None;
    }
    let steps = attempt.saturating_sub(2).min(2) as f32;
    Some((0.7 + steps * 0.1).min(0.9))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_prompt_substitutes_description() {
        let prompt = build_examples_prompt("  Disallow inline styles in JSX ");
        assert!(prompt.contains("Disallow inline styles in JSX"));
        assert!(!prompt.contains("{description}"));
        // JSON braces in the template are untouched.
        assert!(prompt.contains("\"positive_examples\""));
    }

    #[test]
    fn test_rule_prompt_without_feedback() {
        let prompt = build_rule_prompt("No console.log", None);
        assert!(prompt.contains("No console.log"));
        assert!(prompt.contains("module.exports"));
        assert!(!prompt.contains("<validation_error>"));
    }

    #[test]
    fn test_rule_prompt_with_feedback() {
        let feedback = RetryFeedback {
            attempt: 2,
            previous_source: Some("module.exports = {};".to_string()),
            last_error: "Unexpected violation in negative example".to_string(),
        };
        let prompt = build_rule_prompt("No console.log", Some(&feedback));
        assert!(prompt.contains("attempt 2"));
        assert!(prompt.contains("Unexpected violation in negative example"));
        assert!(prompt.contains("<previous_implementation>"));
    }

    #[test]
    fn test_retry_temperature_scaling() {
        assert_eq!(retry_temperature(1), None);
        let temps: Vec<f32> = (2..=6).filter_map(retry_temperature).collect();
        assert!((temps[0] - 0.7).abs() < f32::EPSILON);
        assert!((temps[1] - 0.8).abs() < 1e-6);
        assert!((temps[2] - 0.9).abs() < 1e-6);
        assert!(temps.iter().all(|t| *t <= 0.9));
    }
}

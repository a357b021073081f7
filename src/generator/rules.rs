// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use crate::utils::error::LintsmithError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Number of positive and of negative examples in every [`ExampleSet`].
pub const EXAMPLES_PER_KIND: usize = 3;

/// A kebab-case rule name, usable as a file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleName(String);

impl RuleName {
    pub fn new(name: impl Into<String>) -> Result<Self, LintsmithError> {
        let name = name.into();
        if is_kebab_case(&name) {
            Ok(Self(name))
        } else {
            Err(LintsmithError::Shape(format!(
                "rule name '{}' is not kebab-case",
                name
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RuleName {
    type Error = LintsmithError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RuleName> for String {
    fn from(name: RuleName) -> Self {
        name.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase ASCII words of letters and digits separated by single hyphens.
pub fn is_kebab_case(name: &str) -> bool {
    !name.is_empty()
        && name.split('-').all(|word| {
            !word.is_empty()
                && word
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

/// The user's request: what the rule should enforce, and once examples are
/// generated, what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub description: String,
    pub rule_name: Option<RuleName>,
}

impl RuleSpec {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            rule_name: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawExampleSet {
    positive_examples: Vec<String>,
    negative_examples: Vec<String>,
}

/// Exactly three snippets that must trigger the rule and three that must not.
///
/// Only constructible through [`ExampleSet::new`] or deserialization, both
/// of which enforce the counts and the disjointness of the two lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExampleSet")]
pub struct ExampleSet {
    positive_examples: Vec<String>,
    negative_examples: Vec<String>,
}

impl ExampleSet {
    pub fn new(positive: Vec<String>, negative: Vec<String>) -> Result<Self, LintsmithError> {
        if positive.len() != EXAMPLES_PER_KIND || negative.len() != EXAMPLES_PER_KIND {
            return Err(LintsmithError::Shape(format!(
                "need exactly {n} positive and {n} negative examples, got {} and {}",
                positive.len(),
                negative.len(),
                n = EXAMPLES_PER_KIND
            )));
        }

        if positive
            .iter()
            .chain(negative.iter())
            .any(|snippet| snippet.trim().is_empty())
        {
            return Err(LintsmithError::Shape(
                "examples must not be empty".to_string(),
            ));
        }

        let positives: HashSet<&str> = positive.iter().map(|s| s.trim()).collect();
        if let Some(dup) = negative.iter().find(|s| positives.contains(s.trim())) {
            return Err(LintsmithError::Shape(format!(
                "snippet appears as both positive and negative example: {}",
                dup.trim()
            )));
        }

        Ok(Self {
            positive_examples: positive,
            negative_examples: negative,
        })
    }

    /// Snippets that must produce at least one violation.
    pub fn positive(&self) -> &[String] {
        &self.positive_examples
    }

    /// Snippets that must produce no violations.
    pub fn negative(&self) -> &[String] {
        &self.negative_examples
    }
}

impl TryFrom<RawExampleSet> for ExampleSet {
    type Error = LintsmithError;

    fn try_from(raw: RawExampleSet) -> Result<Self, Self::Error> {
        Self::new(raw.positive_examples, raw.negative_examples)
    }
}

/// Structured output of the example generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExamples {
    pub rule_name: RuleName,
    pub examples: ExampleSet,
}

/// CommonJS source of a candidate ESLint rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource(String);

impl RuleSource {
    pub fn new(source: impl Into<String>) -> Result<Self, LintsmithError> {
        let source = source.into();
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(LintsmithError::Shape("rule source is empty".to_string()));
        }
        if !trimmed.contains("module.exports") {
            return Err(LintsmithError::Shape(
                "rule source must assign module.exports".to_string(),
            ));
        }
        if trimmed.contains("```") {
            return Err(LintsmithError::Shape(
                "rule source contains a Markdown fence; return only the JavaScript module"
                    .to_string(),
            ));
        }
        Ok(Self(format!("{}\n", trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct LintRule {
    rule_source: String,
}

/// Parse the example generator's reply into [`CodeExamples`].
///
/// Tolerates Markdown fences and prose around the JSON object.
pub fn parse_examples_response(response: &str) -> Result<CodeExamples, LintsmithError> {
    let json = extract_json_object(response)
        .ok_or_else(|| LintsmithError::Shape("response contains no JSON object".to_string()))?;
    serde_json::from_str(json).map_err(|e| LintsmithError::Shape(e.to_string()))
}

/// Parse the rule generator's reply into a [`RuleSource`].
///
/// Accepts either a `{"rule_source": "..."}` object or plain source. Either
/// may sit inside a code fence with prose around it; the first fenced block
/// wins.
pub fn parse_rule_response(response: &str) -> Result<RuleSource, LintsmithError> {
    let trimmed = response.trim();
    if let Some(rule) = parse_structured_rule(trimmed) {
        return RuleSource::new(unfence(&rule.rule_source));
    }
    let body = unfence(trimmed);
    if let Some(rule) = parse_structured_rule(body) {
        return RuleSource::new(unfence(&rule.rule_source));
    }
    RuleSource::new(body)
}

fn parse_structured_rule(text: &str) -> Option<LintRule> {
    if !text.starts_with('{') {
        return None;
    }
    serde_json::from_str(text).ok()
}

/// Body of the first fenced block in `text`, or the trimmed text when there
/// is none.
fn unfence(text: &str) -> &str {
    first_fenced_block(text).unwrap_or_else(|| text.trim())
}

fn first_fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    // The rest of the opening line is the language tag.
    let body_start = after_open.find('\n').map_or(0, |newline| newline + 1);
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

fn extract_json_object(text: &str) -> Option<&str> {
    let body = unfence(text);
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}

// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! Workflow state and its transition function.
//!
//! [`WorkflowState::apply`] is pure with respect to the outside world: it
//! mutates the state record and returns the filesystem [`Effect`]s the
//! caller must perform. All external calls happen in the runner.

use crate::generator::{CodeExamples, ExampleSet, RetryFeedback, RuleName, RuleSource, RuleSpec};
use std::fmt;
use thiserror::Error;

/// Failure budget of a single workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Failed implementation attempts before giving up.
    pub max_attempts: u32,
    /// Example sets that may be generated in total.
    pub max_example_rounds: u32,
}

impl Limits {
    /// Highest accepted `max_attempts`.
    pub const MAX_ATTEMPTS: u32 = 5;
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            max_example_rounds: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    GeneratingExamples,
    ImplementingRule,
    Validating,
    Done,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::GeneratingExamples => "generating examples",
            Phase::ImplementingRule => "implementing rule",
            Phase::Validating => "validating",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why a run ended in [`Phase::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The example generator could not produce a valid set.
    ExampleGeneration,
    /// Implementation attempts hit `max_attempts`.
    RetriesExhausted,
    /// Positive examples kept passing; example rounds hit `max_example_rounds`.
    ExampleRoundsExhausted,
    /// The validated rule could not be written.
    Persistence,
    /// An event arrived that the current phase does not accept.
    Internal,
}

/// Result of one workflow step, fed into [`WorkflowState::apply`].
#[derive(Debug, Clone)]
pub enum Event {
    ExamplesGenerated(CodeExamples),
    ExamplesFailed(String),
    RuleImplemented(RuleSource),
    ImplementationFailed(String),
    ValidationPassed,
    /// A positive example produced no violations.
    MissingViolation {
        snippet: String,
    },
    /// The checker could not parse an example.
    InvalidExample {
        snippet: String,
        reason: String,
    },
    ValidationFailed(String),
    PersistFailed(String),
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::ExamplesGenerated(_) => "ExamplesGenerated",
            Event::ExamplesFailed(_) => "ExamplesFailed",
            Event::RuleImplemented(_) => "RuleImplemented",
            Event::ImplementationFailed(_) => "ImplementationFailed",
            Event::ValidationPassed => "ValidationPassed",
            Event::MissingViolation { .. } => "MissingViolation",
            Event::InvalidExample { .. } => "InvalidExample",
            Event::ValidationFailed(_) => "ValidationFailed",
            Event::PersistFailed(_) => "PersistFailed",
        }
    }
}

/// Filesystem work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    WriteScratch(RuleSource),
    DeleteScratch,
    PersistRule { name: RuleName, source: RuleSource },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("event {event} is not valid while {phase}")]
pub struct InvalidTransition {
    pub phase: Phase,
    pub event: &'static str,
}

/// Everything a run knows, owned by exactly one runner.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    spec: RuleSpec,
    examples: Option<ExampleSet>,
    rule_source: Option<RuleSource>,
    previous_rule_source: Option<RuleSource>,
    validated: bool,
    attempts: u32,
    example_rounds: u32,
    last_error: Option<String>,
    phase: Phase,
    failure: Option<FailureKind>,
    limits: Limits,
}

impl WorkflowState {
    pub fn new(spec: RuleSpec, limits: Limits) -> Self {
        Self {
            spec,
            examples: None,
            rule_source: None,
            previous_rule_source: None,
            validated: false,
            attempts: 0,
            example_rounds: 0,
            last_error: None,
            phase: Phase::GeneratingExamples,
            failure: None,
            limits,
        }
    }

    pub fn spec(&self) -> &RuleSpec {
        &self.spec
    }

    pub fn examples(&self) -> Option<&ExampleSet> {
        self.examples.as_ref()
    }

    pub fn rule_source(&self) -> Option<&RuleSource> {
        self.rule_source.as_ref()
    }

    pub fn previous_rule_source(&self) -> Option<&RuleSource> {
        self.previous_rule_source.as_ref()
    }

    pub fn validated(&self) -> bool {
        self.validated
    }

    /// Failed implementation attempts so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Example sets generated so far.
    pub fn example_rounds(&self) -> u32 {
        self.example_rounds
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Feedback for the next implementation attempt, if one has failed.
    pub fn retry_feedback(&self) -> Option<RetryFeedback> {
        if self.attempts == 0 {
            return None;
        }
        self.last_error.as_ref().map(|error| RetryFeedback {
            attempt: self.attempts,
            previous_source: self.rule_source.as_ref().map(|s| s.as_str().to_string()),
            last_error: error.clone(),
        })
    }

    /// Apply `event` and return the effects the caller must carry out.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when the current phase does not accept
    /// the event. The state is left unchanged in that case.
    pub fn apply(&mut self, event: Event) -> Result<Vec<Effect>, InvalidTransition> {
        let invalid = InvalidTransition {
            phase: self.phase,
            event: event.name(),
        };

        match (self.phase, event) {
            (Phase::GeneratingExamples, Event::ExamplesGenerated(generated)) => {
                self.example_rounds += 1;
                self.spec.rule_name = Some(generated.rule_name);
                self.examples = Some(generated.examples);
                self.phase = Phase::ImplementingRule;
                Ok(Vec::new())
            }
            (Phase::GeneratingExamples, Event::ExamplesFailed(message)) => {
                Ok(self.fail(FailureKind::ExampleGeneration, message))
            }
            (Phase::ImplementingRule, Event::RuleImplemented(source)) => {
                self.previous_rule_source = self.rule_source.replace(source.clone());
                self.validated = false;
                self.phase = Phase::Validating;
                Ok(vec![Effect::WriteScratch(source)])
            }
            (Phase::ImplementingRule, Event::ImplementationFailed(message))
            | (Phase::Validating, Event::ValidationFailed(message)) => {
                Ok(self.record_failed_attempt(message))
            }
            (Phase::Validating, Event::MissingViolation { snippet }) => {
                let message = format!("Expected a violation, got none:\n{}", snippet.trim());
                Ok(self.discard_examples(message))
            }
            (Phase::Validating, Event::InvalidExample { snippet, reason }) => {
                let message = format!("Example does not parse ({}):\n{}", reason, snippet.trim());
                Ok(self.discard_examples(message))
            }
            (Phase::Validating, Event::ValidationPassed) => {
                let (Some(name), Some(source)) =
                    (self.spec.rule_name.clone(), self.rule_source.clone())
                else {
                    return Ok(self.fail(
                        FailureKind::Internal,
                        "validation passed without a rule name or source".to_string(),
                    ));
                };
                self.validated = true;
                self.attempts = 0;
                self.last_error = None;
                self.phase = Phase::Done;
                Ok(vec![
                    Effect::DeleteScratch,
                    Effect::PersistRule { name, source },
                ])
            }
            (Phase::Done, Event::PersistFailed(message)) => {
                self.validated = false;
                self.last_error = Some(message);
                self.failure = Some(FailureKind::Persistence);
                self.phase = Phase::Failed;
                Ok(Vec::new())
            }
            _ => Err(invalid),
        }
    }

    /// Terminate after the runner hit an [`InvalidTransition`].
    pub fn abort(&mut self, error: &InvalidTransition) -> Vec<Effect> {
        self.fail(FailureKind::Internal, error.to_string())
    }

    /// Go back for a new example set, or fail once the rounds are used up.
    /// The attempt counter is left alone.
    fn discard_examples(&mut self, message: String) -> Vec<Effect> {
        self.validated = false;
        if self.example_rounds >= self.limits.max_example_rounds {
            return self.fail(FailureKind::ExampleRoundsExhausted, message);
        }
        self.last_error = Some(message);
        self.examples = None;
        self.phase = Phase::GeneratingExamples;
        Vec::new()
    }

    fn record_failed_attempt(&mut self, message: String) -> Vec<Effect> {
        self.validated = false;
        self.attempts += 1;
        if self.attempts >= self.limits.max_attempts {
            return self.fail(FailureKind::RetriesExhausted, message);
        }
        self.last_error = Some(message);
        self.phase = Phase::ImplementingRule;
        Vec::new()
    }

    fn fail(&mut self, kind: FailureKind, message: String) -> Vec<Effect> {
        self.last_error = Some(message);
        self.failure = Some(kind);
        self.phase = Phase::Failed;
        self.rule_source = None;
        vec![Effect::DeleteScratch]
    }
}

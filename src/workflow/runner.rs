// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use crate::checker::Checker;
use crate::generator::{Generator, RuleName, RuleSpec};
use crate::output::{ArtifactStore, PersistedRule};
use crate::utils::progress::PhaseSpinner;
use crate::workflow::state::{Effect, Event, FailureKind, Limits, Phase, WorkflowState};
use crate::workflow::validation::validate_examples;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

/// Knobs for a [`RuleWorkflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub limits: Limits,
    /// Upper bound for a single generator call.
    pub step_timeout: Duration,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            step_timeout: Duration::from_secs(300),
        }
    }
}

/// How a run ended. Every path through the workflow produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Created {
        rule_name: RuleName,
        path: PathBuf,
        rules_dir: PathBuf,
        backup_path: Option<PathBuf>,
    },
    Failed {
        kind: FailureKind,
        /// Last error recorded before the run stopped.
        error: String,
        attempts: u32,
        example_rounds: u32,
    },
}

impl WorkflowOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WorkflowOutcome::Created { .. })
    }

    /// Message shown to the user.
    pub fn message(&self) -> String {
        match self {
            WorkflowOutcome::Created {
                rule_name,
                rules_dir,
                ..
            } => format!(
                "Lint rule {} created successfully in {}. This needs to be included in the eslint.config.js file, so please make sure to do that.",
                rule_name,
                rules_dir.display()
            ),
            WorkflowOutcome::Failed {
                kind: FailureKind::ExampleRoundsExhausted,
                error,
                example_rounds,
                ..
            } => format!(
                "Failed to create lint rule, positive examples were not flagged after {} example sets. Last error: {}",
                example_rounds, error
            ),
            WorkflowOutcome::Failed {
                kind: FailureKind::RetriesExhausted,
                error,
                attempts,
                ..
            } => format!(
                "Failed to create lint rule, validation failed after {} attempts. Last error: {}",
                attempts, error
            ),
            WorkflowOutcome::Failed { error, .. } => {
                format!("Failed to create lint rule, {}", error)
            }
        }
    }
}

/// Drives one rule request from description to outcome.
///
/// Steps run strictly in sequence; the runner owns its state and shares
/// nothing with other runs.
pub struct RuleWorkflow<G, C> {
    generator: G,
    checker: C,
    store: ArtifactStore,
    settings: WorkflowSettings,
    spinner: PhaseSpinner,
}

impl<G: Generator, C: Checker> RuleWorkflow<G, C> {
    pub fn new(generator: G, checker: C, store: ArtifactStore, settings: WorkflowSettings) -> Self {
        Self {
            generator,
            checker,
            store,
            settings,
            spinner: PhaseSpinner::hidden(),
        }
    }

    pub fn with_spinner(mut self, spinner: PhaseSpinner) -> Self {
        self.spinner = spinner;
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run the workflow for `description` until it reaches a terminal phase.
    pub async fn run(&self, description: &str) -> WorkflowOutcome {
        let mut state = WorkflowState::new(RuleSpec::new(description), self.settings.limits);
        let mut persisted = None;

        tracing::info!("Creating lint rule for: {}", description.trim());

        while !state.phase().is_terminal() {
            self.spinner.set_message(self.progress_message(&state));
            let event = match state.phase() {
                Phase::GeneratingExamples => self.generate_examples(&state).await,
                Phase::ImplementingRule => self.implement_rule(&state).await,
                Phase::Validating => self.validate(&state).await,
                Phase::Done | Phase::Failed => break,
            };

            let effects = match state.apply(event) {
                Ok(effects) => effects,
                Err(err) => {
                    tracing::error!("{}", err);
                    state.abort(&err)
                }
            };

            if let Some(follow_up) = self.execute(effects, &mut persisted) {
                let effects = state.apply(follow_up).unwrap_or_else(|err| state.abort(&err));
                // A follow-up can only request scratch cleanup.
                let _ = self.execute(effects, &mut persisted);
            }
        }

        self.spinner.finish();
        self.outcome(&state, persisted)
    }

    async fn generate_examples(&self, state: &WorkflowState) -> Event {
        let round = state.example_rounds() + 1;
        tracing::info!(
            round,
            max = state.limits().max_example_rounds,
            "Generating examples"
        );

        match self
            .bounded("example generation", self.generator.generate_examples(state.spec()))
            .await
        {
            Ok(generated) => {
                tracing::info!(rule_name = %generated.rule_name, "Examples generated");
                Event::ExamplesGenerated(generated)
            }
            Err(message) => {
                tracing::error!("Example generation failed: {}", message);
                Event::ExamplesFailed(message)
            }
        }
    }

    async fn implement_rule(&self, state: &WorkflowState) -> Event {
        let attempt = state.attempts() + 1;
        tracing::info!(
            attempt,
            max = state.limits().max_attempts,
            "Implementing rule"
        );

        let feedback = state.retry_feedback();
        match self
            .bounded(
                "rule implementation",
                self.generator.implement_rule(state.spec(), feedback.as_ref()),
            )
            .await
        {
            Ok(source) => {
                tracing::info!(attempt, "Rule implemented");
                Event::RuleImplemented(source)
            }
            Err(message) => {
                tracing::warn!(attempt, "Rule implementation failed: {}", message);
                Event::ImplementationFailed(message)
            }
        }
    }

    async fn validate(&self, state: &WorkflowState) -> Event {
        let Some(examples) = state.examples() else {
            return Event::ValidationFailed("no examples to validate against".to_string());
        };
        let verdict = validate_examples(&self.checker, examples, &self.store.scratch_path()).await;
        let event = Event::from(verdict);
        match &event {
            Event::ValidationPassed => tracing::info!("Validation passed"),
            Event::MissingViolation { .. } => {
                tracing::warn!("Positive example not flagged, regenerating examples")
            }
            Event::InvalidExample { .. } => {
                tracing::warn!("Example does not parse, regenerating examples")
            }
            _ => tracing::warn!(attempt = state.attempts() + 1, "Validation failed"),
        }
        event
    }

    /// Await `step`, mapping errors and timeouts to a message.
    async fn bounded<T>(
        &self,
        operation: &str,
        step: impl Future<Output = Result<T, crate::utils::error::LintsmithError>>,
    ) -> Result<T, String> {
        match tokio::time::timeout(self.settings.step_timeout, step).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!(
                "{} timed out after {}s",
                operation,
                self.settings.step_timeout.as_secs()
            )),
        }
    }

    /// Perform `effects`. Returns the event to feed back if one failed in a
    /// way the state machine must hear about.
    fn execute(
        &self,
        effects: Vec<Effect>,
        persisted: &mut Option<PersistedRule>,
    ) -> Option<Event> {
        for effect in effects {
            match effect {
                Effect::WriteScratch(source) => {
                    if let Err(e) = self.store.write_scratch(&source) {
                        return Some(Event::ValidationFailed(format!(
                            "could not write scratch rule {}: {}",
                            self.store.scratch_path().display(),
                            e
                        )));
                    }
                }
                Effect::DeleteScratch => {
                    if let Err(e) = self.store.delete_scratch() {
                        tracing::warn!("Failed to remove scratch rule: {}", e);
                    }
                }
                Effect::PersistRule { name, source } => {
                    match self.store.persist_rule(&name, &source) {
                        Ok(rule) => *persisted = Some(rule),
                        Err(e) => {
                            return Some(Event::PersistFailed(format!(
                                "could not write rule {}: {}",
                                name, e
                            )));
                        }
                    }
                }
            }
        }
        None
    }

    fn progress_message(&self, state: &WorkflowState) -> String {
        match state.phase() {
            Phase::ImplementingRule => format!(
                "Implementing rule (attempt {}/{})",
                state.attempts() + 1,
                state.limits().max_attempts
            ),
            Phase::GeneratingExamples => format!(
                "Generating examples (set {}/{})",
                state.example_rounds() + 1,
                state.limits().max_example_rounds
            ),
            Phase::Validating => "Validating rule against examples".to_string(),
            Phase::Done | Phase::Failed => "Finishing".to_string(),
        }
    }

    fn outcome(&self, state: &WorkflowState, persisted: Option<PersistedRule>) -> WorkflowOutcome {
        match (state.phase(), persisted, state.spec().rule_name.clone()) {
            (Phase::Done, Some(rule), Some(rule_name)) => {
                tracing::info!("Lint rule {} written to {}", rule_name, rule.path.display());
                WorkflowOutcome::Created {
                    rule_name,
                    path: rule.path,
                    rules_dir: self.store.rules_dir().to_path_buf(),
                    backup_path: rule.backup_path,
                }
            }
            _ => {
                let kind = state.failure().unwrap_or(FailureKind::Internal);
                let error = state
                    .last_error()
                    .unwrap_or("workflow stopped without an error message")
                    .to_string();
                tracing::error!(?kind, attempts = state.attempts(), "Lint rule creation failed");
                WorkflowOutcome::Failed {
                    kind,
                    error,
                    attempts: state.attempts(),
                    example_rounds: state.example_rounds(),
                }
            }
        }
    }
}

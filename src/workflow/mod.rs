// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! The rule-generation workflow.
//!
//! ```text
//! GeneratingExamples -> ImplementingRule -> Validating -> Done
//!         ^                    ^                |
//!         |                    +-- rule failed -+  (attempts < max_attempts)
//!         +-- example unflagged or unparseable -+  (rounds < max_example_rounds)
//!                                               +-> Failed
//! ```
//!
//! [`state`] holds the pure transition function, [`validation`] maps
//! checker results to events, and [`runner`] performs the external calls.

pub mod runner;
pub mod state;
pub mod validation;

pub use runner::{RuleWorkflow, WorkflowOutcome, WorkflowSettings};
pub use state::{Effect, Event, FailureKind, InvalidTransition, Limits, Phase, WorkflowState};
pub use validation::{Verdict, validate_examples};

// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the workflow waits on a generator or the checker.
///
/// When stderr is not a TTY, or the caller asked for quiet output, the
/// spinner is hidden and every method is a no-op.
pub struct PhaseSpinner {
    bar: ProgressBar,
}

impl PhaseSpinner {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        if quiet || !Term::stderr().is_term() {
            return Self::hidden();
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg}")
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to parse spinner template: {e}");
                ProgressStyle::default_spinner()
            });
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }
}

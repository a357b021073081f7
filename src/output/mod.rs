// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

pub mod store;

pub use store::{ArtifactStore, PersistedRule};

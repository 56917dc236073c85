// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Behavior switches for the allocation engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowPolicy {
    /// Promote a `PLANNED` project to `ACTIVE` when the first assignment
    /// lands on it. When off, `PLANNED` projects must be activated
    /// explicitly before they accept assignments.
    pub promote_planned_projects: bool,
}

impl WorkflowPolicy {
    /// Policy with planned-project promotion enabled.
    #[must_use]
    pub const fn promoting() -> Self {
        Self {
            promote_planned_projects: true,
        }
    }
}

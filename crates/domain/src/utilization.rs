// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workload classification derived from active assignments.

use crate::assignment::Assignment;
use crate::types::BillingType;
use serde::{Deserialize, Serialize};

/// Derived workload status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStatus {
    /// No active assignment.
    Bench,
    /// At least one active billable assignment.
    Billable,
    /// Only active investment assignments.
    Investment,
}

impl AllocationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bench => "BENCH",
            Self::Billable => "BILLABLE",
            Self::Investment => "INVESTMENT",
        }
    }
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies an employee from their assignments. Ended assignments are ignored.
#[must_use]
pub fn classify_allocation(assignments: &[Assignment]) -> AllocationStatus {
    let mut active = assignments.iter().filter(|a| a.is_active()).peekable();
    if active.peek().is_none() {
        return AllocationStatus::Bench;
    }
    if active.any(|a| a.billing_type == BillingType::Billable) {
        AllocationStatus::Billable
    } else {
        AllocationStatus::Investment
    }
}

/// Returns the assignment with the latest start date.
///
/// Ties go to the most recently created assignment.
#[must_use]
pub fn most_recent_assignment(assignments: &[Assignment]) -> Option<&Assignment> {
    assignments
        .iter()
        .max_by_key(|a| (a.start_date, a.assignment_id))
}

/// Returns the assignment that best describes what the employee is on now.
///
/// The most recent active assignment wins; without one, the most recent
/// assignment in any status. `None` only when there are no assignments.
#[must_use]
pub fn current_assignment(assignments: &[Assignment]) -> Option<&Assignment> {
    assignments
        .iter()
        .filter(|a| a.is_active())
        .max_by_key(|a| (a.start_date, a.assignment_id))
        .or_else(|| most_recent_assignment(assignments))
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity arithmetic.
//!
//! An employee's committed allocation is the sum of `allocation_percent` over
//! their `ACTIVE` assignments. The sum must never exceed [`FULL_CAPACITY`].
//! These functions are pure; callers evaluate them inside the same
//! serialized unit of work as the write that depends on the result.

use crate::assignment::Assignment;
use crate::error::DomainError;
use crate::types::AllocationPercent;

/// Total capacity of one employee, in percent.
pub const FULL_CAPACITY: u32 = 100;

/// Outcome of checking a candidate allocation against current commitments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityCheck {
    /// Raw sum of active allocations considered.
    pub current_total: u32,
    /// Candidate allocation.
    pub requested: u32,
    /// Remaining headroom before the candidate is added.
    pub available: u32,
    /// True if adding the candidate would exceed full capacity.
    pub would_exceed: bool,
}

impl CapacityCheck {
    /// Current total capped at full capacity, for display.
    #[must_use]
    pub const fn display_total(&self) -> u32 {
        if self.current_total > FULL_CAPACITY {
            FULL_CAPACITY
        } else {
            self.current_total
        }
    }

    /// Converts a failed check into an error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CapacityExceeded` if the candidate does not fit.
    pub const fn ensure_fits(&self, employee_id: i64) -> Result<(), DomainError> {
        if self.would_exceed {
            Err(DomainError::CapacityExceeded {
                employee_id,
                current: self.current_total,
                requested: self.requested,
                available: self.available,
            })
        } else {
            Ok(())
        }
    }
}

/// Sums the allocation of active assignments, optionally skipping one.
///
/// `excluding` is used when re-checking an assignment that is being updated
/// in place, so its old percentage is not counted twice.
#[must_use]
pub fn committed_allocation(assignments: &[Assignment], excluding: Option<i64>) -> u32 {
    assignments
        .iter()
        .filter(|a| a.is_active())
        .filter(|a| excluding.is_none() || a.assignment_id != excluding)
        .map(|a| a.allocation_percent.value())
        .sum()
}

/// Checks whether `requested` fits next to the employee's active assignments.
#[must_use]
pub fn check_capacity(
    assignments: &[Assignment],
    requested: AllocationPercent,
    excluding: Option<i64>,
) -> CapacityCheck {
    let current_total: u32 = committed_allocation(assignments, excluding);
    let requested: u32 = requested.value();
    CapacityCheck {
        current_total,
        requested,
        available: FULL_CAPACITY.saturating_sub(current_total),
        would_exceed: current_total + requested > FULL_CAPACITY,
    }
}

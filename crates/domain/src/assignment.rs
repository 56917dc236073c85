// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Realized project assignments.

use crate::error::DomainError;
use crate::types::{AllocationPercent, BillingType};
use crate::validation::{normalize_optional_text, validate_date_range};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Status of an assignment. Pending states exist only on requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    /// Counts toward the employee's capacity.
    Active,
    /// Historical.
    Ended,
}

impl AssignmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Ended => "ENDED",
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "ENDED" => Ok(Self::Ended),
            _ => Err(DomainError::InvalidAssignmentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An employee's allocation to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Store-assigned identifier; `None` until inserted.
    /// Optional to support creation before persistence.
    pub assignment_id: Option<i64>,
    /// The assigned employee.
    pub employee_id: i64,
    /// The project.
    pub project_id: i64,
    /// The approved request this assignment came from, if any.
    pub request_id: Option<i64>,
    /// Lifecycle status.
    pub status: AssignmentStatus,
    /// Cost treatment.
    pub billing_type: BillingType,
    /// Share of capacity committed.
    pub allocation_percent: AllocationPercent,
    /// Free-text role on the project.
    pub project_role: Option<String>,
    /// First day of the assignment.
    pub start_date: Date,
    /// Last day of the assignment; open-ended while `None`.
    pub end_date: Option<Date>,
    /// Row version for optimistic concurrency.
    pub version: i64,
}

impl Assignment {
    /// Creates a new `ACTIVE` assignment at version 0.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `end_date` precedes `start_date`.
    pub fn new_active(
        employee_id: i64,
        project_id: i64,
        billing_type: BillingType,
        allocation_percent: AllocationPercent,
        start_date: Date,
        end_date: Option<Date>,
        project_role: Option<String>,
    ) -> Result<Self, DomainError> {
        validate_date_range(start_date, end_date)?;
        Ok(Self {
            assignment_id: None,
            employee_id,
            project_id,
            request_id: None,
            status: AssignmentStatus::Active,
            billing_type,
            allocation_percent,
            project_role: normalize_optional_text(project_role),
            start_date,
            end_date,
            version: 0,
        })
    }

    /// Returns a copy with the persisted identifier set.
    #[must_use]
    pub const fn with_id(mut self, assignment_id: i64) -> Self {
        self.assignment_id = Some(assignment_id);
        self
    }

    /// Returns a copy linked to the request it realizes.
    #[must_use]
    pub const fn from_request(mut self, request_id: i64) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Returns true if the assignment counts toward capacity.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(DomainError::AssignmentNotActive(
                self.assignment_id.unwrap_or_default(),
            ))
        }
    }

    /// Returns the assignment ended on `today`.
    ///
    /// An assignment that has not started yet ends on its start date so the
    /// date range stays valid.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AssignmentNotActive` if already ended.
    pub fn end(&self, today: Date) -> Result<Self, DomainError> {
        self.ensure_active()?;
        let mut next: Self = self.clone();
        next.status = AssignmentStatus::Ended;
        next.end_date = Some(today.max(self.start_date));
        Ok(next)
    }

    /// Returns the assignment with `changes` applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment is not active or the resulting
    /// date range is invalid.
    pub fn apply_changes(&self, changes: &AssignmentChanges) -> Result<Self, DomainError> {
        self.ensure_active()?;
        let mut next: Self = self.clone();
        if let Some(percent) = changes.allocation_percent {
            next.allocation_percent = percent;
        }
        if let Some(billing_type) = changes.billing_type {
            next.billing_type = billing_type;
        }
        if let Some(role) = &changes.project_role {
            next.project_role = normalize_optional_text(Some(role.clone()));
        }
        if let Some(start_date) = changes.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            next.end_date = Some(end_date);
        }
        validate_date_range(next.start_date, next.end_date)?;
        Ok(next)
    }
}

/// Partial update of an active assignment. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentChanges {
    /// New allocation percent.
    pub allocation_percent: Option<AllocationPercent>,
    /// New billing type.
    pub billing_type: Option<BillingType>,
    /// New project role; an empty string clears it.
    pub project_role: Option<String>,
    /// New start date.
    pub start_date: Option<Date>,
    /// New end date.
    pub end_date: Option<Date>,
}

impl AssignmentChanges {
    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.allocation_percent.is_none()
            && self.billing_type.is_none()
            && self.project_role.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

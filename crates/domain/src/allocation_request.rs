// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation request lifecycle.
//!
//! A request moves `PENDING_MANAGER -> PENDING_HR -> APPROVED`, and may be
//! rejected from either pending stage. `APPROVED` and `REJECTED` are terminal.
//! Every audit-trail field is written by exactly one transition.

use crate::error::DomainError;
use crate::types::BillingType;
use crate::validation::{normalize_optional_text, validate_rejection_reason};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Workflow status of an allocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Awaiting triage by the employee's manager.
    PendingManager,
    /// Forwarded by the manager, awaiting HR.
    PendingHr,
    /// Approved by HR; an assignment exists.
    Approved,
    /// Rejected by the manager or HR.
    Rejected,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingManager => "PENDING_MANAGER",
            Self::PendingHr => "PENDING_HR",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns true if the request can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRequestTransition` if the lifecycle does not
    /// allow the move.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid: bool = match self {
            Self::PendingManager => matches!(new_status, Self::PendingHr | Self::Rejected),
            Self::PendingHr => matches!(new_status, Self::Approved | Self::Rejected),
            Self::Approved | Self::Rejected => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidRequestTransition {
                from: *self,
                to: new_status,
            })
        }
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_MANAGER" => Ok(Self::PendingManager),
            "PENDING_HR" => Ok(Self::PendingHr),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidRequestStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An employee-initiated request to be allocated to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Store-assigned identifier; `None` until inserted.
    /// Optional to support creation before persistence.
    pub request_id: Option<i64>,
    /// The requesting employee.
    pub employee_id: i64,
    /// The requested project.
    pub project_id: i64,
    /// Current workflow status.
    pub status: RequestStatus,
    /// Set by the manager on forward; frozen afterwards.
    pub billing_type: Option<BillingType>,
    /// Optional comments written by the manager on forward.
    pub manager_comments: Option<String>,
    /// Written on rejection.
    pub rejection_reason: Option<String>,
    /// When the employee created the request.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the manager forwarded the request.
    #[serde(with = "time::serde::rfc3339::option")]
    pub forwarded_at: Option<OffsetDateTime>,
    /// The forwarding manager.
    pub forwarded_by: Option<i64>,
    /// When the request reached a terminal status.
    #[serde(with = "time::serde::rfc3339::option")]
    pub reviewed_at: Option<OffsetDateTime>,
    /// Who moved the request to a terminal status.
    pub reviewed_by: Option<i64>,
}

impl AllocationRequest {
    /// Creates a new `PENDING_MANAGER` request.
    #[must_use]
    pub const fn new(employee_id: i64, project_id: i64, created_at: OffsetDateTime) -> Self {
        Self {
            request_id: None,
            employee_id,
            project_id,
            status: RequestStatus::PendingManager,
            billing_type: None,
            manager_comments: None,
            rejection_reason: None,
            created_at,
            forwarded_at: None,
            forwarded_by: None,
            reviewed_at: None,
            reviewed_by: None,
        }
    }

    /// Returns a copy with the persisted identifier set.
    #[must_use]
    pub const fn with_id(mut self, request_id: i64) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Returns true if the request is still awaiting a decision.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Ensures the request is in `expected` status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RequestNotInState` otherwise.
    pub fn ensure_status(&self, expected: RequestStatus) -> Result<(), DomainError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(DomainError::RequestNotInState {
                request_id: self.request_id.unwrap_or_default(),
                expected,
                actual: self.status,
            })
        }
    }

    /// Returns the request forwarded to HR.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is not `PENDING_MANAGER`.
    pub fn forward(
        &self,
        manager_id: i64,
        billing_type: BillingType,
        comments: Option<String>,
        at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        self.ensure_status(RequestStatus::PendingManager)?;
        self.status.validate_transition(RequestStatus::PendingHr)?;

        let mut next: Self = self.clone();
        next.status = RequestStatus::PendingHr;
        next.billing_type = Some(billing_type);
        next.manager_comments = normalize_optional_text(comments);
        next.forwarded_at = Some(at);
        next.forwarded_by = Some(manager_id);
        Ok(next)
    }

    /// Returns the request approved by HR.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is not `PENDING_HR` or has no billing type.
    pub fn approve(&self, reviewer_id: i64, at: OffsetDateTime) -> Result<Self, DomainError> {
        self.ensure_status(RequestStatus::PendingHr)?;
        self.status.validate_transition(RequestStatus::Approved)?;
        if self.billing_type.is_none() {
            return Err(DomainError::MissingBillingType);
        }

        let mut next: Self = self.clone();
        next.status = RequestStatus::Approved;
        next.reviewed_at = Some(at);
        next.reviewed_by = Some(reviewer_id);
        Ok(next)
    }

    /// Returns the request rejected at its current stage.
    ///
    /// Stage ownership (manager vs HR) is checked by the caller; this only
    /// enforces the lifecycle and the reason rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is blank or the request is terminal.
    pub fn reject(
        &self,
        reviewer_id: i64,
        reason: &str,
        at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let reason: String = validate_rejection_reason(reason)?;
        self.status.validate_transition(RequestStatus::Rejected)?;

        let mut next: Self = self.clone();
        next.status = RequestStatus::Rejected;
        next.rejection_reason = Some(reason);
        next.reviewed_at = Some(at);
        next.reviewed_by = Some(reviewer_id);
        Ok(next)
    }
}

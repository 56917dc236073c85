// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use skillbridge_domain::{AllocationPercent, AssignmentChanges, BillingType};
use time::Date;

/// Fields for a directly created assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraft {
    /// The employee to assign.
    pub employee_id: i64,
    /// The project.
    pub project_id: i64,
    /// Cost treatment.
    pub billing_type: BillingType,
    /// Share of capacity; full allocation when `None`.
    pub allocation_percent: Option<AllocationPercent>,
    /// First day.
    pub start_date: Date,
    /// Last day, if known.
    pub end_date: Option<Date>,
    /// Free-text role on the project.
    pub project_role: Option<String>,
}

/// A command represents caller intent as data only.
///
/// Commands are validated and applied against the loaded state of one
/// employee (or the catalog, for project commands).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Employee asks to be allocated to a project.
    CreateRequest {
        /// The requesting employee.
        employee_id: i64,
        /// The requested project.
        project_id: i64,
    },
    /// Manager forwards a request to HR with a billing type.
    ForwardRequest {
        /// The request.
        request_id: i64,
        /// Billing type chosen by the manager; required.
        billing_type: Option<BillingType>,
        /// Optional comments for HR.
        comments: Option<String>,
    },
    /// HR approves a request, creating an assignment.
    ApproveRequest {
        /// The request.
        request_id: i64,
        /// Allocation for the new assignment; full when `None`.
        allocation_percent: Option<AllocationPercent>,
    },
    /// Manager or HR rejects a request at their stage.
    RejectRequest {
        /// The request.
        request_id: i64,
        /// Why; must not be blank.
        reason: String,
    },
    /// HR or a manager creates an assignment without a request.
    CreateAssignment(AssignmentDraft),
    /// Ends an active assignment today.
    EndAssignment {
        /// The assignment.
        assignment_id: i64,
    },
    /// Partially updates an active assignment.
    UpdateAssignment {
        /// The assignment.
        assignment_id: i64,
        /// Version the caller read.
        expected_version: i64,
        /// Fields to change.
        changes: AssignmentChanges,
    },
    /// HR moves a `PLANNED` project to `ACTIVE`.
    ActivateProject {
        /// The project.
        project_id: i64,
    },
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateRequest { .. } => "CreateRequest",
            Self::ForwardRequest { .. } => "ForwardRequest",
            Self::ApproveRequest { .. } => "ApproveRequest",
            Self::RejectRequest { .. } => "RejectRequest",
            Self::CreateAssignment(_) => "CreateAssignment",
            Self::EndAssignment { .. } => "EndAssignment",
            Self::UpdateAssignment { .. } => "UpdateAssignment",
            Self::ActivateProject { .. } => "ActivateProject",
        }
    }

    /// Returns the request this command targets, if any.
    #[must_use]
    pub const fn target_request(&self) -> Option<i64> {
        match self {
            Self::ForwardRequest { request_id, .. }
            | Self::ApproveRequest { request_id, .. }
            | Self::RejectRequest { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    /// Returns the assignment this command targets, if any.
    #[must_use]
    pub const fn target_assignment(&self) -> Option<i64> {
        match self {
            Self::EndAssignment { assignment_id }
            | Self::UpdateAssignment { assignment_id, .. } => Some(*assignment_id),
            _ => None,
        }
    }
}

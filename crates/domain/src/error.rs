// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::allocation_request::RequestStatus;
use crate::types::{EmployeeRole, ProjectStatus};

/// Broad classification of a domain failure.
///
/// Every `DomainError` maps onto exactly one kind. Boundary layers use the
/// kind to pick a transport status without matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input failed a shape or value rule.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// The entity is not in a state that permits the operation.
    InvalidState,
    /// The caller is not allowed to perform the operation.
    Forbidden,
    /// The operation would duplicate an open request or assignment.
    Conflict,
    /// The operation would push an employee above full capacity.
    CapacityExceeded,
    /// The entity changed since the caller last read it.
    ConcurrentModification,
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Allocation percent is outside `1..=100`.
    InvalidAllocationPercent(i64),
    /// Billing type string is not recognized.
    InvalidBillingType(String),
    /// A billing type is required but was not supplied.
    MissingBillingType,
    /// Request status string is not recognized.
    InvalidRequestStatus(String),
    /// Assignment status string is not recognized.
    InvalidAssignmentStatus(String),
    /// Project status string is not recognized.
    InvalidProjectStatus(String),
    /// Employee role string is not recognized.
    InvalidRole(String),
    /// A rejection must carry a non-blank reason.
    BlankRejectionReason,
    /// End date precedes start date.
    InvalidDateRange {
        /// The start of the range.
        start_date: time::Date,
        /// The end of the range.
        end_date: time::Date,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Employee does not exist.
    EmployeeNotFound(i64),
    /// Project does not exist.
    ProjectNotFound(i64),
    /// Allocation request does not exist.
    RequestNotFound(i64),
    /// Assignment does not exist.
    AssignmentNotFound(i64),
    /// Project status does not accept new assignments or requests.
    ProjectNotAssignable {
        /// The project.
        project_id: i64,
        /// Its current status.
        status: ProjectStatus,
    },
    /// Project cannot be moved to `ACTIVE` from its current status.
    ProjectNotActivatable {
        /// The project.
        project_id: i64,
        /// Its current status.
        status: ProjectStatus,
    },
    /// The request is not in the status the operation requires.
    RequestNotInState {
        /// The request.
        request_id: i64,
        /// The status the operation requires.
        expected: RequestStatus,
        /// The status the request is actually in.
        actual: RequestStatus,
    },
    /// The request lifecycle does not permit this transition.
    InvalidRequestTransition {
        /// Current status.
        from: RequestStatus,
        /// Attempted status.
        to: RequestStatus,
    },
    /// The assignment has already ended.
    AssignmentNotActive(i64),
    /// The caller is not the employee's direct manager.
    NotDirectManager {
        /// The caller.
        actor_id: i64,
        /// The employee the request belongs to.
        employee_id: i64,
    },
    /// The caller's role may not perform the operation.
    RoleNotPermitted {
        /// The caller.
        actor_id: i64,
        /// The caller's role.
        role: EmployeeRole,
        /// The attempted operation.
        operation: &'static str,
    },
    /// The claimed role does not match the directory record.
    RoleMismatch {
        /// The caller.
        actor_id: i64,
        /// Role claimed by the caller.
        claimed: EmployeeRole,
        /// Role recorded in the directory.
        recorded: EmployeeRole,
    },
    /// The caller may only act on their own requests.
    NotRequestOwner {
        /// The caller.
        actor_id: i64,
        /// The employee the action targets.
        employee_id: i64,
    },
    /// The employee already has a non-terminal request.
    OpenRequestExists {
        /// The employee.
        employee_id: i64,
        /// The open request.
        request_id: i64,
    },
    /// The employee already has an active assignment.
    ActiveAssignmentExists {
        /// The employee.
        employee_id: i64,
        /// The active assignment.
        assignment_id: i64,
    },
    /// Committing the allocation would exceed full capacity.
    CapacityExceeded {
        /// The employee.
        employee_id: i64,
        /// Current committed total.
        current: u32,
        /// Requested percentage.
        requested: u32,
        /// Remaining headroom.
        available: u32,
    },
    /// The assignment version no longer matches.
    StaleAssignmentVersion {
        /// The assignment.
        assignment_id: i64,
        /// Version the caller based the update on.
        expected: i64,
        /// Version currently stored.
        actual: i64,
    },
}

impl DomainError {
    /// Returns the error kind used for boundary translation.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAllocationPercent(_)
            | Self::InvalidBillingType(_)
            | Self::MissingBillingType
            | Self::InvalidRequestStatus(_)
            | Self::InvalidAssignmentStatus(_)
            | Self::InvalidProjectStatus(_)
            | Self::InvalidRole(_)
            | Self::BlankRejectionReason
            | Self::InvalidDateRange { .. }
            | Self::DateParseError { .. }
            | Self::ProjectNotAssignable { .. } => ErrorKind::Validation,
            Self::EmployeeNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::RequestNotFound(_)
            | Self::AssignmentNotFound(_) => ErrorKind::NotFound,
            Self::ProjectNotActivatable { .. }
            | Self::RequestNotInState { .. }
            | Self::InvalidRequestTransition { .. }
            | Self::AssignmentNotActive(_) => ErrorKind::InvalidState,
            Self::NotDirectManager { .. }
            | Self::RoleNotPermitted { .. }
            | Self::RoleMismatch { .. }
            | Self::NotRequestOwner { .. } => ErrorKind::Forbidden,
            Self::OpenRequestExists { .. } | Self::ActiveAssignmentExists { .. } => {
                ErrorKind::Conflict
            }
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::StaleAssignmentVersion { .. } => ErrorKind::ConcurrentModification,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAllocationPercent(value) => {
                write!(
                    f,
                    "Invalid allocation percent: {value}. Must be between 1 and 100"
                )
            }
            Self::InvalidBillingType(value) => write!(f, "Invalid billing type: {value}"),
            Self::MissingBillingType => write!(f, "Billing type is required"),
            Self::InvalidRequestStatus(value) => write!(f, "Invalid request status: {value}"),
            Self::InvalidAssignmentStatus(value) => {
                write!(f, "Invalid assignment status: {value}")
            }
            Self::InvalidProjectStatus(value) => write!(f, "Invalid project status: {value}"),
            Self::InvalidRole(value) => write!(f, "Invalid role: {value}"),
            Self::BlankRejectionReason => write!(f, "Rejection reason cannot be empty"),
            Self::InvalidDateRange {
                start_date,
                end_date,
            } => {
                write!(
                    f,
                    "End date {end_date} must not be before start date {start_date}"
                )
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::EmployeeNotFound(id) => write!(f, "Employee {id} not found"),
            Self::ProjectNotFound(id) => write!(f, "Project {id} not found"),
            Self::RequestNotFound(id) => write!(f, "Allocation request {id} not found"),
            Self::AssignmentNotFound(id) => write!(f, "Assignment {id} not found"),
            Self::ProjectNotAssignable { project_id, status } => {
                write!(
                    f,
                    "Project {project_id} is {status} and does not accept allocations"
                )
            }
            Self::ProjectNotActivatable { project_id, status } => {
                write!(f, "Project {project_id} cannot be activated from {status}")
            }
            Self::RequestNotInState {
                request_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Allocation request {request_id} is {actual}, expected {expected}"
                )
            }
            Self::InvalidRequestTransition { from, to } => {
                write!(f, "Cannot move allocation request from {from} to {to}")
            }
            Self::AssignmentNotActive(id) => write!(f, "Assignment {id} is not active"),
            Self::NotDirectManager {
                actor_id,
                employee_id,
            } => {
                write!(
                    f,
                    "Employee {actor_id} is not the manager of employee {employee_id}"
                )
            }
            Self::RoleNotPermitted {
                actor_id,
                role,
                operation,
            } => {
                write!(
                    f,
                    "Employee {actor_id} with role {role} may not {operation}"
                )
            }
            Self::RoleMismatch {
                actor_id,
                claimed,
                recorded,
            } => {
                write!(
                    f,
                    "Employee {actor_id} claimed role {claimed} but holds role {recorded}"
                )
            }
            Self::NotRequestOwner {
                actor_id,
                employee_id,
            } => {
                write!(
                    f,
                    "Employee {actor_id} may not act on behalf of employee {employee_id}"
                )
            }
            Self::OpenRequestExists {
                employee_id,
                request_id,
            } => {
                write!(
                    f,
                    "Employee {employee_id} already has pending allocation request {request_id}"
                )
            }
            Self::ActiveAssignmentExists {
                employee_id,
                assignment_id,
            } => {
                write!(
                    f,
                    "Employee {employee_id} already has active assignment {assignment_id}"
                )
            }
            Self::CapacityExceeded {
                employee_id,
                current,
                requested,
                available,
            } => {
                write!(
                    f,
                    "Employee {employee_id} is allocated {current}%, cannot add {requested}% ({available}% available)"
                )
            }
            Self::StaleAssignmentVersion {
                assignment_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Assignment {assignment_id} was modified concurrently (expected version {expected}, found {actual})"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}

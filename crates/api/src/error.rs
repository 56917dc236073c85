// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer and their translation from core errors.

use skillbridge::CoreError;
use skillbridge_domain::DomainError;
use thiserror::Error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The caller's identity could not be established.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller's role may not perform the action.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

/// Errors returned by every handler.
///
/// Domain and core errors never cross this boundary directly; they are
/// translated by [`translate_domain_error`] and [`translate_core_error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// The caller's role may not perform the action.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        action: String,
        required_role: String,
    },

    /// The caller has the right role but not the right relationship to the
    /// target, such as a manager acting on another manager's report.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        resource_type: String,
        message: String,
    },

    /// The target is not in a state that allows the operation.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// The operation would duplicate an open request or active assignment.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Committing the allocation would take the employee past 100%.
    #[error(
        "Capacity exceeded for employee {employee_id}: {current}% committed, \
         {requested}% requested, {available}% available"
    )]
    CapacityExceeded {
        employee_id: i64,
        current: u32,
        requested: u32,
        available: u32,
    },

    /// The assignment changed since the caller read it.
    #[error("Concurrent modification: {message}")]
    ConcurrentModification { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

fn invalid_input(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn not_found(resource_type: &str, err: &DomainError) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidAllocationPercent(_) => invalid_input("allocation_percent", &err),
        DomainError::InvalidBillingType(_) | DomainError::MissingBillingType => {
            invalid_input("billing_type", &err)
        }
        DomainError::InvalidRequestStatus(_)
        | DomainError::InvalidAssignmentStatus(_)
        | DomainError::InvalidProjectStatus(_) => invalid_input("status", &err),
        DomainError::InvalidRole(_) => invalid_input("role", &err),
        DomainError::BlankRejectionReason => invalid_input("reason", &err),
        DomainError::InvalidDateRange { .. } => invalid_input("end_date", &err),
        DomainError::DateParseError { .. } => invalid_input("date", &err),
        DomainError::ProjectNotAssignable { .. } => invalid_input("project_id", &err),
        DomainError::EmployeeNotFound(_) => not_found("Employee", &err),
        DomainError::ProjectNotFound(_) => not_found("Project", &err),
        DomainError::RequestNotFound(_) => not_found("Allocation request", &err),
        DomainError::AssignmentNotFound(_) => not_found("Assignment", &err),
        DomainError::ProjectNotActivatable { .. }
        | DomainError::RequestNotInState { .. }
        | DomainError::InvalidRequestTransition { .. }
        | DomainError::AssignmentNotActive(_) => ApiError::InvalidState {
            message: err.to_string(),
        },
        DomainError::NotDirectManager { .. }
        | DomainError::RoleNotPermitted { .. }
        | DomainError::RoleMismatch { .. }
        | DomainError::NotRequestOwner { .. } => ApiError::Forbidden {
            message: err.to_string(),
        },
        DomainError::OpenRequestExists { .. } | DomainError::ActiveAssignmentExists { .. } => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        DomainError::CapacityExceeded {
            employee_id,
            current,
            requested,
            available,
        } => ApiError::CapacityExceeded {
            employee_id: *employee_id,
            current: *current,
            requested: *requested,
            available: *available,
        },
        DomainError::StaleAssignmentVersion { .. } => ApiError::ConcurrentModification {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Store(_) | CoreError::UnsupportedCommand(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

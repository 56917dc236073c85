// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity and role gating.
//!
//! Identity is established by an authentication gateway in front of this
//! service; the API only parses what the gateway asserts. Role gating here
//! is coarse. The core re-checks the finer relationships (ownership, direct
//! reports) against the directory.

use skillbridge::Caller;
use skillbridge_audit::Actor;
use skillbridge_domain::EmployeeRole;
use std::str::FromStr;

use crate::error::AuthError;

/// A caller whose identity the gateway has vouched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// Directory identifier of the caller.
    pub employee_id: i64,
    /// Role the gateway asserted.
    pub role: EmployeeRole,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(employee_id: i64, role: EmployeeRole) -> Self {
        Self { employee_id, role }
    }

    /// Builds an actor from the raw identity strings the gateway forwards.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the identifier is not a
    /// positive integer or the role is unknown.
    pub fn from_asserted(employee_id: &str, role: &str) -> Result<Self, AuthError> {
        let employee_id: i64 = employee_id
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("'{employee_id}' is not a valid employee id"),
            })?;
        let role: EmployeeRole =
            EmployeeRole::from_str(role).map_err(|e| AuthError::AuthenticationFailed {
                reason: e.to_string(),
            })?;
        Ok(Self::new(employee_id, role))
    }

    /// Returns the engine-level caller.
    #[must_use]
    pub const fn to_caller(&self) -> Caller {
        Caller::new(self.employee_id, self.role)
    }

    /// Converts this actor into an audit `Actor`.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        self.to_caller().to_actor()
    }
}

fn require(
    actor: &AuthenticatedActor,
    allowed: &[EmployeeRole],
    action: &str,
) -> Result<(), AuthError> {
    if allowed.contains(&actor.role) {
        return Ok(());
    }
    let required_role: String = allowed
        .iter()
        .map(EmployeeRole::as_str)
        .collect::<Vec<&str>>()
        .join(" or ");
    Err(AuthError::Unauthorized {
        action: action.to_string(),
        required_role,
    })
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Only managers forward requests.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a manager.
    pub fn authorize_forward_request(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        require(actor, &[EmployeeRole::Manager], "forward_request")
    }

    /// Only HR approves requests.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is HR.
    pub fn authorize_approve_request(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        require(actor, &[EmployeeRole::Hr], "approve_request")
    }

    /// Managers reject at the first stage, HR at the second.
    ///
    /// # Errors
    ///
    /// Returns an error for employees.
    pub fn authorize_reject_request(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        require(
            actor,
            &[EmployeeRole::Manager, EmployeeRole::Hr],
            "reject_request",
        )
    }

    /// Reviewers see a queue; employees do not have one.
    ///
    /// # Errors
    ///
    /// Returns an error for employees.
    pub fn authorize_review_queue(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        require(
            actor,
            &[EmployeeRole::Manager, EmployeeRole::Hr],
            "list_pending_requests",
        )
    }

    /// Creating, ending, and updating assignments directly.
    ///
    /// # Errors
    ///
    /// Returns an error for employees.
    pub fn authorize_manage_assignments(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        require(
            actor,
            &[EmployeeRole::Manager, EmployeeRole::Hr],
            "manage_assignments",
        )
    }

    /// The organization-wide assignment list is HR only.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is HR.
    pub fn authorize_list_all_assignments(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        require(actor, &[EmployeeRole::Hr], "list_all_assignments")
    }

    /// Project activation is HR only.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is HR.
    pub fn authorize_activate_project(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        require(actor, &[EmployeeRole::Hr], "activate_project")
    }

    /// Team and organization utilization views.
    ///
    /// # Errors
    ///
    /// Returns an error for employees.
    pub fn authorize_utilization_reports(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        require(
            actor,
            &[EmployeeRole::Manager, EmployeeRole::Hr],
            "view_utilization_reports",
        )
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use skillbridge_audit::{AuditEvent, StateSnapshot};
use skillbridge_domain::{
    AllocationRequest, Assignment, Employee, Project, committed_allocation,
};

/// Allocation state of one employee, loaded inside a serialized unit of work.
///
/// Besides the employee's own assignments and open request, the state
/// carries the entities the current command targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// The employee whose allocation is affected.
    pub employee: Employee,
    /// All assignments of the employee, active and ended.
    pub assignments: Vec<Assignment>,
    /// The employee's non-terminal request, if any.
    pub open_request: Option<AllocationRequest>,
    /// The request the command targets, if any.
    pub request: Option<AllocationRequest>,
    /// The project the command targets, if any.
    pub project: Option<Project>,
}

impl State {
    /// Returns the employee identifier.
    #[must_use]
    pub fn employee_id(&self) -> i64 {
        self.employee.employee_id.unwrap_or_default()
    }

    /// Looks up one of the employee's assignments.
    #[must_use]
    pub fn find_assignment(&self, assignment_id: i64) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.assignment_id == Some(assignment_id))
    }

    /// Returns the first active assignment, if any.
    #[must_use]
    pub fn first_active_assignment(&self) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.is_active())
    }

    /// Summarizes the state for the audit trail.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let active: Vec<String> = self
            .assignments
            .iter()
            .filter(|a| a.is_active())
            .map(|a| {
                format!(
                    "{}:project={}:{}:{}",
                    a.assignment_id
                        .map_or_else(|| String::from("new"), |id| id.to_string()),
                    a.project_id,
                    a.allocation_percent,
                    a.billing_type
                )
            })
            .collect();
        let open_request: String = self.open_request.as_ref().map_or_else(
            || String::from("none"),
            |r| {
                format!(
                    "{}:{}",
                    r.request_id
                        .map_or_else(|| String::from("new"), |id| id.to_string()),
                    r.status
                )
            },
        );
        StateSnapshot::new(format!(
            "employee_id={},committed={},active=[{}],open_request={}",
            self.employee_id(),
            committed_allocation(&self.assignments, None),
            active.join(","),
            open_request
        ))
    }

    /// Returns the state as it will look once `mutations` are committed.
    #[must_use]
    pub fn after(&self, mutations: &[Mutation]) -> Self {
        let mut next: Self = self.clone();
        for mutation in mutations {
            match mutation {
                Mutation::InsertRequest(request) | Mutation::UpdateRequest(request) => {
                    next.open_request = request.is_open().then(|| request.clone());
                    next.request = Some(request.clone());
                }
                Mutation::InsertAssignment(assignment) => {
                    next.assignments.push(assignment.clone());
                }
                Mutation::UpdateAssignment { assignment, .. } => {
                    if let Some(slot) = next
                        .assignments
                        .iter_mut()
                        .find(|a| a.assignment_id == assignment.assignment_id)
                    {
                        *slot = assignment.clone();
                    }
                }
                Mutation::UpdateProject(project) => next.project = Some(project.clone()),
            }
        }
        next
    }
}

/// One write produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Persist a new request.
    InsertRequest(AllocationRequest),
    /// Overwrite an existing request.
    UpdateRequest(AllocationRequest),
    /// Persist a new assignment.
    InsertAssignment(Assignment),
    /// Overwrite an assignment guarded by its version.
    UpdateAssignment {
        /// The new contents.
        assignment: Assignment,
        /// The version the change was based on.
        expected_version: i64,
    },
    /// Persist a project status change.
    UpdateProject(Project),
}

/// The result of applying a command.
///
/// Nothing has been written yet; the mutations and the audit event are
/// committed together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// Writes to perform, in order.
    pub mutations: Vec<Mutation>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// What a committed transition wrote, with store-assigned identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    /// The request written, if any.
    pub request: Option<AllocationRequest>,
    /// The assignment written, if any.
    pub assignment: Option<Assignment>,
    /// The project written, if any.
    pub project: Option<Project>,
    /// The audit event identifier.
    pub event_id: i64,
}

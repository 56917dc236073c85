// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::caller::Caller;
use crate::clock::Clock;
use crate::command::{AssignmentDraft, Command};
use crate::engine::{Engine, verify_caller, visible_employee};
use crate::error::CoreError;
use crate::policy::WorkflowPolicy;
use crate::state::CommitReceipt;
use crate::store::UnitOfWork;
use crate::views::{AllocationDetail, CurrentAllocation, ProjectNames, allocation_detail};
use skillbridge_audit::{AuditEvent, Cause};
use skillbridge_domain::{
    Assignment, AssignmentChanges, EmployeeRole, Project, current_assignment,
    most_recent_assignment,
};
use tracing::info;

/// Direct assignment management, outside the request workflow.
///
/// Creation and updates run the same capacity check as approval, inside the
/// same per-employee serialization.
pub struct AssignmentManager<'a, U: UnitOfWork> {
    engine: Engine<'a, U>,
}

impl<'a, U: UnitOfWork> AssignmentManager<'a, U> {
    /// Creates a manager over a unit of work.
    pub const fn new(uow: &'a mut U, clock: &'a dyn Clock, policy: WorkflowPolicy) -> Self {
        Self {
            engine: Engine::new(uow, clock, policy),
        }
    }

    /// Creates an `ACTIVE` assignment.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input or an unassignable project,
    /// forbidden if the caller lacks staffing authority over the employee,
    /// and a capacity error if the allocation does not fit.
    pub fn create_assignment(
        &mut self,
        caller: Caller,
        cause: Cause,
        draft: AssignmentDraft,
    ) -> Result<Assignment, CoreError> {
        let receipt: CommitReceipt = self
            .engine
            .execute(caller, cause, Command::CreateAssignment(draft))?;
        let assignment: Assignment = committed_assignment(receipt)?;
        info!(
            assignment_id = ?assignment.assignment_id,
            employee_id = assignment.employee_id,
            percent = assignment.allocation_percent.value(),
            "Assignment created"
        );
        Ok(assignment)
    }

    /// Ends an `ACTIVE` assignment today.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown assignment and an invalid-state
    /// error if it has already ended.
    pub fn end_assignment(
        &mut self,
        caller: Caller,
        cause: Cause,
        assignment_id: i64,
    ) -> Result<Assignment, CoreError> {
        let receipt: CommitReceipt = self
            .engine
            .execute(caller, cause, Command::EndAssignment { assignment_id })?;
        committed_assignment(receipt)
    }

    /// Applies a partial update guarded by `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns a concurrent-modification error if the assignment changed
    /// since `expected_version` was read, and a capacity error if a new
    /// percentage does not fit.
    pub fn update_assignment(
        &mut self,
        caller: Caller,
        cause: Cause,
        assignment_id: i64,
        expected_version: i64,
        changes: AssignmentChanges,
    ) -> Result<Assignment, CoreError> {
        let receipt: CommitReceipt = self.engine.execute(
            caller,
            cause,
            Command::UpdateAssignment {
                assignment_id,
                expected_version,
                changes,
            },
        )?;
        committed_assignment(receipt)
    }

    /// Moves a `PLANNED` project to `ACTIVE`. HR only.
    ///
    /// # Errors
    ///
    /// Returns forbidden for other roles and an invalid-state error unless
    /// the project is `PLANNED`.
    pub fn activate_project(
        &mut self,
        caller: Caller,
        cause: Cause,
        project_id: i64,
    ) -> Result<Project, CoreError> {
        let receipt: CommitReceipt = self
            .engine
            .execute(caller, cause, Command::ActivateProject { project_id })?;
        receipt
            .project
            .ok_or_else(|| CoreError::Store(String::from("activation wrote no project")))
    }

    /// Returns the employee's assignment with the latest start date, in any
    /// status.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown employee and forbidden if the caller
    /// may not see them.
    pub fn most_recent_for(
        &mut self,
        caller: Caller,
        employee_id: i64,
    ) -> Result<Option<Assignment>, CoreError> {
        self.engine.read(move |stores| {
            visible_employee(stores, caller, employee_id)?;
            let assignments: Vec<Assignment> = stores.list_assignments_for_employee(employee_id)?;
            Ok(most_recent_assignment(&assignments).cloned())
        })
    }

    /// Returns what the employee is working on now.
    ///
    /// Falls back to the most recent ended assignment; bench means the
    /// employee has never been assigned.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown employee and forbidden if the caller
    /// may not see them.
    pub fn current_allocation(
        &mut self,
        caller: Caller,
        employee_id: i64,
    ) -> Result<CurrentAllocation, CoreError> {
        self.engine.read(move |stores| {
            visible_employee(stores, caller, employee_id)?;
            let assignments: Vec<Assignment> = stores.list_assignments_for_employee(employee_id)?;
            let Some(current) = current_assignment(&assignments) else {
                return Ok(CurrentAllocation::Bench);
            };
            let names: ProjectNames = ProjectNames::load(stores)?;
            Ok(CurrentAllocation::Assigned(allocation_detail(current, &names)))
        })
    }

    /// Lists one employee's assignments.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown employee and forbidden if the caller
    /// may not see them.
    pub fn list_for_employee(
        &mut self,
        caller: Caller,
        employee_id: i64,
    ) -> Result<Vec<AllocationDetail>, CoreError> {
        self.engine.read(move |stores| {
            visible_employee(stores, caller, employee_id)?;
            let assignments: Vec<Assignment> = stores.list_assignments_for_employee(employee_id)?;
            let names: ProjectNames = ProjectNames::load(stores)?;
            Ok(assignments
                .iter()
                .map(|a| allocation_detail(a, &names))
                .collect())
        })
    }

    /// Lists every assignment. HR only.
    ///
    /// # Errors
    ///
    /// Returns forbidden for other roles.
    pub fn list_all(&mut self, caller: Caller) -> Result<Vec<Assignment>, CoreError> {
        self.engine.read(move |stores| {
            verify_caller(stores, caller)?;
            caller.require_role(EmployeeRole::Hr, "list all assignments")?;
            stores.list_assignments()
        })
    }

    /// Returns the audit trail for one employee, oldest first.
    ///
    /// # Errors
    ///
    /// Returns forbidden if the caller may not see the employee.
    pub fn audit_trail(
        &mut self,
        caller: Caller,
        employee_id: i64,
    ) -> Result<Vec<AuditEvent>, CoreError> {
        self.engine.read(move |stores| {
            visible_employee(stores, caller, employee_id)?;
            stores.list_events_for_employee(employee_id)
        })
    }
}

fn committed_assignment(receipt: CommitReceipt) -> Result<Assignment, CoreError> {
    receipt
        .assignment
        .ok_or_else(|| CoreError::Store(String::from("transition wrote no assignment")))
}

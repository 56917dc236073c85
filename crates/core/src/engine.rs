// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Command execution: load, apply, commit.
//!
//! Every employee-scoped command runs as
//! `serialized(employee) { load state -> apply -> commit }`, so the state a
//! decision is based on cannot change before its writes land.

use crate::apply::{ApplyContext, apply, apply_catalog};
use crate::caller::Caller;
use crate::clock::Clock;
use crate::command::Command;
use crate::error::CoreError;
use crate::policy::WorkflowPolicy;
use crate::state::{CommitReceipt, Mutation, State, TransitionResult};
use crate::store::{Stores, UnitOfWork};
use skillbridge_audit::Cause;
use skillbridge_domain::{AllocationRequest, Assignment, DomainError, Employee, Project};
use tracing::{debug, info};

/// Shared execution context for the command facades.
pub struct Engine<'a, U: UnitOfWork> {
    pub(crate) uow: &'a mut U,
    pub(crate) clock: &'a dyn Clock,
    pub(crate) policy: WorkflowPolicy,
}

impl<'a, U: UnitOfWork> Engine<'a, U> {
    /// Creates an engine over a unit of work.
    pub const fn new(uow: &'a mut U, clock: &'a dyn Clock, policy: WorkflowPolicy) -> Self {
        Self { uow, clock, policy }
    }

    /// Executes one command atomically.
    ///
    /// # Errors
    ///
    /// Returns the first domain violation or store failure. Nothing is
    /// written when an error is returned.
    pub fn execute(
        &mut self,
        caller: Caller,
        cause: Cause,
        command: Command,
    ) -> Result<CommitReceipt, CoreError> {
        let clock: &dyn Clock = self.clock;
        let policy: WorkflowPolicy = self.policy;

        if let Command::ActivateProject { project_id } = command {
            return self.uow.atomically(move |stores| {
                verify_caller(stores, caller)?;
                let project: Option<Project> = stores.find_project(project_id)?;
                let context: ApplyContext = ApplyContext {
                    caller,
                    cause,
                    now: clock.now(),
                    policy,
                };
                let result: TransitionResult =
                    apply_catalog(&context, project.as_ref(), command)?;
                commit(stores, result)
            });
        }

        let employee_id: i64 = self.resolve_scope(&command)?;
        debug!(employee_id, command = command.name(), "Executing command");

        self.uow.serialized(employee_id, move |stores| {
            verify_caller(stores, caller)?;
            let state: State = load_state(stores, employee_id, &command)?;
            let context: ApplyContext = ApplyContext {
                caller,
                cause,
                now: clock.now(),
                policy,
            };
            let result: TransitionResult = apply(&context, &state, command)?;
            commit(stores, result)
        })
    }

    /// Runs a read-only query in one consistent transaction.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a store error.
    pub fn read<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Stores) -> Result<T, CoreError>,
    {
        self.uow.atomically(work)
    }

    /// Finds the employee whose allocation state a command touches.
    ///
    /// Request and assignment ownership never changes, so reading it outside
    /// the serialized unit is safe.
    fn resolve_scope(&mut self, command: &Command) -> Result<i64, CoreError> {
        match command {
            Command::CreateRequest { employee_id, .. } => Ok(*employee_id),
            Command::CreateAssignment(draft) => Ok(draft.employee_id),
            Command::ActivateProject { .. } => Err(CoreError::UnsupportedCommand(command.name())),
            Command::ForwardRequest { request_id, .. }
            | Command::ApproveRequest { request_id, .. }
            | Command::RejectRequest { request_id, .. } => {
                let request_id: i64 = *request_id;
                self.uow.atomically(|stores| {
                    stores
                        .find_request(request_id)?
                        .map(|r| r.employee_id)
                        .ok_or_else(|| DomainError::RequestNotFound(request_id).into())
                })
            }
            Command::EndAssignment { assignment_id }
            | Command::UpdateAssignment { assignment_id, .. } => {
                let assignment_id: i64 = *assignment_id;
                self.uow.atomically(|stores| {
                    stores
                        .find_assignment(assignment_id)?
                        .map(|a| a.employee_id)
                        .ok_or_else(|| DomainError::AssignmentNotFound(assignment_id).into())
                })
            }
        }
    }
}

/// Loads the caller's directory record and checks the claimed role.
pub(crate) fn verify_caller(
    stores: &mut dyn Stores,
    caller: Caller,
) -> Result<Employee, CoreError> {
    let record: Employee = stores
        .find_employee(caller.employee_id)?
        .ok_or(DomainError::EmployeeNotFound(caller.employee_id))?;
    caller.verify(&record)?;
    Ok(record)
}

/// Loads an employee the caller is allowed to read about.
pub(crate) fn visible_employee(
    stores: &mut dyn Stores,
    caller: Caller,
    employee_id: i64,
) -> Result<Employee, CoreError> {
    verify_caller(stores, caller)?;
    let employee: Employee = stores
        .find_employee(employee_id)?
        .ok_or(DomainError::EmployeeNotFound(employee_id))?;
    caller.require_visibility(&employee)?;
    Ok(employee)
}

/// Loads an employee and everything a command against them needs.
fn load_state(
    stores: &mut dyn Stores,
    employee_id: i64,
    command: &Command,
) -> Result<State, CoreError> {
    let employee: Employee = stores
        .find_employee(employee_id)?
        .ok_or(DomainError::EmployeeNotFound(employee_id))?;
    let assignments: Vec<Assignment> = stores.list_assignments_for_employee(employee_id)?;
    let open_request: Option<AllocationRequest> = stores.find_open_request(employee_id)?;

    let request: Option<AllocationRequest> = match command.target_request() {
        Some(request_id) => stores.find_request(request_id)?,
        None => None,
    };

    let project_id: Option<i64> = match command {
        Command::CreateRequest { project_id, .. } => Some(*project_id),
        Command::CreateAssignment(draft) => Some(draft.project_id),
        Command::ApproveRequest { .. } => request.as_ref().map(|r| r.project_id),
        _ => None,
    };
    let project: Option<Project> = match project_id {
        Some(project_id) => stores.find_project(project_id)?,
        None => None,
    };

    Ok(State {
        employee,
        assignments,
        open_request,
        request,
        project,
    })
}

/// Performs the writes of a transition and records its audit event.
fn commit(stores: &mut dyn Stores, result: TransitionResult) -> Result<CommitReceipt, CoreError> {
    let mut receipt: CommitReceipt = CommitReceipt::default();

    for mutation in result.mutations {
        match mutation {
            Mutation::InsertRequest(request) => {
                let request_id: i64 = stores.insert_request(&request)?;
                receipt.request = Some(request.with_id(request_id));
            }
            Mutation::UpdateRequest(request) => {
                stores.update_request(&request)?;
                receipt.request = Some(request);
            }
            Mutation::InsertAssignment(assignment) => {
                let assignment_id: i64 = stores.insert_assignment(&assignment)?;
                receipt.assignment = Some(assignment.with_id(assignment_id));
            }
            Mutation::UpdateAssignment {
                mut assignment,
                expected_version,
            } => {
                if !stores.update_assignment(&assignment, expected_version)? {
                    let assignment_id: i64 = assignment.assignment_id.unwrap_or_default();
                    let actual: i64 = stores
                        .find_assignment(assignment_id)?
                        .map_or(expected_version, |a| a.version);
                    return Err(DomainError::StaleAssignmentVersion {
                        assignment_id,
                        expected: expected_version,
                        actual,
                    }
                    .into());
                }
                assignment.version = expected_version + 1;
                receipt.assignment = Some(assignment);
            }
            Mutation::UpdateProject(project) => {
                let project_id: i64 = project.project_id.unwrap_or_default();
                stores.update_project_status(project_id, project.status)?;
                receipt.project = Some(project);
            }
        }
    }

    receipt.event_id = stores.record_event(&result.audit_event)?;
    info!(
        action = %result.audit_event.action.name,
        employee_id = ?result.audit_event.employee_id,
        actor_id = result.audit_event.actor.employee_id,
        event_id = receipt.event_id,
        "Committed transition"
    );
    Ok(receipt)
}

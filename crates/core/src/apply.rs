// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::caller::Caller;
use crate::command::{AssignmentDraft, Command};
use crate::error::CoreError;
use crate::policy::WorkflowPolicy;
use crate::state::{Mutation, State, TransitionResult};
use skillbridge_audit::{Action, AuditEvent, Cause, StateSnapshot};
use skillbridge_domain::{
    AllocationPercent, AllocationRequest, Assignment, AssignmentChanges, CapacityCheck,
    DomainError, EmployeeRole, Project, ProjectStatus, RequestStatus, check_capacity,
};
use time::OffsetDateTime;

/// Inputs to `apply` that are not part of the loaded state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyContext {
    /// Who issues the command. The role has already been verified against
    /// the directory.
    pub caller: Caller,
    /// Why the command was issued.
    pub cause: Cause,
    /// The instant the command is applied at.
    pub now: OffsetDateTime,
    /// Behavior switches.
    pub policy: WorkflowPolicy,
}

/// Applies an employee-scoped command, producing the writes to perform and
/// an audit event.
///
/// This function is pure: it never touches a store. All checks that depend
/// on current commitments (conflicts, capacity, versions) run against
/// `state`, which the caller loads inside the same serialized unit of work
/// the resulting mutations are committed in.
///
/// # Arguments
///
/// * `context` - Caller, cause, time and policy
/// * `state` - The employee's current allocation state
/// * `command` - The command to apply
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not allowed to perform the command
/// - The targeted entity is missing or in the wrong state
/// - The command would violate the capacity invariant
/// - The command carries invalid input
pub fn apply(
    context: &ApplyContext,
    state: &State,
    command: Command,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    let (mutations, details): (Vec<Mutation>, String) = match command {
        Command::CreateRequest {
            employee_id,
            project_id,
        } => create_request(context, state, employee_id, project_id)?,
        Command::ForwardRequest {
            request_id,
            billing_type,
            comments,
        } => {
            let request: &AllocationRequest = target_request(state, request_id)?;
            if !state.employee.reports_to(context.caller.employee_id) {
                return Err(DomainError::NotDirectManager {
                    actor_id: context.caller.employee_id,
                    employee_id: state.employee_id(),
                }
                .into());
            }
            request.ensure_status(RequestStatus::PendingManager)?;
            let billing_type = billing_type.ok_or(DomainError::MissingBillingType)?;
            let forwarded: AllocationRequest =
                request.forward(context.caller.employee_id, billing_type, comments, context.now)?;
            (
                vec![Mutation::UpdateRequest(forwarded)],
                format!("Forwarded as {billing_type}"),
            )
        }
        Command::ApproveRequest {
            request_id,
            allocation_percent,
        } => approve_request(context, state, request_id, allocation_percent)?,
        Command::RejectRequest { request_id, reason } => {
            let request: &AllocationRequest = target_request(state, request_id)?;
            match context.caller.role {
                EmployeeRole::Hr => {}
                EmployeeRole::Manager => {
                    if !state.employee.reports_to(context.caller.employee_id) {
                        return Err(DomainError::NotDirectManager {
                            actor_id: context.caller.employee_id,
                            employee_id: state.employee_id(),
                        }
                        .into());
                    }
                }
                EmployeeRole::Employee => {
                    return Err(context.caller.not_permitted("reject requests").into());
                }
            }
            // Each reviewer may only decide the stage they own
            let owned_stage: RequestStatus = if context.caller.role == EmployeeRole::Hr {
                RequestStatus::PendingHr
            } else {
                RequestStatus::PendingManager
            };
            request.ensure_status(owned_stage)?;
            let rejected: AllocationRequest =
                request.reject(context.caller.employee_id, &reason, context.now)?;
            (
                vec![Mutation::UpdateRequest(rejected)],
                format!("Rejected at {owned_stage}"),
            )
        }
        Command::CreateAssignment(draft) => create_assignment(context, state, draft)?,
        Command::EndAssignment { assignment_id } => {
            context
                .caller
                .require_staffing_authority(&state.employee, "end assignments")?;
            let assignment: &Assignment = state
                .find_assignment(assignment_id)
                .ok_or(DomainError::AssignmentNotFound(assignment_id))?;
            let ended: Assignment = assignment.end(context.now.date())?;
            let details: String = format!(
                "Ended assignment {assignment_id} on {}",
                ended.end_date.unwrap_or(ended.start_date)
            );
            (
                vec![Mutation::UpdateAssignment {
                    assignment: ended,
                    expected_version: assignment.version,
                }],
                details,
            )
        }
        Command::UpdateAssignment {
            assignment_id,
            expected_version,
            changes,
        } => update_assignment(context, state, assignment_id, expected_version, &changes)?,
        Command::ActivateProject { .. } => {
            return Err(CoreError::UnsupportedCommand(name));
        }
    };

    let before: StateSnapshot = state.to_snapshot();
    let after: StateSnapshot = state.after(&mutations).to_snapshot();
    let audit_event: AuditEvent = AuditEvent::new(
        Some(state.employee_id()),
        context.caller.to_actor(),
        context.cause.clone(),
        Action::named(name).with_details(details),
        before,
        after,
        context.now,
    );

    Ok(TransitionResult {
        mutations,
        audit_event,
    })
}

/// Applies a catalog command against one project.
///
/// # Errors
///
/// Returns an error if the caller is not HR, the project does not exist, or
/// the project cannot move to the requested status.
pub fn apply_catalog(
    context: &ApplyContext,
    project: Option<&Project>,
    command: Command,
) -> Result<TransitionResult, CoreError> {
    let Command::ActivateProject { project_id } = command else {
        return Err(CoreError::UnsupportedCommand(command.name()));
    };

    context
        .caller
        .require_role(EmployeeRole::Hr, "activate projects")?;
    let project: &Project = project.ok_or(DomainError::ProjectNotFound(project_id))?;
    let activated: Project = project.activate(project_id)?;

    let audit_event: AuditEvent = AuditEvent::new(
        None,
        context.caller.to_actor(),
        context.cause.clone(),
        Action::named(command.name())
            .with_details(format!("Activated project {project_id} '{}'", project.name)),
        StateSnapshot::new(format!("project={project_id},status={}", project.status)),
        StateSnapshot::new(format!("project={project_id},status={}", activated.status)),
        context.now,
    );

    Ok(TransitionResult {
        mutations: vec![Mutation::UpdateProject(activated)],
        audit_event,
    })
}

fn target_request(state: &State, request_id: i64) -> Result<&AllocationRequest, DomainError> {
    state
        .request
        .as_ref()
        .filter(|r| r.request_id == Some(request_id))
        .ok_or(DomainError::RequestNotFound(request_id))
}

/// Resolves the project for a new assignment, promoting it when the policy
/// allows. Returns the promoted project if a status change is needed.
fn prepare_project(
    project: Option<&Project>,
    project_id: i64,
    policy: WorkflowPolicy,
) -> Result<Option<Project>, DomainError> {
    let project: &Project = project.ok_or(DomainError::ProjectNotFound(project_id))?;
    if project.status == ProjectStatus::Planned && policy.promote_planned_projects {
        return project.activate(project_id).map(Some);
    }
    project.ensure_assignable(project_id)?;
    Ok(None)
}

fn create_request(
    context: &ApplyContext,
    state: &State,
    employee_id: i64,
    project_id: i64,
) -> Result<(Vec<Mutation>, String), CoreError> {
    if context.caller.employee_id != employee_id {
        return Err(DomainError::NotRequestOwner {
            actor_id: context.caller.employee_id,
            employee_id,
        }
        .into());
    }

    let project: &Project = state
        .project
        .as_ref()
        .ok_or(DomainError::ProjectNotFound(project_id))?;
    if !project.status.accepts_requests() {
        return Err(DomainError::ProjectNotAssignable {
            project_id,
            status: project.status,
        }
        .into());
    }

    if let Some(assignment) = state.first_active_assignment() {
        return Err(DomainError::ActiveAssignmentExists {
            employee_id,
            assignment_id: assignment.assignment_id.unwrap_or_default(),
        }
        .into());
    }
    if let Some(open) = &state.open_request {
        return Err(DomainError::OpenRequestExists {
            employee_id,
            request_id: open.request_id.unwrap_or_default(),
        }
        .into());
    }

    let request: AllocationRequest = AllocationRequest::new(employee_id, project_id, context.now);
    Ok((
        vec![Mutation::InsertRequest(request)],
        format!("Requested project {project_id} '{}'", project.name),
    ))
}

fn approve_request(
    context: &ApplyContext,
    state: &State,
    request_id: i64,
    allocation_percent: Option<AllocationPercent>,
) -> Result<(Vec<Mutation>, String), CoreError> {
    context
        .caller
        .require_role(EmployeeRole::Hr, "approve requests")?;
    let request: &AllocationRequest = target_request(state, request_id)?;
    let approved: AllocationRequest = request.approve(context.caller.employee_id, context.now)?;
    let billing_type = approved.billing_type.ok_or(DomainError::MissingBillingType)?;

    let mut mutations: Vec<Mutation> = Vec::new();
    let promoted: Option<Project> =
        prepare_project(state.project.as_ref(), request.project_id, context.policy)?;
    mutations.extend(promoted.map(Mutation::UpdateProject));

    let percent: AllocationPercent = allocation_percent.unwrap_or_default();
    let check: CapacityCheck = check_capacity(&state.assignments, percent, None);
    check.ensure_fits(state.employee_id())?;

    let assignment: Assignment = Assignment::new_active(
        state.employee_id(),
        request.project_id,
        billing_type,
        percent,
        context.now.date(),
        None,
        None,
    )?;
    let assignment: Assignment = assignment.from_request(request_id);

    mutations.push(Mutation::UpdateRequest(approved));
    mutations.push(Mutation::InsertAssignment(assignment));
    Ok((
        mutations,
        format!(
            "Approved at {percent} {billing_type} (committed {} of 100)",
            check.current_total + percent.value()
        ),
    ))
}

fn create_assignment(
    context: &ApplyContext,
    state: &State,
    draft: AssignmentDraft,
) -> Result<(Vec<Mutation>, String), CoreError> {
    context
        .caller
        .require_staffing_authority(&state.employee, "create assignments")?;

    let mut mutations: Vec<Mutation> = Vec::new();
    let promoted: Option<Project> =
        prepare_project(state.project.as_ref(), draft.project_id, context.policy)?;
    mutations.extend(promoted.map(Mutation::UpdateProject));

    let percent: AllocationPercent = draft.allocation_percent.unwrap_or_default();
    let assignment: Assignment = Assignment::new_active(
        draft.employee_id,
        draft.project_id,
        draft.billing_type,
        percent,
        draft.start_date,
        draft.end_date,
        draft.project_role,
    )?;

    let check: CapacityCheck = check_capacity(&state.assignments, percent, None);
    check.ensure_fits(draft.employee_id)?;

    let details: String = format!(
        "Assigned to project {} at {percent} {}",
        draft.project_id, draft.billing_type
    );
    mutations.push(Mutation::InsertAssignment(assignment));
    Ok((mutations, details))
}

fn update_assignment(
    context: &ApplyContext,
    state: &State,
    assignment_id: i64,
    expected_version: i64,
    changes: &AssignmentChanges,
) -> Result<(Vec<Mutation>, String), CoreError> {
    context
        .caller
        .require_staffing_authority(&state.employee, "update assignments")?;
    let assignment: &Assignment = state
        .find_assignment(assignment_id)
        .ok_or(DomainError::AssignmentNotFound(assignment_id))?;
    if assignment.version != expected_version {
        return Err(DomainError::StaleAssignmentVersion {
            assignment_id,
            expected: expected_version,
            actual: assignment.version,
        }
        .into());
    }

    let updated: Assignment = assignment.apply_changes(changes)?;
    check_capacity(
        &state.assignments,
        updated.allocation_percent,
        Some(assignment_id),
    )
    .ensure_fits(state.employee_id())?;

    let details: String = format!(
        "Updated assignment {assignment_id} at version {expected_version} to {} {}",
        updated.allocation_percent, updated.billing_type
    );
    Ok((
        vec![Mutation::UpdateAssignment {
            assignment: updated,
            expected_version,
        }],
        details,
    ))
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Each handler gates on role first, translates the request into domain
//! types, runs the core operation against the persistence adapter, and
//! maps the result into a response DTO.

use skillbridge::{
    AllocationDetail, AllocationWorkflow, Approval, AssignmentDraft, AssignmentManager, Clock,
    CurrentAllocation, EmployeeUtilization, OrgSummary, RequestView, TeamUtilization,
    UtilizationAggregator, WorkflowPolicy,
};
use skillbridge_audit::{AuditEvent, Cause};
use skillbridge_domain::{
    AllocationPercent, AllocationRequest, Assignment, AssignmentChanges, AssignmentStatus,
    BillingType, Project, format_iso_date, parse_iso_date,
};
use skillbridge_persistence::Persistence;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    AllocationDetailInfo, AllocationRequestInfo, ApproveRequestRequest, ApproveRequestResponse,
    AssignmentInfo, AuditEventInfo, AuditTrailResponse, CreateAllocationRequest,
    CreateAssignmentRequest, CurrentAllocationResponse, EmployeeAssignmentsResponse,
    EmployeeUtilizationResponse, ForwardRequestRequest, ListAssignmentsResponse,
    ListRequestsResponse, OrgSummaryResponse, ProjectInfo, RejectRequestRequest,
    TeamUtilizationResponse, UpdateAssignmentRequest,
};

/// Clock and policy shared by every handler call.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    /// Source of "now" and "today".
    pub clock: &'a dyn Clock,
    /// Engine behavior switches.
    pub policy: WorkflowPolicy,
}

impl<'a> HandlerContext<'a> {
    /// Creates a handler context.
    #[must_use]
    pub const fn new(clock: &'a dyn Clock, policy: WorkflowPolicy) -> Self {
        Self { clock, policy }
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn parse_percent(value: Option<i64>) -> Result<Option<AllocationPercent>, ApiError> {
    value
        .map(AllocationPercent::new)
        .transpose()
        .map_err(translate_domain_error)
}

fn parse_billing_type(value: &str) -> Result<BillingType, ApiError> {
    BillingType::from_str(value).map_err(translate_domain_error)
}

fn parse_date(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_iso_date(value).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value.map(|v| parse_date(field, v)).transpose()
}

fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn format_optional_timestamp(value: Option<OffsetDateTime>) -> Result<Option<String>, ApiError> {
    value.map(format_timestamp).transpose()
}

fn persisted_id(id: Option<i64>, what: &str) -> Result<i64, ApiError> {
    id.ok_or_else(|| ApiError::Internal {
        message: format!("{what} has no identifier"),
    })
}

// ============================================================================
// Response mapping
// ============================================================================

fn request_info(request: &AllocationRequest) -> Result<AllocationRequestInfo, ApiError> {
    Ok(AllocationRequestInfo {
        request_id: persisted_id(request.request_id, "Allocation request")?,
        employee_id: request.employee_id,
        employee_name: None,
        project_id: request.project_id,
        project_name: None,
        status: request.status.as_str().to_string(),
        billing_type: request.billing_type.map(|b| b.as_str().to_string()),
        manager_comments: request.manager_comments.clone(),
        rejection_reason: request.rejection_reason.clone(),
        created_at: format_timestamp(request.created_at)?,
        forwarded_at: format_optional_timestamp(request.forwarded_at)?,
        forwarded_by: request.forwarded_by,
        forwarded_by_name: None,
        reviewed_at: format_optional_timestamp(request.reviewed_at)?,
        reviewed_by: request.reviewed_by,
    })
}

fn request_view_info(view: &RequestView) -> Result<AllocationRequestInfo, ApiError> {
    let mut info: AllocationRequestInfo = request_info(&view.request)?;
    info.employee_name = Some(view.employee_name.clone());
    info.project_name = Some(view.project_name.clone());
    info.forwarded_by_name.clone_from(&view.forwarded_by_name);
    Ok(info)
}

fn request_list(views: &[RequestView]) -> Result<ListRequestsResponse, ApiError> {
    Ok(ListRequestsResponse {
        requests: views
            .iter()
            .map(request_view_info)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn assignment_info(assignment: &Assignment) -> Result<AssignmentInfo, ApiError> {
    Ok(AssignmentInfo {
        assignment_id: persisted_id(assignment.assignment_id, "Assignment")?,
        employee_id: assignment.employee_id,
        project_id: assignment.project_id,
        request_id: assignment.request_id,
        status: assignment.status.as_str().to_string(),
        billing_type: assignment.billing_type.as_str().to_string(),
        allocation_percent: assignment.allocation_percent.value(),
        project_role: assignment.project_role.clone(),
        start_date: format_iso_date(assignment.start_date),
        end_date: assignment.end_date.map(format_iso_date),
        version: assignment.version,
    })
}

fn detail_info(detail: &AllocationDetail) -> AllocationDetailInfo {
    AllocationDetailInfo {
        assignment_id: detail.assignment_id,
        project_id: detail.project_id,
        project_name: detail.project_name.clone(),
        allocation_percent: detail.allocation_percent,
        billing_type: detail.billing_type.as_str().to_string(),
        status: detail.status.as_str().to_string(),
        project_role: detail.project_role.clone(),
        start_date: format_iso_date(detail.start_date),
        end_date: detail.end_date.map(format_iso_date),
        version: detail.version,
    }
}

fn utilization_info(utilization: &EmployeeUtilization) -> EmployeeUtilizationResponse {
    EmployeeUtilizationResponse {
        employee_id: utilization.employee_id,
        employee_name: utilization.employee_name.clone(),
        allocation_status: utilization.allocation_status.as_str().to_string(),
        total_allocation: utilization.total_allocation,
        available_capacity: utilization.available_capacity,
        allocations: utilization.allocations.iter().map(detail_info).collect(),
    }
}

fn audit_event_info(event: &AuditEvent) -> Result<AuditEventInfo, ApiError> {
    Ok(AuditEventInfo {
        event_id: event.event_id,
        actor_id: event.actor.employee_id,
        actor_role: event.actor.role.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
        occurred_at: format_timestamp(event.occurred_at)?,
    })
}

// ============================================================================
// Allocation requests
// ============================================================================

/// Opens a request for the calling employee.
///
/// # Errors
///
/// Returns `Conflict` if the caller already has an active assignment or an
/// open request, and `InvalidInput` if the project does not take requests.
pub fn create_request(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    request: &CreateAllocationRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AllocationRequestInfo, ApiError> {
    let created: AllocationRequest =
        AllocationWorkflow::new(persistence, context.clock, context.policy).create_request(
            actor.to_caller(),
            cause,
            actor.employee_id,
            request.project_id,
        )?;
    request_info(&created)
}

/// Lists the caller's own requests, newest first.
///
/// # Errors
///
/// Returns an error if the caller is unknown.
pub fn list_my_requests(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    actor: &AuthenticatedActor,
) -> Result<ListRequestsResponse, ApiError> {
    let views: Vec<RequestView> =
        AllocationWorkflow::new(persistence, context.clock, context.policy)
            .list_mine(actor.to_caller())?;
    request_list(&views)
}

/// Lists requests waiting on the caller.
///
/// # Errors
///
/// Returns `Unauthorized` for employees.
pub fn list_pending_requests(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    actor: &AuthenticatedActor,
) -> Result<ListRequestsResponse, ApiError> {
    AuthorizationService::authorize_review_queue(actor)?;
    let views: Vec<RequestView> =
        AllocationWorkflow::new(persistence, context.clock, context.policy)
            .list_pending_for_reviewer(actor.to_caller())?;
    request_list(&views)
}

/// Forwards a request to HR.
///
/// # Errors
///
/// Returns `Unauthorized` for non-managers, `Forbidden` unless the caller
/// manages the employee, and `InvalidInput` if the billing type is missing
/// or unknown.
pub fn forward_request(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    request_id: i64,
    request: ForwardRequestRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AllocationRequestInfo, ApiError> {
    AuthorizationService::authorize_forward_request(actor)?;
    let billing_type: Option<BillingType> = request
        .billing_type
        .as_deref()
        .map(parse_billing_type)
        .transpose()?;

    let forwarded: AllocationRequest =
        AllocationWorkflow::new(persistence, context.clock, context.policy).forward(
            actor.to_caller(),
            cause,
            request_id,
            billing_type,
            request.comments,
        )?;
    request_info(&forwarded)
}

/// Approves a request and creates its assignment.
///
/// # Errors
///
/// Returns `Unauthorized` for non-HR callers and `CapacityExceeded` if the
/// allocation does not fit.
pub fn approve_request(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    request_id: i64,
    request: &ApproveRequestRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApproveRequestResponse, ApiError> {
    AuthorizationService::authorize_approve_request(actor)?;
    let allocation_percent: Option<AllocationPercent> = parse_percent(request.allocation_percent)?;

    let approval: Approval = AllocationWorkflow::new(persistence, context.clock, context.policy)
        .approve(actor.to_caller(), cause, request_id, allocation_percent)?;

    info!(
        request_id,
        hr_id = actor.employee_id,
        percent = approval.assignment.allocation_percent.value(),
        "Approved allocation request"
    );
    Ok(ApproveRequestResponse {
        request: request_info(&approval.request)?,
        assignment: assignment_info(&approval.assignment)?,
    })
}

/// Rejects a request at the caller's stage.
///
/// # Errors
///
/// Returns `Unauthorized` for employees and `InvalidInput` for a blank reason.
pub fn reject_request(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    request_id: i64,
    request: &RejectRequestRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AllocationRequestInfo, ApiError> {
    AuthorizationService::authorize_reject_request(actor)?;
    let rejected: AllocationRequest =
        AllocationWorkflow::new(persistence, context.clock, context.policy).reject(
            actor.to_caller(),
            cause,
            request_id,
            &request.reason,
        )?;
    request_info(&rejected)
}

// ============================================================================
// Assignments
// ============================================================================

/// Creates an assignment without going through a request.
///
/// # Errors
///
/// Returns `Unauthorized` for employees, `InvalidInput` for malformed
/// fields, and `CapacityExceeded` if the allocation does not fit.
pub fn create_assignment(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    request: CreateAssignmentRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AssignmentInfo, ApiError> {
    AuthorizationService::authorize_manage_assignments(actor)?;
    let draft: AssignmentDraft = AssignmentDraft {
        employee_id: request.employee_id,
        project_id: request.project_id,
        billing_type: parse_billing_type(&request.billing_type)?,
        allocation_percent: parse_percent(request.allocation_percent)?,
        start_date: parse_date("start_date", &request.start_date)?,
        end_date: parse_optional_date("end_date", request.end_date.as_deref())?,
        project_role: request.project_role,
    };

    let assignment: Assignment =
        AssignmentManager::new(persistence, context.clock, context.policy).create_assignment(
            actor.to_caller(),
            cause,
            draft,
        )?;
    assignment_info(&assignment)
}

/// Ends an assignment today.
///
/// # Errors
///
/// Returns `Unauthorized` for employees and `InvalidState` if the
/// assignment has already ended.
pub fn end_assignment(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    assignment_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AssignmentInfo, ApiError> {
    AuthorizationService::authorize_manage_assignments(actor)?;
    let ended: Assignment = AssignmentManager::new(persistence, context.clock, context.policy)
        .end_assignment(actor.to_caller(), cause, assignment_id)?;
    assignment_info(&ended)
}

/// Applies a partial update guarded by the caller's version.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the version is stale.
pub fn update_assignment(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    assignment_id: i64,
    request: UpdateAssignmentRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AssignmentInfo, ApiError> {
    AuthorizationService::authorize_manage_assignments(actor)?;
    let changes: AssignmentChanges = AssignmentChanges {
        allocation_percent: parse_percent(request.allocation_percent)?,
        billing_type: request
            .billing_type
            .as_deref()
            .map(parse_billing_type)
            .transpose()?,
        project_role: request.project_role,
        start_date: parse_optional_date("start_date", request.start_date.as_deref())?,
        end_date: parse_optional_date("end_date", request.end_date.as_deref())?,
    };

    let updated: Assignment = AssignmentManager::new(persistence, context.clock, context.policy)
        .update_assignment(
            actor.to_caller(),
            cause,
            assignment_id,
            request.expected_version,
            changes,
        )?;
    assignment_info(&updated)
}

/// Lists every assignment in the organization.
///
/// # Errors
///
/// Returns `Unauthorized` for non-HR callers.
pub fn list_all_assignments(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    actor: &AuthenticatedActor,
) -> Result<ListAssignmentsResponse, ApiError> {
    AuthorizationService::authorize_list_all_assignments(actor)?;
    let assignments: Vec<Assignment> =
        AssignmentManager::new(persistence, context.clock, context.policy)
            .list_all(actor.to_caller())?;
    Ok(ListAssignmentsResponse {
        assignments: assignments
            .iter()
            .map(assignment_info)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

/// Lists one employee's assignments with project names.
///
/// # Errors
///
/// Returns `Forbidden` if the caller may not see the employee.
pub fn list_employee_assignments(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    employee_id: i64,
    actor: &AuthenticatedActor,
) -> Result<EmployeeAssignmentsResponse, ApiError> {
    let details: Vec<AllocationDetail> =
        AssignmentManager::new(persistence, context.clock, context.policy)
            .list_for_employee(actor.to_caller(), employee_id)?;
    Ok(EmployeeAssignmentsResponse {
        employee_id,
        allocations: details.iter().map(detail_info).collect(),
    })
}

/// Returns the assignment an employee is working on now, or bench.
///
/// # Errors
///
/// Returns `Forbidden` if the caller may not see the employee.
pub fn current_allocation(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    employee_id: i64,
    actor: &AuthenticatedActor,
) -> Result<CurrentAllocationResponse, ApiError> {
    let current: CurrentAllocation =
        AssignmentManager::new(persistence, context.clock, context.policy)
            .current_allocation(actor.to_caller(), employee_id)?;
    Ok(match current {
        CurrentAllocation::Assigned(detail) => CurrentAllocationResponse {
            employee_id,
            status: if detail.status == AssignmentStatus::Active {
                detail.billing_type.as_str().to_string()
            } else {
                String::from("BENCH")
            },
            allocation: Some(detail_info(&detail)),
        },
        CurrentAllocation::Bench => CurrentAllocationResponse {
            employee_id,
            status: String::from("BENCH"),
            allocation: None,
        },
    })
}

/// Returns the employee's most recent assignment in any status.
///
/// # Errors
///
/// Returns `Forbidden` if the caller may not see the employee.
pub fn most_recent_assignment(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    employee_id: i64,
    actor: &AuthenticatedActor,
) -> Result<Option<AssignmentInfo>, ApiError> {
    let latest: Option<Assignment> =
        AssignmentManager::new(persistence, context.clock, context.policy)
            .most_recent_for(actor.to_caller(), employee_id)?;
    latest.as_ref().map(assignment_info).transpose()
}

/// Moves a planned project to active.
///
/// # Errors
///
/// Returns `Unauthorized` for non-HR callers and `InvalidState` unless the
/// project is planned.
pub fn activate_project(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    project_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ProjectInfo, ApiError> {
    AuthorizationService::authorize_activate_project(actor)?;
    let project: Project = AssignmentManager::new(persistence, context.clock, context.policy)
        .activate_project(actor.to_caller(), cause, project_id)?;
    Ok(ProjectInfo {
        project_id: persisted_id(project.project_id, "Project")?,
        name: project.name,
        status: project.status.as_str().to_string(),
    })
}

/// Returns an employee's audit trail.
///
/// # Errors
///
/// Returns `Forbidden` if the caller may not see the employee.
pub fn audit_trail(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    employee_id: i64,
    actor: &AuthenticatedActor,
) -> Result<AuditTrailResponse, ApiError> {
    let events: Vec<AuditEvent> =
        AssignmentManager::new(persistence, context.clock, context.policy)
            .audit_trail(actor.to_caller(), employee_id)?;
    Ok(AuditTrailResponse {
        employee_id,
        events: events
            .iter()
            .map(audit_event_info)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

// ============================================================================
// Utilization
// ============================================================================

/// Returns one employee's utilization.
///
/// # Errors
///
/// Returns `Forbidden` if the caller may not see the employee.
pub fn employee_utilization(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    employee_id: i64,
    actor: &AuthenticatedActor,
) -> Result<EmployeeUtilizationResponse, ApiError> {
    let utilization: EmployeeUtilization =
        UtilizationAggregator::new(persistence, context.clock, context.policy)
            .employee_utilization(actor.to_caller(), employee_id)?;
    Ok(utilization_info(&utilization))
}

/// Returns utilization for a manager's direct reports.
///
/// # Errors
///
/// Returns `Unauthorized` for employees and `Forbidden` for a manager
/// asking about another manager's team.
pub fn team_utilization(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    manager_id: i64,
    actor: &AuthenticatedActor,
) -> Result<TeamUtilizationResponse, ApiError> {
    AuthorizationService::authorize_utilization_reports(actor)?;
    let team: TeamUtilization =
        UtilizationAggregator::new(persistence, context.clock, context.policy)
            .team_utilization(actor.to_caller(), manager_id)?;
    Ok(TeamUtilizationResponse {
        manager_id: team.manager_id,
        members: team.members.iter().map(utilization_info).collect(),
    })
}

/// Returns the organization-wide billable/investment/bench counts.
///
/// # Errors
///
/// Returns `Unauthorized` for employees.
pub fn org_summary(
    persistence: &mut Persistence,
    context: HandlerContext<'_>,
    actor: &AuthenticatedActor,
) -> Result<OrgSummaryResponse, ApiError> {
    AuthorizationService::authorize_utilization_reports(actor)?;
    let summary: OrgSummary =
        UtilizationAggregator::new(persistence, context.clock, context.policy)
            .org_summary(actor.to_caller())?;
    Ok(OrgSummaryResponse {
        total_employees: summary.total_employees,
        billable: summary.billable,
        investment: summary.investment,
        bench: summary.bench,
    })
}

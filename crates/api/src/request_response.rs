// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Enumerations and dates travel as strings (`"BILLABLE"`, `"2026-01-05"`);
//! handlers parse them into domain types and report bad values as
//! `ApiError::InvalidInput`.

use serde::{Deserialize, Serialize};

/// API request to open an allocation request for the calling employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAllocationRequest {
    /// The project the employee wants to join.
    pub project_id: i64,
}

/// API request to forward a request to HR.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForwardRequestRequest {
    /// `BILLABLE` or `INVESTMENT`. Required; an absent value is rejected.
    pub billing_type: Option<String>,
    /// Optional manager comments.
    pub comments: Option<String>,
}

/// API request to approve a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApproveRequestRequest {
    /// Allocation percentage for the new assignment. Defaults to 100.
    pub allocation_percent: Option<i64>,
}

/// API request to reject a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectRequestRequest {
    /// Why the request was rejected. Must not be blank.
    pub reason: String,
}

/// An allocation request as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequestInfo {
    /// Request identifier.
    pub request_id: i64,
    /// The employee the request is for.
    pub employee_id: i64,
    /// The employee's display name, when known.
    pub employee_name: Option<String>,
    /// The requested project.
    pub project_id: i64,
    /// The project's name, when known.
    pub project_name: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Billing type chosen by the manager.
    pub billing_type: Option<String>,
    /// Manager comments.
    pub manager_comments: Option<String>,
    /// Rejection reason.
    pub rejection_reason: Option<String>,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Forwarding time, RFC 3339.
    pub forwarded_at: Option<String>,
    /// The forwarding manager.
    pub forwarded_by: Option<i64>,
    /// The forwarding manager's name, when known.
    pub forwarded_by_name: Option<String>,
    /// Final decision time, RFC 3339.
    pub reviewed_at: Option<String>,
    /// Who made the final decision.
    pub reviewed_by: Option<i64>,
}

/// API response listing allocation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequestsResponse {
    /// The requests.
    pub requests: Vec<AllocationRequestInfo>,
}

/// API response for an approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveRequestResponse {
    /// The approved request.
    pub request: AllocationRequestInfo,
    /// The assignment created by the approval.
    pub assignment: AssignmentInfo,
}

/// API request to create an assignment directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    /// The employee to assign.
    pub employee_id: i64,
    /// The project.
    pub project_id: i64,
    /// `BILLABLE` or `INVESTMENT`.
    pub billing_type: String,
    /// Allocation percentage. Defaults to 100.
    pub allocation_percent: Option<i64>,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// Free-text role on the project.
    pub project_role: Option<String>,
}

/// API request for a partial assignment update.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateAssignmentRequest {
    /// The version the caller last read.
    pub expected_version: i64,
    /// New allocation percentage.
    pub allocation_percent: Option<i64>,
    /// New billing type.
    pub billing_type: Option<String>,
    /// New project role.
    pub project_role: Option<String>,
    /// New start date.
    pub start_date: Option<String>,
    /// New end date.
    pub end_date: Option<String>,
}

/// An assignment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    /// Assignment identifier.
    pub assignment_id: i64,
    /// The assigned employee.
    pub employee_id: i64,
    /// The project.
    pub project_id: i64,
    /// The approved request that produced this assignment, if any.
    pub request_id: Option<i64>,
    /// `ACTIVE` or `ENDED`.
    pub status: String,
    /// `BILLABLE` or `INVESTMENT`.
    pub billing_type: String,
    /// Allocation percentage.
    pub allocation_percent: u32,
    /// Free-text role on the project.
    pub project_role: Option<String>,
    /// First day.
    pub start_date: String,
    /// Last day.
    pub end_date: Option<String>,
    /// Optimistic concurrency version.
    pub version: i64,
}

/// API response listing assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAssignmentsResponse {
    /// The assignments.
    pub assignments: Vec<AssignmentInfo>,
}

/// One assignment inside a utilization view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationDetailInfo {
    /// Assignment identifier.
    pub assignment_id: i64,
    /// The project.
    pub project_id: i64,
    /// The project's name.
    pub project_name: String,
    /// Allocation percentage.
    pub allocation_percent: u32,
    /// `BILLABLE` or `INVESTMENT`.
    pub billing_type: String,
    /// `ACTIVE` or `ENDED`.
    pub status: String,
    /// Free-text role on the project.
    pub project_role: Option<String>,
    /// First day.
    pub start_date: String,
    /// Last day.
    pub end_date: Option<String>,
    /// Optimistic concurrency version.
    pub version: i64,
}

/// API response listing one employee's assignments with project names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAssignmentsResponse {
    /// The employee.
    pub employee_id: i64,
    /// Every assignment of the employee, oldest first.
    pub allocations: Vec<AllocationDetailInfo>,
}

/// API response describing what an employee is working on now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAllocationResponse {
    /// The employee.
    pub employee_id: i64,
    /// The billing type of an active assignment, otherwise `BENCH`.
    pub status: String,
    /// The current assignment, or the latest ended one; absent when the
    /// employee has never been assigned.
    pub allocation: Option<AllocationDetailInfo>,
}

/// API response for one employee's utilization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeUtilizationResponse {
    /// The employee.
    pub employee_id: i64,
    /// Display name.
    pub employee_name: String,
    /// `BILLABLE`, `INVESTMENT`, or `BENCH`.
    pub allocation_status: String,
    /// Sum of active allocation percentages.
    pub total_allocation: u32,
    /// `100 - total_allocation`.
    pub available_capacity: u32,
    /// Active assignments.
    pub allocations: Vec<AllocationDetailInfo>,
}

/// API response for a manager's team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUtilizationResponse {
    /// The manager.
    pub manager_id: i64,
    /// One entry per direct report.
    pub members: Vec<EmployeeUtilizationResponse>,
}

/// API response for the organization summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgSummaryResponse {
    /// Employees counted.
    pub total_employees: usize,
    /// Employees on at least one billable assignment.
    pub billable: usize,
    /// Employees on investment work only.
    pub investment: usize,
    /// Employees with no active assignment.
    pub bench: usize,
}

/// A project as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project identifier.
    pub project_id: i64,
    /// Project name.
    pub name: String,
    /// Lifecycle status.
    pub status: String,
}

/// One audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    /// Event identifier.
    pub event_id: Option<i64>,
    /// Who acted.
    pub actor_id: i64,
    /// Their role at the time.
    pub actor_role: String,
    /// Cause identifier.
    pub cause_id: String,
    /// Cause description.
    pub cause_description: String,
    /// Action name.
    pub action_name: String,
    /// Action details.
    pub action_details: Option<String>,
    /// State before the action.
    pub before_snapshot: String,
    /// State after the action.
    pub after_snapshot: String,
    /// When it happened, RFC 3339.
    pub occurred_at: String,
}

/// API response for an employee's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrailResponse {
    /// The employee.
    pub employee_id: i64,
    /// Events, oldest first.
    pub events: Vec<AuditEventInfo>,
}

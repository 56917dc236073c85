// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the allocation engine.
//!
//! Transport-neutral: DTOs in, DTOs out, and a closed `ApiError` set that
//! the HTTP layer maps onto status codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    HandlerContext, activate_project, approve_request, audit_trail, create_assignment,
    create_request, current_allocation, employee_utilization, end_assignment, forward_request,
    list_all_assignments, list_employee_assignments, list_my_requests, list_pending_requests,
    most_recent_assignment, org_summary, reject_request, team_utilization, update_assignment,
};
pub use request_response::{
    AllocationDetailInfo, AllocationRequestInfo, ApproveRequestRequest, ApproveRequestResponse,
    AssignmentInfo, AuditEventInfo, AuditTrailResponse, CreateAllocationRequest,
    CreateAssignmentRequest, CurrentAllocationResponse, EmployeeAssignmentsResponse,
    EmployeeUtilizationResponse, ForwardRequestRequest, ListAssignmentsResponse,
    ListRequestsResponse, OrgSummaryResponse, ProjectInfo, RejectRequestRequest,
    TeamUtilizationResponse, UpdateAssignmentRequest,
};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation request handler tests.

use crate::{
    AllocationRequestInfo, ApiError, ApproveRequestRequest, ApproveRequestResponse,
    CreateAllocationRequest, CurrentAllocationResponse, ForwardRequestRequest,
    ListRequestsResponse, RejectRequestRequest, approve_request, create_request,
    current_allocation, forward_request, list_my_requests, list_pending_requests, reject_request,
};

use super::helpers::{approved_request, cause, context, forward_billable, setup};

#[test]
fn test_full_lifecycle_creates_billable_assignment() {
    let (mut persistence, org) = setup();

    let created: AllocationRequestInfo = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.active_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();
    assert_eq!(created.status, "PENDING_MANAGER");
    assert_eq!(created.created_at, "2026-03-02T09:30:00Z");

    let pending: ListRequestsResponse =
        list_pending_requests(&mut persistence, context(), &org.manager).unwrap();
    assert_eq!(pending.requests.len(), 1);
    assert_eq!(pending.requests[0].employee_name.as_deref(), Some("Alice"));
    assert_eq!(pending.requests[0].project_name.as_deref(), Some("Atlas"));

    let forwarded: AllocationRequestInfo = forward_request(
        &mut persistence,
        context(),
        created.request_id,
        forward_billable(),
        &org.manager,
        cause(),
    )
    .unwrap();
    assert_eq!(forwarded.status, "PENDING_HR");
    assert_eq!(forwarded.billing_type.as_deref(), Some("BILLABLE"));
    assert_eq!(forwarded.forwarded_by, Some(org.manager.employee_id));

    let hr_queue: ListRequestsResponse =
        list_pending_requests(&mut persistence, context(), &org.hr).unwrap();
    assert_eq!(hr_queue.requests.len(), 1);
    assert_eq!(hr_queue.requests[0].forwarded_by_name.as_deref(), Some("Morgan"));

    let approval: ApproveRequestResponse = approve_request(
        &mut persistence,
        context(),
        created.request_id,
        &ApproveRequestRequest::default(),
        &org.hr,
        cause(),
    )
    .unwrap();
    assert_eq!(approval.request.status, "APPROVED");
    assert_eq!(approval.request.reviewed_by, Some(org.hr.employee_id));
    assert_eq!(approval.assignment.allocation_percent, 100);
    assert_eq!(approval.assignment.billing_type, "BILLABLE");
    assert_eq!(approval.assignment.start_date, "2026-03-02");
    assert_eq!(approval.assignment.request_id, Some(created.request_id));

    let current: CurrentAllocationResponse = current_allocation(
        &mut persistence,
        context(),
        org.alice.employee_id,
        &org.alice,
    )
    .unwrap();
    assert_eq!(current.status, "BILLABLE");
    assert_eq!(
        current.allocation.map(|a| a.project_name),
        Some(String::from("Atlas"))
    );
}

#[test]
fn test_second_request_while_open_is_conflict() {
    let (mut persistence, org) = setup();
    let request: CreateAllocationRequest = CreateAllocationRequest {
        project_id: org.active_project,
    };
    create_request(&mut persistence, context(), &request, &org.alice, cause()).unwrap();

    let err: ApiError =
        create_request(&mut persistence, context(), &request, &org.alice, cause()).unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_request_while_assigned_is_conflict() {
    let (mut persistence, org) = setup();
    approved_request(&mut persistence, &org, &org.alice, org.active_project, None);

    let err: ApiError = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.second_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_request_for_unknown_project_is_not_found() {
    let (mut persistence, org) = setup();
    let err: ApiError = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest { project_id: 9999 },
        &org.alice,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_forward_without_billing_type_is_invalid_input() {
    let (mut persistence, org) = setup();
    let created: AllocationRequestInfo = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.active_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();

    let err: ApiError = forward_request(
        &mut persistence,
        context(),
        created.request_id,
        ForwardRequestRequest::default(),
        &org.manager,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "billing_type"));
}

#[test]
fn test_forward_with_unknown_billing_type_is_invalid_input() {
    let (mut persistence, org) = setup();
    let created: AllocationRequestInfo = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.active_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();

    let err: ApiError = forward_request(
        &mut persistence,
        context(),
        created.request_id,
        ForwardRequestRequest {
            billing_type: Some(String::from("CHARITY")),
            comments: None,
        },
        &org.manager,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[test]
fn test_forward_by_unrelated_manager_is_forbidden() {
    let (mut persistence, org) = setup();
    let created: AllocationRequestInfo = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.active_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();

    let err: ApiError = forward_request(
        &mut persistence,
        context(),
        created.request_id,
        forward_billable(),
        &org.other_manager,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden { .. }));
}

#[test]
fn test_manager_rejection_closes_request() {
    let (mut persistence, org) = setup();
    let created: AllocationRequestInfo = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.active_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();

    let rejected: AllocationRequestInfo = reject_request(
        &mut persistence,
        context(),
        created.request_id,
        &RejectRequestRequest {
            reason: String::from("Not this quarter"),
        },
        &org.manager,
        cause(),
    )
    .unwrap();
    assert_eq!(rejected.status, "REJECTED");
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Not this quarter"));

    let mine: ListRequestsResponse =
        list_my_requests(&mut persistence, context(), &org.alice).unwrap();
    assert_eq!(mine.requests.len(), 1);
    assert_eq!(mine.requests[0].status, "REJECTED");

    // A rejected request no longer blocks a new one
    create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.second_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();
}

#[test]
fn test_blank_rejection_reason_is_invalid_input() {
    let (mut persistence, org) = setup();
    let created: AllocationRequestInfo = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.active_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();

    let err: ApiError = reject_request(
        &mut persistence,
        context(),
        created.request_id,
        &RejectRequestRequest {
            reason: String::from("   "),
        },
        &org.manager,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "reason"));
}

#[test]
fn test_hr_cannot_reject_before_forwarding() {
    let (mut persistence, org) = setup();
    let created: AllocationRequestInfo = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.active_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();

    let err: ApiError = reject_request(
        &mut persistence,
        context(),
        created.request_id,
        &RejectRequestRequest {
            reason: String::from("No budget"),
        },
        &org.hr,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState { .. }));
}

#[test]
fn test_approve_twice_is_invalid_state() {
    let (mut persistence, org) = setup();
    let approval: ApproveRequestResponse =
        approved_request(&mut persistence, &org, &org.alice, org.active_project, Some(50));

    let err: ApiError = approve_request(
        &mut persistence,
        context(),
        approval.request.request_id,
        &ApproveRequestRequest::default(),
        &org.hr,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState { .. }));
}

#[test]
fn test_approve_with_out_of_range_percent_is_invalid_input() {
    let (mut persistence, org) = setup();
    let created: AllocationRequestInfo = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.active_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();
    forward_request(
        &mut persistence,
        context(),
        created.request_id,
        forward_billable(),
        &org.manager,
        cause(),
    )
    .unwrap();

    let err: ApiError = approve_request(
        &mut persistence,
        context(),
        created.request_id,
        &ApproveRequestRequest {
            allocation_percent: Some(0),
        },
        &org.hr,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "allocation_percent"
    ));
}

#[test]
fn test_approve_on_planned_project_is_rejected_without_promotion() {
    let (mut persistence, org) = setup();
    let created: AllocationRequestInfo = create_request(
        &mut persistence,
        context(),
        &CreateAllocationRequest {
            project_id: org.planned_project,
        },
        &org.alice,
        cause(),
    )
    .unwrap();
    forward_request(
        &mut persistence,
        context(),
        created.request_id,
        forward_billable(),
        &org.manager,
        cause(),
    )
    .unwrap();

    let err: ApiError = approve_request(
        &mut persistence,
        context(),
        created.request_id,
        &ApproveRequestRequest::default(),
        &org.hr,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "project_id"));

    // The failed approval leaves the request waiting on HR
    let queue: ListRequestsResponse =
        list_pending_requests(&mut persistence, context(), &org.hr).unwrap();
    assert_eq!(queue.requests.len(), 1);
}

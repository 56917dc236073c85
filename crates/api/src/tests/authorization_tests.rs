// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role gating and identity tests.

use skillbridge::Caller;
use skillbridge_audit::Actor;
use skillbridge_domain::EmployeeRole;

use crate::{
    AllocationRequestInfo, ApiError, ApproveRequestRequest, AuthError, AuthenticatedActor,
    AuthorizationService, CreateAllocationRequest, RejectRequestRequest, approve_request,
    create_request, end_assignment, forward_request, list_all_assignments,
    list_pending_requests, org_summary, reject_request, team_utilization,
};

use super::helpers::{cause, context, forward_billable, setup};

#[test]
fn test_from_asserted_parses_identity() {
    let actor: AuthenticatedActor = AuthenticatedActor::from_asserted(" 42 ", "manager").unwrap();
    assert_eq!(actor, AuthenticatedActor::new(42, EmployeeRole::Manager));

    let caller: Caller = actor.to_caller();
    assert_eq!(caller.employee_id, 42);
    assert_eq!(caller.role, EmployeeRole::Manager);

    let audit_actor: Actor = actor.to_audit_actor();
    assert_eq!(audit_actor.employee_id, 42);
    assert_eq!(audit_actor.role, "MANAGER");
}

#[test]
fn test_from_asserted_rejects_bad_identity() {
    for (id, role) in [("", "HR"), ("abc", "HR"), ("0", "HR"), ("-3", "HR"), ("7", "ADMIN")] {
        let result: Result<AuthenticatedActor, AuthError> =
            AuthenticatedActor::from_asserted(id, role);
        assert!(
            matches!(result, Err(AuthError::AuthenticationFailed { .. })),
            "expected failure for ({id}, {role})"
        );
    }
}

#[test]
fn test_role_gates() {
    let employee: AuthenticatedActor = AuthenticatedActor::new(1, EmployeeRole::Employee);
    let manager: AuthenticatedActor = AuthenticatedActor::new(2, EmployeeRole::Manager);
    let hr: AuthenticatedActor = AuthenticatedActor::new(3, EmployeeRole::Hr);

    assert!(AuthorizationService::authorize_forward_request(&manager).is_ok());
    assert!(AuthorizationService::authorize_forward_request(&hr).is_err());
    assert!(AuthorizationService::authorize_approve_request(&hr).is_ok());
    assert!(AuthorizationService::authorize_approve_request(&manager).is_err());
    assert!(AuthorizationService::authorize_reject_request(&manager).is_ok());
    assert!(AuthorizationService::authorize_reject_request(&hr).is_ok());
    assert!(AuthorizationService::authorize_reject_request(&employee).is_err());
    assert!(AuthorizationService::authorize_manage_assignments(&employee).is_err());
    assert!(AuthorizationService::authorize_list_all_assignments(&manager).is_err());
    assert!(AuthorizationService::authorize_activate_project(&hr).is_ok());
    assert!(AuthorizationService::authorize_utilization_reports(&employee).is_err());
}

#[test]
fn test_unauthorized_names_required_roles() {
    let employee: AuthenticatedActor = AuthenticatedActor::new(1, EmployeeRole::Employee);
    let err: AuthError = AuthorizationService::authorize_reject_request(&employee).unwrap_err();
    assert_eq!(
        err,
        AuthError::Unauthorized {
            action: String::from("reject_request"),
            required_role: String::from("MANAGER or HR"),
        }
    );
}

#[test]
fn test_employee_cannot_review() {
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

    let forward: ApiError = forward_request(
        &mut persistence,
        context(),
        created.request_id,
        forward_billable(),
        &org.bob,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(forward, ApiError::Unauthorized { .. }));

    let reject: ApiError = reject_request(
        &mut persistence,
        context(),
        created.request_id,
        &RejectRequestRequest {
            reason: String::from("Nope"),
        },
        &org.bob,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(reject, ApiError::Unauthorized { .. }));

    let queue: ApiError = list_pending_requests(&mut persistence, context(), &org.bob).unwrap_err();
    assert!(matches!(queue, ApiError::Unauthorized { .. }));
}

#[test]
fn test_manager_cannot_approve() {
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
        &ApproveRequestRequest::default(),
        &org.manager,
        cause(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn test_employee_cannot_reach_reports_or_assignments() {
    let (mut persistence, org) = setup();

    let summary: ApiError = org_summary(&mut persistence, context(), &org.alice).unwrap_err();
    assert!(matches!(summary, ApiError::Unauthorized { .. }));

    let team: ApiError = team_utilization(
        &mut persistence,
        context(),
        org.manager.employee_id,
        &org.alice,
    )
    .unwrap_err();
    assert!(matches!(team, ApiError::Unauthorized { .. }));

    let end: ApiError = end_assignment(&mut persistence, context(), 1, &org.alice, cause())
        .unwrap_err();
    assert!(matches!(end, ApiError::Unauthorized { .. }));

    let all: ApiError =
        list_all_assignments(&mut persistence, context(), &org.manager).unwrap_err();
    assert!(matches!(all, ApiError::Unauthorized { .. }));
}

#[test]
fn test_claimed_role_must_match_directory() {
    let (mut persistence, org) = setup();
    let impostor: AuthenticatedActor =
        AuthenticatedActor::new(org.alice.employee_id, EmployeeRole::Hr);

    let err: ApiError = org_summary(&mut persistence, context(), &impostor).unwrap_err();
    assert!(matches!(err, ApiError::Forbidden { .. }));
}

#[test]
fn test_unknown_caller_is_not_found() {
    let (mut persistence, _org) = setup();
    let ghost: AuthenticatedActor = AuthenticatedActor::new(9999, EmployeeRole::Hr);

    let err: ApiError = org_summary(&mut persistence, context(), &ghost).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{ACTIVE_PROJECT, ALICE_ID, MANAGER_ID, hr, manager, test_cause, test_clock};
use crate::{
    ApplyContext, Caller, Clock, Command, CoreError, Mutation, State, TransitionResult,
    WorkflowPolicy, apply, apply_catalog,
};
use skillbridge_audit::AuditEvent;
use skillbridge_domain::{
    AllocationPercent, AllocationRequest, Assignment, BillingType, Employee, EmployeeRole,
    Project, ProjectStatus, RequestStatus,
};
use time::macros::date;

fn context(caller: Caller) -> ApplyContext {
    ApplyContext {
        caller,
        cause: test_cause(),
        now: test_clock().now(),
        policy: WorkflowPolicy::default(),
    }
}

fn alice_state() -> State {
    State {
        employee: Employee::new(
            String::from("Alice"),
            String::from("alice@example.com"),
            EmployeeRole::Employee,
            Some(MANAGER_ID),
        )
        .with_id(ALICE_ID),
        assignments: vec![
            Assignment::new_active(
                ALICE_ID,
                ACTIVE_PROJECT,
                BillingType::Billable,
                AllocationPercent::new(40).unwrap(),
                date!(2026 - 01 - 05),
                None,
                None,
            )
            .unwrap()
            .with_id(21),
        ],
        open_request: None,
        request: None,
        project: Some(
            Project::new(String::from("Atlas"), ProjectStatus::Active).with_id(ACTIVE_PROJECT),
        ),
    }
}

#[test]
fn test_apply_produces_mutations_without_writing() {
    let state: State = alice_state();
    let result: TransitionResult = apply(
        &context(manager()),
        &state,
        Command::EndAssignment { assignment_id: 21 },
    )
    .unwrap();

    assert_eq!(result.mutations.len(), 1);
    let Mutation::UpdateAssignment {
        assignment,
        expected_version,
    } = &result.mutations[0]
    else {
        panic!("expected an assignment update");
    };
    assert_eq!(*expected_version, 0);
    assert_eq!(assignment.end_date, Some(date!(2026 - 03 - 02)));
    // The loaded state is untouched
    assert!(state.assignments[0].is_active());
}

#[test]
fn test_audit_snapshots_describe_before_and_after() {
    let state: State = alice_state();
    let result: TransitionResult = apply(
        &context(manager()),
        &state,
        Command::EndAssignment { assignment_id: 21 },
    )
    .unwrap();

    let event: &AuditEvent = &result.audit_event;
    assert_eq!(event.employee_id, Some(ALICE_ID));
    assert_eq!(event.actor.employee_id, MANAGER_ID);
    assert_eq!(event.action.name, "EndAssignment");
    assert_eq!(
        event.before.data,
        "employee_id=3,committed=40,active=[21:project=10:40%:BILLABLE],open_request=none"
    );
    assert_eq!(
        event.after.data,
        "employee_id=3,committed=0,active=[],open_request=none"
    );
}

#[test]
fn test_state_after_tracks_open_request() {
    let mut state: State = alice_state();
    state.assignments.clear();
    let request: AllocationRequest =
        AllocationRequest::new(ALICE_ID, ACTIVE_PROJECT, test_clock().now()).with_id(5);

    let next: State = state.after(&[Mutation::InsertRequest(request.clone())]);
    assert_eq!(
        next.open_request.as_ref().map(|r| r.status),
        Some(RequestStatus::PendingManager)
    );

    let rejected: AllocationRequest = request
        .reject(MANAGER_ID, "No", test_clock().now())
        .unwrap();
    let closed: State = next.after(&[Mutation::UpdateRequest(rejected)]);
    assert_eq!(closed.open_request, None);
}

#[test]
fn test_catalog_commands_use_their_own_entry_point() {
    let state: State = alice_state();
    let err: CoreError = apply(
        &context(hr()),
        &state,
        Command::ActivateProject {
            project_id: ACTIVE_PROJECT,
        },
    )
    .unwrap_err();
    assert_eq!(err, CoreError::UnsupportedCommand("ActivateProject"));

    let err: CoreError = apply_catalog(
        &context(hr()),
        None,
        Command::EndAssignment { assignment_id: 21 },
    )
    .unwrap_err();
    assert_eq!(err, CoreError::UnsupportedCommand("EndAssignment"));
}

#[test]
fn test_catalog_event_is_not_employee_scoped() {
    let planned: Project =
        Project::new(String::from("Beacon"), ProjectStatus::Planned).with_id(11);
    let result: TransitionResult = apply_catalog(
        &context(hr()),
        Some(&planned),
        Command::ActivateProject { project_id: 11 },
    )
    .unwrap();
    assert_eq!(result.audit_event.employee_id, None);
    assert_eq!(result.audit_event.before.data, "project=11,status=PLANNED");
    assert_eq!(result.audit_event.after.data, "project=11,status=ACTIVE");
}

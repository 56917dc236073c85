// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for API tests.

use skillbridge::{FixedClock, WorkflowPolicy};
use skillbridge_audit::Cause;
use skillbridge_domain::{Employee, EmployeeRole, Project, ProjectStatus};
use skillbridge_persistence::Persistence;
use time::macros::datetime;

use crate::{
    AllocationRequestInfo, ApproveRequestRequest, ApproveRequestResponse, AuthenticatedActor,
    CreateAllocationRequest, ForwardRequestRequest, HandlerContext, approve_request,
    create_request, forward_request,
};

pub static TEST_CLOCK: FixedClock = FixedClock(datetime!(2026-03-02 09:30 UTC));

/// Directory identifiers of the seeded organization.
#[derive(Debug, Clone, Copy)]
pub struct Org {
    pub hr: AuthenticatedActor,
    pub manager: AuthenticatedActor,
    pub other_manager: AuthenticatedActor,
    pub alice: AuthenticatedActor,
    pub bob: AuthenticatedActor,
    pub active_project: i64,
    pub second_project: i64,
    pub planned_project: i64,
}

fn employee(
    persistence: &mut Persistence,
    name: &str,
    role: EmployeeRole,
    manager_id: Option<i64>,
) -> AuthenticatedActor {
    let email: String = format!("{}@example.com", name.to_lowercase());
    let id: i64 = persistence
        .create_employee(&Employee::new(name.to_string(), email, role, manager_id))
        .expect("Failed to create employee");
    AuthenticatedActor::new(id, role)
}

fn project(persistence: &mut Persistence, name: &str, status: ProjectStatus) -> i64 {
    persistence
        .create_project(&Project::new(name.to_string(), status))
        .expect("Failed to create project")
}

/// Creates an in-memory database with HR, two managers, two reports of
/// the first manager, two active projects, and one planned project.
pub fn setup() -> (Persistence, Org) {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create persistence");
    let hr: AuthenticatedActor = employee(&mut persistence, "Harriet", EmployeeRole::Hr, None);
    let manager: AuthenticatedActor =
        employee(&mut persistence, "Morgan", EmployeeRole::Manager, None);
    let other_manager: AuthenticatedActor =
        employee(&mut persistence, "Oscar", EmployeeRole::Manager, None);
    let alice: AuthenticatedActor = employee(
        &mut persistence,
        "Alice",
        EmployeeRole::Employee,
        Some(manager.employee_id),
    );
    let bob: AuthenticatedActor = employee(
        &mut persistence,
        "Bob",
        EmployeeRole::Employee,
        Some(manager.employee_id),
    );
    let active_project: i64 = project(&mut persistence, "Atlas", ProjectStatus::Active);
    let second_project: i64 = project(&mut persistence, "Comet", ProjectStatus::Active);
    let planned_project: i64 = project(&mut persistence, "Beacon", ProjectStatus::Planned);

    (
        persistence,
        Org {
            hr,
            manager,
            other_manager,
            alice,
            bob,
            active_project,
            second_project,
            planned_project,
        },
    )
}

pub fn context() -> HandlerContext<'static> {
    HandlerContext::new(&TEST_CLOCK, WorkflowPolicy::default())
}

pub fn cause() -> Cause {
    Cause::new(String::from("api-test"), String::from("API test operation"))
}

pub fn forward_billable() -> ForwardRequestRequest {
    ForwardRequestRequest {
        billing_type: Some(String::from("BILLABLE")),
        comments: Some(String::from("Good fit")),
    }
}

/// Runs a request for `employee` on `project_id` through to approval.
pub fn approved_request(
    persistence: &mut Persistence,
    org: &Org,
    employee: &AuthenticatedActor,
    project_id: i64,
    allocation_percent: Option<i64>,
) -> ApproveRequestResponse {
    let created: AllocationRequestInfo = create_request(
        persistence,
        context(),
        &CreateAllocationRequest { project_id },
        employee,
        cause(),
    )
    .expect("create_request failed");
    forward_request(
        persistence,
        context(),
        created.request_id,
        forward_billable(),
        &org.manager,
        cause(),
    )
    .expect("forward_request failed");
    approve_request(
        persistence,
        context(),
        created.request_id,
        &ApproveRequestRequest { allocation_percent },
        &org.hr,
        cause(),
    )
    .expect("approve_request failed")
}

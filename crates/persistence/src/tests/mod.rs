// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod concurrency_tests;

use crate::Persistence;
use skillbridge::{AssignmentDraft, Caller, FixedClock};
use skillbridge_audit::Cause;
use skillbridge_domain::{
    AllocationPercent, BillingType, Employee, EmployeeRole, Project, ProjectStatus,
};
use time::Date;
use time::macros::{date, datetime};

/// IDs handed out while seeding the test organization.
#[derive(Debug, Clone, Copy)]
pub struct TestOrg {
    pub hr: i64,
    pub manager: i64,
    pub alice: i64,
    pub bob: i64,
    pub active_project: i64,
    pub planned_project: i64,
}

impl TestOrg {
    pub const fn hr_caller(&self) -> Caller {
        Caller::new(self.hr, EmployeeRole::Hr)
    }

    pub const fn manager_caller(&self) -> Caller {
        Caller::new(self.manager, EmployeeRole::Manager)
    }

    pub const fn alice_caller(&self) -> Caller {
        Caller::new(self.alice, EmployeeRole::Employee)
    }
}

/// Seeds one HR user, one manager with two reports, and two projects.
pub fn seed_org(persistence: &mut Persistence) -> TestOrg {
    let hr: i64 = persistence
        .create_employee(&Employee::new(
            String::from("Harriet"),
            String::from("harriet@example.com"),
            EmployeeRole::Hr,
            None,
        ))
        .unwrap();
    let manager: i64 = persistence
        .create_employee(&Employee::new(
            String::from("Morgan"),
            String::from("morgan@example.com"),
            EmployeeRole::Manager,
            None,
        ))
        .unwrap();
    let alice: i64 = persistence
        .create_employee(&Employee::new(
            String::from("Alice"),
            String::from("alice@example.com"),
            EmployeeRole::Employee,
            Some(manager),
        ))
        .unwrap();
    let bob: i64 = persistence
        .create_employee(&Employee::new(
            String::from("Bob"),
            String::from("bob@example.com"),
            EmployeeRole::Employee,
            Some(manager),
        ))
        .unwrap();
    let active_project: i64 = persistence
        .create_project(&Project::new(String::from("Atlas"), ProjectStatus::Active))
        .unwrap();
    let planned_project: i64 = persistence
        .create_project(&Project::new(String::from("Beacon"), ProjectStatus::Planned))
        .unwrap();

    TestOrg {
        hr,
        manager,
        alice,
        bob,
        active_project,
        planned_project,
    }
}

pub fn create_test_persistence() -> (Persistence, TestOrg) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let org: TestOrg = seed_org(&mut persistence);
    (persistence, org)
}

pub const fn test_clock() -> FixedClock {
    FixedClock(datetime!(2026-03-02 09:30 UTC))
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub const fn test_start_date() -> Date {
    date!(2026 - 01 - 05)
}

pub fn billable_draft(employee_id: i64, project_id: i64, percent: i64) -> AssignmentDraft {
    AssignmentDraft {
        employee_id,
        project_id,
        billing_type: BillingType::Billable,
        allocation_percent: Some(AllocationPercent::new(percent).unwrap()),
        start_date: test_start_date(),
        end_date: None,
        project_role: None,
    }
}

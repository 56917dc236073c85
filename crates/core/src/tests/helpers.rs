// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory stores and a small organization used across the core tests.

use crate::{
    AllocationRequestStore, AssignmentStore, AuditLog, Caller, CoreError, Directory, FixedClock,
    Stores, UnitOfWork,
};
use skillbridge_audit::{AuditEvent, Cause};
use skillbridge_domain::{
    AllocationRequest, Assignment, Employee, EmployeeRole, Project, ProjectStatus, RequestStatus,
};
use std::collections::BTreeMap;
use time::macros::datetime;

pub const HR_ID: i64 = 1;
pub const MANAGER_ID: i64 = 2;
pub const ALICE_ID: i64 = 3;
pub const BOB_ID: i64 = 4;
pub const OTHER_MANAGER_ID: i64 = 5;
pub const CAROL_ID: i64 = 6;

pub const ACTIVE_PROJECT: i64 = 10;
pub const PLANNED_PROJECT: i64 = 11;
pub const COMPLETED_PROJECT: i64 = 12;
pub const SECOND_ACTIVE_PROJECT: i64 = 13;

/// Stores backed by ordered maps.
///
/// Units of work snapshot the whole store and restore it when the closure
/// fails, which gives the same all-or-nothing behavior as a transaction.
#[derive(Debug, Clone, Default)]
pub struct MemoryStores {
    pub employees: BTreeMap<i64, Employee>,
    pub projects: BTreeMap<i64, Project>,
    pub requests: BTreeMap<i64, AllocationRequest>,
    pub assignments: BTreeMap<i64, Assignment>,
    pub events: Vec<AuditEvent>,
    next_id: i64,
}

impl MemoryStores {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        100 + self.next_id
    }

    pub fn add_employee(&mut self, id: i64, name: &str, role: EmployeeRole, manager: Option<i64>) {
        let email: String = format!("{}@example.com", name.to_lowercase());
        self.employees.insert(
            id,
            Employee::new(name.to_string(), email, role, manager).with_id(id),
        );
    }

    pub fn add_project(&mut self, id: i64, name: &str, status: ProjectStatus) {
        self.projects
            .insert(id, Project::new(name.to_string(), status).with_id(id));
    }

    pub fn insert_raw_assignment(&mut self, assignment: Assignment) -> i64 {
        let id: i64 = self.next_id();
        self.assignments.insert(id, assignment.with_id(id));
        id
    }
}

impl Directory for MemoryStores {
    fn find_employee(&mut self, employee_id: i64) -> Result<Option<Employee>, CoreError> {
        Ok(self.employees.get(&employee_id).cloned())
    }

    fn list_employees(&mut self) -> Result<Vec<Employee>, CoreError> {
        Ok(self.employees.values().cloned().collect())
    }

    fn list_direct_reports(&mut self, manager_id: i64) -> Result<Vec<Employee>, CoreError> {
        Ok(self
            .employees
            .values()
            .filter(|e| e.reports_to(manager_id))
            .cloned()
            .collect())
    }

    fn find_project(&mut self, project_id: i64) -> Result<Option<Project>, CoreError> {
        Ok(self.projects.get(&project_id).cloned())
    }

    fn list_projects(&mut self) -> Result<Vec<Project>, CoreError> {
        Ok(self.projects.values().cloned().collect())
    }

    fn update_project_status(
        &mut self,
        project_id: i64,
        status: ProjectStatus,
    ) -> Result<(), CoreError> {
        let project: &mut Project = self
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| CoreError::Store(format!("no project {project_id}")))?;
        project.status = status;
        Ok(())
    }
}

impl AllocationRequestStore for MemoryStores {
    fn find_request(&mut self, request_id: i64) -> Result<Option<AllocationRequest>, CoreError> {
        Ok(self.requests.get(&request_id).cloned())
    }

    fn find_open_request(
        &mut self,
        employee_id: i64,
    ) -> Result<Option<AllocationRequest>, CoreError> {
        Ok(self
            .requests
            .values()
            .find(|r| r.employee_id == employee_id && r.is_open())
            .cloned())
    }

    fn list_requests_for_employee(
        &mut self,
        employee_id: i64,
    ) -> Result<Vec<AllocationRequest>, CoreError> {
        Ok(self
            .requests
            .values()
            .rev()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn list_requests_by_status(
        &mut self,
        status: RequestStatus,
    ) -> Result<Vec<AllocationRequest>, CoreError> {
        Ok(self
            .requests
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    fn insert_request(&mut self, request: &AllocationRequest) -> Result<i64, CoreError> {
        let id: i64 = self.next_id();
        self.requests.insert(id, request.clone().with_id(id));
        Ok(id)
    }

    fn update_request(&mut self, request: &AllocationRequest) -> Result<(), CoreError> {
        let id: i64 = request
            .request_id
            .ok_or_else(|| CoreError::Store(String::from("request without id")))?;
        self.requests.insert(id, request.clone());
        Ok(())
    }
}

impl AssignmentStore for MemoryStores {
    fn find_assignment(&mut self, assignment_id: i64) -> Result<Option<Assignment>, CoreError> {
        Ok(self.assignments.get(&assignment_id).cloned())
    }

    fn list_assignments_for_employee(
        &mut self,
        employee_id: i64,
    ) -> Result<Vec<Assignment>, CoreError> {
        Ok(self
            .assignments
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn list_assignments(&mut self) -> Result<Vec<Assignment>, CoreError> {
        Ok(self.assignments.values().cloned().collect())
    }

    fn list_active_assignments(&mut self) -> Result<Vec<Assignment>, CoreError> {
        Ok(self
            .assignments
            .values()
            .filter(|a| a.is_active())
            .cloned()
            .collect())
    }

    fn insert_assignment(&mut self, assignment: &Assignment) -> Result<i64, CoreError> {
        Ok(self.insert_raw_assignment(assignment.clone()))
    }

    fn update_assignment(
        &mut self,
        assignment: &Assignment,
        expected_version: i64,
    ) -> Result<bool, CoreError> {
        let id: i64 = assignment
            .assignment_id
            .ok_or_else(|| CoreError::Store(String::from("assignment without id")))?;
        match self.assignments.get_mut(&id) {
            Some(stored) if stored.version == expected_version => {
                *stored = assignment.clone();
                stored.version = expected_version + 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl AuditLog for MemoryStores {
    fn record_event(&mut self, event: &AuditEvent) -> Result<i64, CoreError> {
        let id: i64 = i64::try_from(self.events.len()).unwrap() + 1;
        self.events.push(event.clone().with_id(id));
        Ok(id)
    }

    fn list_events_for_employee(
        &mut self,
        employee_id: i64,
    ) -> Result<Vec<AuditEvent>, CoreError> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.employee_id == Some(employee_id))
            .cloned()
            .collect())
    }
}

impl UnitOfWork for MemoryStores {
    fn serialized<T, F>(&mut self, _employee_id: i64, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Stores) -> Result<T, CoreError>,
    {
        self.atomically(work)
    }

    fn atomically<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Stores) -> Result<T, CoreError>,
    {
        let snapshot: Self = self.clone();
        let result: Result<T, CoreError> = work(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}

/// HR, two managers, and three employees; Alice and Bob report to the
/// first manager, Carol to the second.
pub fn create_test_org() -> MemoryStores {
    let mut stores: MemoryStores = MemoryStores::default();
    stores.add_employee(HR_ID, "Harriet", EmployeeRole::Hr, None);
    stores.add_employee(MANAGER_ID, "Morgan", EmployeeRole::Manager, None);
    stores.add_employee(ALICE_ID, "Alice", EmployeeRole::Employee, Some(MANAGER_ID));
    stores.add_employee(BOB_ID, "Bob", EmployeeRole::Employee, Some(MANAGER_ID));
    stores.add_employee(OTHER_MANAGER_ID, "Quinn", EmployeeRole::Manager, None);
    stores.add_employee(CAROL_ID, "Carol", EmployeeRole::Employee, Some(OTHER_MANAGER_ID));

    stores.add_project(ACTIVE_PROJECT, "Atlas", ProjectStatus::Active);
    stores.add_project(PLANNED_PROJECT, "Beacon", ProjectStatus::Planned);
    stores.add_project(COMPLETED_PROJECT, "Comet", ProjectStatus::Completed);
    stores.add_project(SECOND_ACTIVE_PROJECT, "Delta", ProjectStatus::Active);
    stores
}

pub const fn test_clock() -> FixedClock {
    FixedClock(datetime!(2026-03-02 09:30 UTC))
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("test"), String::from("Test request"))
}

pub const fn hr() -> Caller {
    Caller::new(HR_ID, EmployeeRole::Hr)
}

pub const fn manager() -> Caller {
    Caller::new(MANAGER_ID, EmployeeRole::Manager)
}

pub const fn other_manager() -> Caller {
    Caller::new(OTHER_MANAGER_ID, EmployeeRole::Manager)
}

pub const fn alice() -> Caller {
    Caller::new(ALICE_ID, EmployeeRole::Employee)
}

pub const fn bob() -> Caller {
    Caller::new(BOB_ID, EmployeeRole::Employee)
}

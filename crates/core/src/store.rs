// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store abstractions.
//!
//! The engine never talks to a database directly. It reads and writes
//! through these traits inside a [`UnitOfWork`], which decides how atomicity
//! and per-employee serialization are achieved.

use crate::error::CoreError;
use skillbridge_audit::AuditEvent;
use skillbridge_domain::{
    AllocationRequest, Assignment, Employee, Project, ProjectStatus, RequestStatus,
};

/// Read access to the employee directory and project catalog.
///
/// Both are owned by external collaborators. The only write the engine
/// performs here is project activation.
pub trait Directory {
    /// Looks up one employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_employee(&mut self, employee_id: i64) -> Result<Option<Employee>, CoreError>;

    /// Lists every employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_employees(&mut self) -> Result<Vec<Employee>, CoreError>;

    /// Lists employees whose direct manager is `manager_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_direct_reports(&mut self, manager_id: i64) -> Result<Vec<Employee>, CoreError>;

    /// Looks up one project.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_project(&mut self, project_id: i64) -> Result<Option<Project>, CoreError>;

    /// Lists every project.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_projects(&mut self) -> Result<Vec<Project>, CoreError>;

    /// Sets a project's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn update_project_status(
        &mut self,
        project_id: i64,
        status: ProjectStatus,
    ) -> Result<(), CoreError>;
}

/// Durable record of allocation requests.
pub trait AllocationRequestStore {
    /// Looks up one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_request(&mut self, request_id: i64) -> Result<Option<AllocationRequest>, CoreError>;

    /// Returns the employee's `PENDING_MANAGER` or `PENDING_HR` request, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_open_request(
        &mut self,
        employee_id: i64,
    ) -> Result<Option<AllocationRequest>, CoreError>;

    /// Lists an employee's requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_requests_for_employee(
        &mut self,
        employee_id: i64,
    ) -> Result<Vec<AllocationRequest>, CoreError>;

    /// Lists requests in `status`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_requests_by_status(
        &mut self,
        status: RequestStatus,
    ) -> Result<Vec<AllocationRequest>, CoreError>;

    /// Inserts a new request and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn insert_request(&mut self, request: &AllocationRequest) -> Result<i64, CoreError>;

    /// Overwrites a persisted request.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn update_request(&mut self, request: &AllocationRequest) -> Result<(), CoreError>;
}

/// Durable record of assignments.
pub trait AssignmentStore {
    /// Looks up one assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_assignment(&mut self, assignment_id: i64) -> Result<Option<Assignment>, CoreError>;

    /// Lists every assignment of one employee, active and ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_assignments_for_employee(
        &mut self,
        employee_id: i64,
    ) -> Result<Vec<Assignment>, CoreError>;

    /// Lists every assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_assignments(&mut self) -> Result<Vec<Assignment>, CoreError>;

    /// Lists every `ACTIVE` assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_active_assignments(&mut self) -> Result<Vec<Assignment>, CoreError>;

    /// Inserts a new assignment and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn insert_assignment(&mut self, assignment: &Assignment) -> Result<i64, CoreError>;

    /// Overwrites an assignment if its stored version equals `expected_version`,
    /// bumping the version by one.
    ///
    /// Returns `false` without writing if the version did not match.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn update_assignment(
        &mut self,
        assignment: &Assignment,
        expected_version: i64,
    ) -> Result<bool, CoreError>;
}

/// Append-only audit log.
pub trait AuditLog {
    /// Appends an event and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn record_event(&mut self, event: &AuditEvent) -> Result<i64, CoreError>;

    /// Lists events scoped to an employee, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_events_for_employee(&mut self, employee_id: i64)
    -> Result<Vec<AuditEvent>, CoreError>;
}

/// Every store the engine needs, behind one object.
pub trait Stores: Directory + AllocationRequestStore + AssignmentStore + AuditLog {}

impl<T> Stores for T where T: Directory + AllocationRequestStore + AssignmentStore + AuditLog {}

/// Transaction boundary.
///
/// Work passed to either method either commits completely or leaves no
/// trace: returning `Err` from the closure rolls everything back.
pub trait UnitOfWork {
    /// Runs `work` atomically while holding the serialization point for
    /// `employee_id`.
    ///
    /// Two units serialized on the same employee never interleave, so a
    /// capacity read and the write that depends on it see a stable total.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a store error.
    fn serialized<T, F>(&mut self, employee_id: i64, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Stores) -> Result<T, CoreError>;

    /// Runs `work` atomically without an employee serialization point.
    ///
    /// Used for reads and for catalog changes.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a store error.
    fn atomically<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Stores) -> Result<T, CoreError>;
}

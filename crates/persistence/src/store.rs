// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store traits over a connection that is inside a transaction.

use diesel::SqliteConnection;
use skillbridge::{AllocationRequestStore, AssignmentStore, AuditLog, CoreError, Directory};
use skillbridge_audit::AuditEvent;
use skillbridge_domain::{
    AllocationRequest, Assignment, Employee, Project, ProjectStatus, RequestStatus,
};

use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Borrowed connection handed to engine work.
///
/// Only ever constructed inside `Persistence::serialized` or
/// `Persistence::atomically`, so every call it makes is part of the
/// surrounding transaction.
pub(crate) struct SqliteStore<'c> {
    pub(crate) conn: &'c mut SqliteConnection,
}

/// Error type threaded through Diesel's transaction closure.
///
/// Diesel needs `From<diesel::result::Error>` on the closure's error; engine
/// failures ride alongside and come back out untouched.
#[derive(Debug)]
pub(crate) enum TxError {
    Core(CoreError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Diesel(err)
    }
}

impl From<CoreError> for TxError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<PersistenceError> for TxError {
    fn from(err: PersistenceError) -> Self {
        Self::Core(err.into())
    }
}

impl From<TxError> for CoreError {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Core(inner) => inner,
            TxError::Diesel(inner) => PersistenceError::from(inner).into(),
        }
    }
}

impl Directory for SqliteStore<'_> {
    fn find_employee(&mut self, employee_id: i64) -> Result<Option<Employee>, CoreError> {
        Ok(queries::directory::find_employee(self.conn, employee_id)?)
    }

    fn list_employees(&mut self) -> Result<Vec<Employee>, CoreError> {
        Ok(queries::directory::list_employees(self.conn)?)
    }

    fn list_direct_reports(&mut self, manager_id: i64) -> Result<Vec<Employee>, CoreError> {
        Ok(queries::directory::list_direct_reports(self.conn, manager_id)?)
    }

    fn find_project(&mut self, project_id: i64) -> Result<Option<Project>, CoreError> {
        Ok(queries::directory::find_project(self.conn, project_id)?)
    }

    fn list_projects(&mut self) -> Result<Vec<Project>, CoreError> {
        Ok(queries::directory::list_projects(self.conn)?)
    }

    fn update_project_status(
        &mut self,
        project_id: i64,
        status: ProjectStatus,
    ) -> Result<(), CoreError> {
        Ok(mutations::directory::update_project_status(
            self.conn, project_id, status,
        )?)
    }
}

impl AllocationRequestStore for SqliteStore<'_> {
    fn find_request(&mut self, request_id: i64) -> Result<Option<AllocationRequest>, CoreError> {
        Ok(queries::requests::find_request(self.conn, request_id)?)
    }

    fn find_open_request(
        &mut self,
        employee_id: i64,
    ) -> Result<Option<AllocationRequest>, CoreError> {
        Ok(queries::requests::find_open_request(self.conn, employee_id)?)
    }

    fn list_requests_for_employee(
        &mut self,
        employee_id: i64,
    ) -> Result<Vec<AllocationRequest>, CoreError> {
        Ok(queries::requests::list_requests_for_employee(
            self.conn,
            employee_id,
        )?)
    }

    fn list_requests_by_status(
        &mut self,
        status: RequestStatus,
    ) -> Result<Vec<AllocationRequest>, CoreError> {
        Ok(queries::requests::list_requests_by_status(self.conn, status)?)
    }

    fn insert_request(&mut self, request: &AllocationRequest) -> Result<i64, CoreError> {
        Ok(mutations::requests::insert_request(self.conn, request)?)
    }

    fn update_request(&mut self, request: &AllocationRequest) -> Result<(), CoreError> {
        Ok(mutations::requests::update_request(self.conn, request)?)
    }
}

impl AssignmentStore for SqliteStore<'_> {
    fn find_assignment(&mut self, assignment_id: i64) -> Result<Option<Assignment>, CoreError> {
        Ok(queries::assignments::find_assignment(self.conn, assignment_id)?)
    }

    fn list_assignments_for_employee(
        &mut self,
        employee_id: i64,
    ) -> Result<Vec<Assignment>, CoreError> {
        Ok(queries::assignments::list_assignments_for_employee(
            self.conn,
            employee_id,
        )?)
    }

    fn list_assignments(&mut self) -> Result<Vec<Assignment>, CoreError> {
        Ok(queries::assignments::list_assignments(self.conn)?)
    }

    fn list_active_assignments(&mut self) -> Result<Vec<Assignment>, CoreError> {
        Ok(queries::assignments::list_active_assignments(self.conn)?)
    }

    fn insert_assignment(&mut self, assignment: &Assignment) -> Result<i64, CoreError> {
        Ok(mutations::assignments::insert_assignment(
            self.conn, assignment,
        )?)
    }

    fn update_assignment(
        &mut self,
        assignment: &Assignment,
        expected_version: i64,
    ) -> Result<bool, CoreError> {
        Ok(mutations::assignments::update_assignment(
            self.conn,
            assignment,
            expected_version,
        )?)
    }
}

impl AuditLog for SqliteStore<'_> {
    fn record_event(&mut self, event: &AuditEvent) -> Result<i64, CoreError> {
        Ok(mutations::audit::record_event(self.conn, event)?)
    }

    fn list_events_for_employee(
        &mut self,
        employee_id: i64,
    ) -> Result<Vec<AuditEvent>, CoreError> {
        Ok(queries::audit::list_events_for_employee(
            self.conn,
            employee_id,
        )?)
    }
}

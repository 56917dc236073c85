// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee directory and project catalog queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use skillbridge_domain::{Employee, EmployeeRole, Project, ProjectStatus};
use tracing::debug;

use crate::diesel_schema::{employees, projects};
use crate::error::PersistenceError;
use crate::queries::decode;

/// Diesel Queryable struct for employee rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct EmployeeRow {
    employee_id: i64,
    display_name: String,
    email: String,
    role: String,
    manager_id: Option<i64>,
}

impl EmployeeRow {
    fn into_domain(self) -> Result<Employee, PersistenceError> {
        let role: EmployeeRole = decode(&self.role)?;
        Ok(Employee::new(self.display_name, self.email, role, self.manager_id)
            .with_id(self.employee_id))
    }
}

/// Diesel Queryable struct for project rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ProjectRow {
    project_id: i64,
    name: String,
    status: String,
}

impl ProjectRow {
    fn into_domain(self) -> Result<Project, PersistenceError> {
        let status: ProjectStatus = decode(&self.status)?;
        Ok(Project::new(self.name, status).with_id(self.project_id))
    }
}

/// Retrieves an employee by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the employee is not found.
pub fn find_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<Employee>, PersistenceError> {
    debug!(employee_id, "Looking up employee");

    let row: Option<EmployeeRow> = employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?;

    row.map(EmployeeRow::into_domain).transpose()
}

/// Retrieves an employee by email address.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn find_employee_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<Employee>, PersistenceError> {
    let row: Option<EmployeeRow> = employees::table
        .filter(employees::email.eq(email))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?;

    row.map(EmployeeRow::into_domain).transpose()
}

/// Lists every employee ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_employees(conn: &mut SqliteConnection) -> Result<Vec<Employee>, PersistenceError> {
    let rows: Vec<EmployeeRow> = employees::table
        .order(employees::employee_id.asc())
        .select(EmployeeRow::as_select())
        .load(conn)?;

    rows.into_iter().map(EmployeeRow::into_domain).collect()
}

/// Lists the direct reports of a manager ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_direct_reports(
    conn: &mut SqliteConnection,
    manager_id: i64,
) -> Result<Vec<Employee>, PersistenceError> {
    let rows: Vec<EmployeeRow> = employees::table
        .filter(employees::manager_id.eq(manager_id))
        .order(employees::employee_id.asc())
        .select(EmployeeRow::as_select())
        .load(conn)?;

    rows.into_iter().map(EmployeeRow::into_domain).collect()
}

/// Returns the serialization counter of an employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn allocation_version(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(employees::allocation_version)
        .first(conn)
        .optional()?)
}

/// Retrieves a project by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn find_project(
    conn: &mut SqliteConnection,
    project_id: i64,
) -> Result<Option<Project>, PersistenceError> {
    let row: Option<ProjectRow> = projects::table
        .filter(projects::project_id.eq(project_id))
        .select(ProjectRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ProjectRow::into_domain).transpose()
}

/// Lists every project ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_projects(conn: &mut SqliteConnection) -> Result<Vec<Project>, PersistenceError> {
    let rows: Vec<ProjectRow> = projects::table
        .order(projects::project_id.asc())
        .select(ProjectRow::as_select())
        .load(conn)?;

    rows.into_iter().map(ProjectRow::into_domain).collect()
}

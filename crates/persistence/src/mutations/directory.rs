// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory and catalog writes.
//!
//! The directory is seeded from outside the engine; the engine itself only
//! activates projects and bumps the per-employee serialization counter.

use diesel::SqliteConnection;
use diesel::prelude::*;
use skillbridge_domain::{Employee, Project, ProjectStatus};
use tracing::{debug, info};

use crate::backend::sqlite::last_insert_rowid;
use crate::diesel_schema::{employees, projects};
use crate::error::PersistenceError;

/// Inserts an employee and returns the assigned ID.
///
/// # Errors
///
/// Returns an error if the email is already taken or the manager does not exist.
pub fn insert_employee(
    conn: &mut SqliteConnection,
    employee: &Employee,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(employees::table)
        .values((
            employees::display_name.eq(&employee.name),
            employees::email.eq(&employee.email),
            employees::role.eq(employee.role.as_str()),
            employees::manager_id.eq(employee.manager_id),
        ))
        .execute(conn)?;

    let employee_id: i64 = last_insert_rowid(conn)?;
    info!(employee_id, email = %employee.email, "Inserted employee");
    Ok(employee_id)
}

/// Inserts a project and returns the assigned ID.
///
/// # Errors
///
/// Returns an error if the name is already taken.
pub fn insert_project(
    conn: &mut SqliteConnection,
    project: &Project,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(projects::table)
        .values((
            projects::name.eq(&project.name),
            projects::status.eq(project.status.as_str()),
        ))
        .execute(conn)?;

    let project_id: i64 = last_insert_rowid(conn)?;
    info!(project_id, name = %project.name, "Inserted project");
    Ok(project_id)
}

/// Sets a project's lifecycle status.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such project exists.
pub fn update_project_status(
    conn: &mut SqliteConnection,
    project_id: i64,
    status: ProjectStatus,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(projects::table.filter(projects::project_id.eq(project_id)))
            .set(projects::status.eq(status.as_str()))
            .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("project {project_id}")));
    }
    Ok(())
}

/// Increments the employee's allocation counter.
///
/// This is the first write of every serialized unit of work. Under an
/// immediate transaction it pins the employee row for the rest of the unit.
/// A missing employee is not an error; the engine reports that itself.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn bump_allocation_version(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(employees::table.filter(employees::employee_id.eq(employee_id)))
            .set(employees::allocation_version.eq(employees::allocation_version + 1))
            .execute(conn)?;
    debug!(employee_id, updated, "Bumped allocation version");
    Ok(())
}

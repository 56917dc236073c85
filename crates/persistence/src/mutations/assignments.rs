// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment writes.
//!
//! Updates are compare-and-swap on the `version` column: the row is only
//! written if the caller saw the latest version.

use diesel::SqliteConnection;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use skillbridge_domain::{Assignment, format_iso_date};
use tracing::debug;

use crate::backend::sqlite::last_insert_rowid;
use crate::diesel_schema::project_assignments;
use crate::error::PersistenceError;

fn percent_column(assignment: &Assignment) -> Result<i32, PersistenceError> {
    assignment
        .allocation_percent
        .value()
        .to_i32()
        .ok_or_else(|| {
            PersistenceError::Serialization(format!(
                "allocation percent {} does not fit the column",
                assignment.allocation_percent
            ))
        })
}

/// Inserts a new assignment and returns the assigned ID.
///
/// The stored version starts at the assignment's own version, normally 0.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_assignment(
    conn: &mut SqliteConnection,
    assignment: &Assignment,
) -> Result<i64, PersistenceError> {
    let allocation_percent: i32 = percent_column(assignment)?;

    diesel::insert_into(project_assignments::table)
        .values((
            project_assignments::employee_id.eq(assignment.employee_id),
            project_assignments::project_id.eq(assignment.project_id),
            project_assignments::request_id.eq(assignment.request_id),
            project_assignments::status.eq(assignment.status.as_str()),
            project_assignments::billing_type.eq(assignment.billing_type.as_str()),
            project_assignments::allocation_percent.eq(allocation_percent),
            project_assignments::project_role.eq(assignment.project_role.as_deref()),
            project_assignments::start_date.eq(format_iso_date(assignment.start_date)),
            project_assignments::end_date.eq(assignment.end_date.map(format_iso_date)),
            project_assignments::version.eq(assignment.version),
        ))
        .execute(conn)?;

    let assignment_id: i64 = last_insert_rowid(conn)?;
    debug!(
        assignment_id,
        employee_id = assignment.employee_id,
        percent = assignment.allocation_percent.value(),
        "Inserted assignment"
    );
    Ok(assignment_id)
}

/// Overwrites an assignment if its stored version is `expected_version`.
///
/// On success the stored version becomes `expected_version + 1`. Returns
/// `false` if the row was missing or had moved on.
///
/// # Errors
///
/// Returns an error if the assignment has no ID or the update fails.
pub fn update_assignment(
    conn: &mut SqliteConnection,
    assignment: &Assignment,
    expected_version: i64,
) -> Result<bool, PersistenceError> {
    let assignment_id: i64 = assignment
        .assignment_id
        .ok_or(PersistenceError::Unsaved("assignment"))?;
    let allocation_percent: i32 = percent_column(assignment)?;

    let updated: usize = diesel::update(
        project_assignments::table
            .filter(project_assignments::assignment_id.eq(assignment_id))
            .filter(project_assignments::version.eq(expected_version)),
    )
    .set((
        project_assignments::status.eq(assignment.status.as_str()),
        project_assignments::billing_type.eq(assignment.billing_type.as_str()),
        project_assignments::allocation_percent.eq(allocation_percent),
        project_assignments::project_role.eq(assignment.project_role.as_deref()),
        project_assignments::start_date.eq(format_iso_date(assignment.start_date)),
        project_assignments::end_date.eq(assignment.end_date.map(format_iso_date)),
        project_assignments::version.eq(expected_version + 1),
    ))
    .execute(conn)?;

    debug!(assignment_id, expected_version, updated, "Compare-and-swap assignment update");
    Ok(updated == 1)
}

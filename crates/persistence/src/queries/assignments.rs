// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use skillbridge_domain::{AllocationPercent, Assignment, AssignmentStatus, BillingType};

use crate::diesel_schema::project_assignments;
use crate::error::PersistenceError;
use crate::queries::{decode, decode_date};

/// Diesel Queryable struct for assignment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = project_assignments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct AssignmentRow {
    assignment_id: i64,
    employee_id: i64,
    project_id: i64,
    request_id: Option<i64>,
    status: String,
    billing_type: String,
    allocation_percent: i32,
    project_role: Option<String>,
    start_date: String,
    end_date: Option<String>,
    version: i64,
}

impl AssignmentRow {
    fn into_domain(self) -> Result<Assignment, PersistenceError> {
        let status: AssignmentStatus = decode(&self.status)?;
        let billing_type: BillingType = decode(&self.billing_type)?;
        let allocation_percent: AllocationPercent =
            AllocationPercent::new(i64::from(self.allocation_percent))
                .map_err(|e| PersistenceError::InvalidStoredValue(e.to_string()))?;
        Ok(Assignment {
            assignment_id: Some(self.assignment_id),
            employee_id: self.employee_id,
            project_id: self.project_id,
            request_id: self.request_id,
            status,
            billing_type,
            allocation_percent,
            project_role: self.project_role,
            start_date: decode_date(&self.start_date)?,
            end_date: self.end_date.as_deref().map(decode_date).transpose()?,
            version: self.version,
        })
    }
}

fn decode_rows(rows: Vec<AssignmentRow>) -> Result<Vec<Assignment>, PersistenceError> {
    rows.into_iter().map(AssignmentRow::into_domain).collect()
}

/// Retrieves an assignment by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn find_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Option<Assignment>, PersistenceError> {
    let row: Option<AssignmentRow> = project_assignments::table
        .filter(project_assignments::assignment_id.eq(assignment_id))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()?;

    row.map(AssignmentRow::into_domain).transpose()
}

/// Lists every assignment of one employee, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_assignments_for_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = project_assignments::table
        .filter(project_assignments::employee_id.eq(employee_id))
        .order(project_assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .load(conn)?;

    decode_rows(rows)
}

/// Lists every assignment.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_assignments(conn: &mut SqliteConnection) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = project_assignments::table
        .order(project_assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .load(conn)?;

    decode_rows(rows)
}

/// Lists every `ACTIVE` assignment.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_active_assignments(
    conn: &mut SqliteConnection,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = project_assignments::table
        .filter(project_assignments::status.eq(AssignmentStatus::Active.as_str()))
        .order(project_assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .load(conn)?;

    decode_rows(rows)
}

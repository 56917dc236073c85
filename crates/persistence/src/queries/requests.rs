// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation request queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use skillbridge_domain::{AllocationRequest, BillingType, RequestStatus};

use crate::diesel_schema::allocation_requests;
use crate::error::PersistenceError;
use crate::queries::{decode, decode_optional_timestamp, decode_timestamp};

/// Diesel Queryable struct for allocation request rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = allocation_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct RequestRow {
    request_id: i64,
    employee_id: i64,
    project_id: i64,
    status: String,
    billing_type: Option<String>,
    manager_comments: Option<String>,
    rejection_reason: Option<String>,
    created_at: String,
    forwarded_at: Option<String>,
    forwarded_by: Option<i64>,
    reviewed_at: Option<String>,
    reviewed_by: Option<i64>,
}

impl RequestRow {
    fn into_domain(self) -> Result<AllocationRequest, PersistenceError> {
        let status: RequestStatus = decode(&self.status)?;
        let billing_type: Option<BillingType> =
            self.billing_type.as_deref().map(decode).transpose()?;
        Ok(AllocationRequest {
            request_id: Some(self.request_id),
            employee_id: self.employee_id,
            project_id: self.project_id,
            status,
            billing_type,
            manager_comments: self.manager_comments,
            rejection_reason: self.rejection_reason,
            created_at: decode_timestamp(&self.created_at)?,
            forwarded_at: decode_optional_timestamp(self.forwarded_at.as_deref())?,
            forwarded_by: self.forwarded_by,
            reviewed_at: decode_optional_timestamp(self.reviewed_at.as_deref())?,
            reviewed_by: self.reviewed_by,
        })
    }
}

fn decode_rows(rows: Vec<RequestRow>) -> Result<Vec<AllocationRequest>, PersistenceError> {
    rows.into_iter().map(RequestRow::into_domain).collect()
}

/// Retrieves a request by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn find_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<Option<AllocationRequest>, PersistenceError> {
    let row: Option<RequestRow> = allocation_requests::table
        .filter(allocation_requests::request_id.eq(request_id))
        .select(RequestRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RequestRow::into_domain).transpose()
}

/// Retrieves the employee's `PENDING_MANAGER` or `PENDING_HR` request.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
pub fn find_open_request(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<AllocationRequest>, PersistenceError> {
    let open: [&str; 2] = [
        RequestStatus::PendingManager.as_str(),
        RequestStatus::PendingHr.as_str(),
    ];
    let row: Option<RequestRow> = allocation_requests::table
        .filter(allocation_requests::employee_id.eq(employee_id))
        .filter(allocation_requests::status.eq_any(open))
        .select(RequestRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RequestRow::into_domain).transpose()
}

/// Lists an employee's requests, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_requests_for_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Vec<AllocationRequest>, PersistenceError> {
    let rows: Vec<RequestRow> = allocation_requests::table
        .filter(allocation_requests::employee_id.eq(employee_id))
        .order(allocation_requests::request_id.desc())
        .select(RequestRow::as_select())
        .load(conn)?;

    decode_rows(rows)
}

/// Lists requests in one status, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_requests_by_status(
    conn: &mut SqliteConnection,
    status: RequestStatus,
) -> Result<Vec<AllocationRequest>, PersistenceError> {
    let rows: Vec<RequestRow> = allocation_requests::table
        .filter(allocation_requests::status.eq(status.as_str()))
        .order(allocation_requests::request_id.asc())
        .select(RequestRow::as_select())
        .load(conn)?;

    decode_rows(rows)
}

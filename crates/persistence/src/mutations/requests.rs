// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation request writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use skillbridge_domain::{AllocationRequest, BillingType};
use tracing::debug;

use crate::backend::sqlite::last_insert_rowid;
use crate::diesel_schema::allocation_requests;
use crate::error::PersistenceError;
use crate::mutations::{encode_optional_timestamp, encode_timestamp};

/// Inserts a new request and returns the assigned ID.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the employee already has an
/// open request, or another error if the insert fails.
pub fn insert_request(
    conn: &mut SqliteConnection,
    request: &AllocationRequest,
) -> Result<i64, PersistenceError> {
    let billing_type: Option<&str> = request.billing_type.as_ref().map(BillingType::as_str);
    let created_at: String = encode_timestamp(request.created_at)?;
    let forwarded_at: Option<String> = encode_optional_timestamp(request.forwarded_at)?;
    let reviewed_at: Option<String> = encode_optional_timestamp(request.reviewed_at)?;

    diesel::insert_into(allocation_requests::table)
        .values((
            allocation_requests::employee_id.eq(request.employee_id),
            allocation_requests::project_id.eq(request.project_id),
            allocation_requests::status.eq(request.status.as_str()),
            allocation_requests::billing_type.eq(billing_type),
            allocation_requests::manager_comments.eq(request.manager_comments.as_deref()),
            allocation_requests::rejection_reason.eq(request.rejection_reason.as_deref()),
            allocation_requests::created_at.eq(created_at),
            allocation_requests::forwarded_at.eq(forwarded_at),
            allocation_requests::forwarded_by.eq(request.forwarded_by),
            allocation_requests::reviewed_at.eq(reviewed_at),
            allocation_requests::reviewed_by.eq(request.reviewed_by),
        ))
        .execute(conn)?;

    let request_id: i64 = last_insert_rowid(conn)?;
    debug!(request_id, employee_id = request.employee_id, "Inserted allocation request");
    Ok(request_id)
}

/// Overwrites the mutable columns of a persisted request.
///
/// # Errors
///
/// Returns `PersistenceError::Unsaved` if the request has no ID and
/// `PersistenceError::NotFound` if no row matches it.
pub fn update_request(
    conn: &mut SqliteConnection,
    request: &AllocationRequest,
) -> Result<(), PersistenceError> {
    let request_id: i64 = request
        .request_id
        .ok_or(PersistenceError::Unsaved("allocation request"))?;
    let billing_type: Option<&str> = request.billing_type.as_ref().map(BillingType::as_str);
    let forwarded_at: Option<String> = encode_optional_timestamp(request.forwarded_at)?;
    let reviewed_at: Option<String> = encode_optional_timestamp(request.reviewed_at)?;

    let updated: usize = diesel::update(
        allocation_requests::table.filter(allocation_requests::request_id.eq(request_id)),
    )
    .set((
        allocation_requests::status.eq(request.status.as_str()),
        allocation_requests::billing_type.eq(billing_type),
        allocation_requests::manager_comments.eq(request.manager_comments.as_deref()),
        allocation_requests::rejection_reason.eq(request.rejection_reason.as_deref()),
        allocation_requests::forwarded_at.eq(forwarded_at),
        allocation_requests::forwarded_by.eq(request.forwarded_by),
        allocation_requests::reviewed_at.eq(reviewed_at),
        allocation_requests::reviewed_by.eq(request.reviewed_by),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "allocation request {request_id}"
        )));
    }
    debug!(request_id, status = %request.status, "Updated allocation request");
    Ok(())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use skillbridge_audit::AuditEvent;

use crate::data_models::{EventColumns, EventParts};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use crate::queries::decode_timestamp;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct AuditEventRow {
    event_id: i64,
    employee_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    occurred_at: String,
}

impl AuditEventRow {
    fn into_domain(self) -> Result<AuditEvent, PersistenceError> {
        let parts: EventParts = EventColumns {
            actor_json: self.actor_json,
            cause_json: self.cause_json,
            action_json: self.action_json,
            before_json: self.before_snapshot_json,
            after_json: self.after_snapshot_json,
        }
        .decode()?;

        Ok(AuditEvent::new(
            self.employee_id,
            parts.actor,
            parts.cause,
            parts.action,
            parts.before,
            parts.after,
            decode_timestamp(&self.occurred_at)?,
        )
        .with_id(self.event_id))
    }
}

/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns an error if the event is not found or cannot be deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::NotFound(format!("audit event {event_id}"))
            }
            other => PersistenceError::from(other),
        })?;

    row.into_domain()
}

/// Lists the events scoped to one employee, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_events_for_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::employee_id.eq(employee_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AuditEventRow::into_domain).collect()
}

/// Lists events with no employee scope, such as catalog changes.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_global_events(
    conn: &mut SqliteConnection,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::employee_id.is_null())
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AuditEventRow::into_domain).collect()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::SqliteConnection;
use diesel::prelude::*;
use skillbridge_audit::AuditEvent;
use tracing::debug;

use crate::backend::sqlite::last_insert_rowid;
use crate::data_models::EventColumns;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use crate::mutations::encode_timestamp;

/// Persists an audit event.
///
/// Events with no employee scope, such as project activation, are stored
/// with a null `employee_id`.
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn record_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let columns: EventColumns = EventColumns::encode(event)?;
    let occurred_at: String = encode_timestamp(event.occurred_at)?;

    diesel::insert_into(audit_events::table)
        .values((
            audit_events::employee_id.eq(event.employee_id),
            audit_events::actor_json.eq(columns.actor_json),
            audit_events::cause_json.eq(columns.cause_json),
            audit_events::action_json.eq(columns.action_json),
            audit_events::before_snapshot_json.eq(columns.before_json),
            audit_events::after_snapshot_json.eq(columns.after_json),
            audit_events::occurred_at.eq(occurred_at),
        ))
        .execute(conn)?;

    let event_id: i64 = last_insert_rowid(conn)?;
    debug!(
        event_id,
        action = %event.action.name,
        global = event.is_global(),
        "Persisted audit event"
    );
    Ok(event_id)
}

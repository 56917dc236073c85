// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON column payloads for audit rows.
//!
//! The actor, cause, action and both snapshots of an event are stored as JSON
//! text. The payload structs below fix that on-disk shape independently of
//! the audit crate's in-memory types.

use serde::{Deserialize, Serialize};
use skillbridge_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

use crate::error::PersistenceError;

#[derive(Debug, Serialize, Deserialize)]
struct ActorPayload {
    employee_id: i64,
    role: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CausePayload {
    id: String,
    description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ActionPayload {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotPayload {
    data: String,
}

/// The JSON columns of one audit row.
pub struct EventColumns {
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_json: String,
    pub after_json: String,
}

/// The decoded parts of an audit row, minus ID, scope and timestamp.
pub struct EventParts {
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
}

impl EventColumns {
    /// Serializes the payload columns of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if a payload cannot be serialized.
    pub fn encode(event: &AuditEvent) -> Result<Self, PersistenceError> {
        let actor: ActorPayload = ActorPayload {
            employee_id: event.actor.employee_id,
            role: event.actor.role.clone(),
        };
        let cause: CausePayload = CausePayload {
            id: event.cause.id.clone(),
            description: event.cause.description.clone(),
        };
        let action: ActionPayload = ActionPayload {
            name: event.action.name.clone(),
            details: event.action.details.clone(),
        };

        Ok(Self {
            actor_json: serde_json::to_string(&actor)?,
            cause_json: serde_json::to_string(&cause)?,
            action_json: serde_json::to_string(&action)?,
            before_json: encode_snapshot(&event.before)?,
            after_json: encode_snapshot(&event.after)?,
        })
    }

    /// Parses the payload columns back into audit values.
    ///
    /// # Errors
    ///
    /// Returns an error if any column holds malformed JSON.
    pub fn decode(&self) -> Result<EventParts, PersistenceError> {
        let actor: ActorPayload = serde_json::from_str(&self.actor_json)?;
        let cause: CausePayload = serde_json::from_str(&self.cause_json)?;
        let action: ActionPayload = serde_json::from_str(&self.action_json)?;

        Ok(EventParts {
            actor: Actor::new(actor.employee_id, actor.role),
            cause: Cause::new(cause.id, cause.description),
            action: Action {
                name: action.name,
                details: action.details,
            },
            before: decode_snapshot(&self.before_json)?,
            after: decode_snapshot(&self.after_json)?,
        })
    }
}

fn encode_snapshot(snapshot: &StateSnapshot) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&SnapshotPayload {
        data: snapshot.data.clone(),
    })?)
}

fn decode_snapshot(json: &str) -> Result<StateSnapshot, PersistenceError> {
    let payload: SnapshotPayload = serde_json::from_str(json)?;
    Ok(StateSnapshot::new(payload.data))
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail records for the allocation engine.
//!
//! An [`AuditEvent`] is written in the same transaction as the allocation
//! change it describes. Events are append-only; nothing in the workspace
//! updates or deletes one once it has an ID.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// The employee who issued a command, and the directory role they held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub employee_id: i64,
    /// Role wire name, such as `MANAGER` or `HR`.
    pub role: String,
}

impl Actor {
    #[must_use]
    pub fn new(employee_id: i64, role: impl Into<String>) -> Self {
        Self {
            employee_id,
            role: role.into(),
        }
    }
}

/// Why a command ran.
///
/// The `id` correlates the event with an outside trigger, such as an HTTP
/// correlation header or a seed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub id: String,
    pub description: String,
}

impl Cause {
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

/// The command that produced the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Command name, such as `ApproveRequest` or `EndAssignment`.
    pub name: String,
    /// Human-readable summary of what changed.
    pub details: Option<String>,
}

impl Action {
    /// An action with no details.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Flattened text rendering of allocation state on one side of a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// One committed allocation change.
///
/// `employee_id` names the employee whose requests or assignments changed.
/// Catalog changes such as project activation touch no employee and are
/// recorded as global events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Assigned when the event is stored.
    pub event_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates an unsaved event.
    #[must_use]
    pub const fn new(
        employee_id: Option<i64>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        occurred_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            employee_id,
            actor,
            cause,
            action,
            before,
            after,
            occurred_at,
        }
    }

    #[must_use]
    pub const fn with_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// Returns `true` for events not scoped to an employee.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.employee_id.is_none()
    }
}

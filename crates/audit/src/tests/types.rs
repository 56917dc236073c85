// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use time::macros::datetime;

fn forward_event() -> AuditEvent {
    AuditEvent::new(
        Some(7),
        Actor::new(3, "MANAGER"),
        Cause::new("req-456", "Manager triage"),
        Action::named("ForwardRequest"),
        StateSnapshot::new("open_request=11:PENDING_MANAGER"),
        StateSnapshot::new("open_request=11:PENDING_HR"),
        datetime!(2026-10-02 10:30 UTC),
    )
}

fn activation_event() -> AuditEvent {
    AuditEvent::new(
        None,
        Actor::new(1, "HR"),
        Cause::new("seed", "Catalog load"),
        Action::named("ActivateProject").with_details("Activated project 4 'Atlas'"),
        StateSnapshot::new("project=4,status=PLANNED"),
        StateSnapshot::new("project=4,status=ACTIVE"),
        datetime!(2026-10-02 11:00 UTC),
    )
}

#[test]
fn test_named_action_has_no_details() {
    let action: Action = Action::named("ForwardRequest");

    assert_eq!(action.name, "ForwardRequest");
    assert!(action.details.is_none());
}

#[test]
fn test_with_details_replaces_previous_details() {
    let action: Action = Action::named("ApproveRequest")
        .with_details("draft")
        .with_details("allocation_percent=60");

    assert_eq!(action.details.as_deref(), Some("allocation_percent=60"));
}

#[test]
fn test_employee_event_is_not_global() {
    let event: AuditEvent = forward_event();

    assert_eq!(event.employee_id, Some(7));
    assert!(!event.is_global());
    assert_eq!(event.event_id, None);
    assert_eq!(event.actor.role, "MANAGER");
    assert_ne!(event.before, event.after);
}

#[test]
fn test_catalog_event_is_global() {
    let event: AuditEvent = activation_event();

    assert!(event.is_global());
    assert_eq!(event.cause.id, "seed");
}

#[test]
fn test_with_id_sets_persisted_identifier() {
    let event: AuditEvent = forward_event().with_id(42);

    assert_eq!(event.event_id, Some(42));
}

#[test]
fn test_audit_event_json_uses_rfc3339_timestamp() {
    let event: AuditEvent = activation_event().with_id(9);
    let json: String = serde_json::to_string(&event).unwrap();

    assert!(json.contains("\"occurred_at\":\"2026-10-02T11:00:00Z\""));
    let restored: AuditEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, event);
}

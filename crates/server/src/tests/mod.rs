// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use skillbridge::{FixedClock, WorkflowPolicy};
use skillbridge_persistence::Persistence;
use std::sync::Arc;
use time::macros::datetime;
use tower::ServiceExt;

use crate::seed::{SeedData, apply_seed};
use crate::storage::Storage;
use crate::{AppState, build_router};

pub const SEED_JSON: &str = r#"{
    "employees": [
        { "name": "Harriet", "email": "harriet@example.com", "role": "HR" },
        { "name": "Morgan", "email": "morgan@example.com", "role": "MANAGER" },
        { "name": "Alice", "email": "alice@example.com", "role": "EMPLOYEE",
          "manager_email": "morgan@example.com" },
        { "name": "Bob", "email": "bob@example.com", "role": "EMPLOYEE",
          "manager_email": "morgan@example.com" }
    ],
    "projects": [
        { "name": "Atlas", "status": "ACTIVE" },
        { "name": "Comet" },
        { "name": "Beacon", "status": "PLANNED" }
    ]
}"#;

/// Directory ids of the seeded organization.
#[derive(Debug, Clone, Copy)]
pub struct Ids {
    pub hr: i64,
    pub manager: i64,
    pub alice: i64,
    pub bob: i64,
}

fn id_of(persistence: &mut Persistence, email: &str) -> i64 {
    persistence
        .find_employee_by_email(email)
        .unwrap()
        .and_then(|e| e.employee_id)
        .expect("seeded employee missing")
}

fn seed_ids(persistence: &mut Persistence) -> Ids {
    let data: SeedData = serde_json::from_str(SEED_JSON).unwrap();
    apply_seed(persistence, &data).unwrap();

    Ids {
        hr: id_of(persistence, "harriet@example.com"),
        manager: id_of(persistence, "morgan@example.com"),
        alice: id_of(persistence, "alice@example.com"),
        bob: id_of(persistence, "bob@example.com"),
    }
}

fn router_over(storage: Storage) -> Router {
    let app_state: AppState = AppState::new(
        storage,
        Arc::new(FixedClock(datetime!(2026-03-02 09:30 UTC))),
        WorkflowPolicy::default(),
    );
    build_router(app_state)
}

/// Builds a router over a freshly seeded in-memory database.
pub fn test_app() -> (Router, Ids) {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let ids: Ids = seed_ids(&mut persistence);
    (router_over(Storage::memory(persistence)), ids)
}

/// Builds a router over a seeded database file, one connection per request.
///
/// The returned directory must outlive the router.
pub fn file_test_app() -> (Router, Ids, tempfile::TempDir) {
    let dir: tempfile::TempDir = tempfile::tempdir().unwrap();
    let path: std::path::PathBuf = dir.path().join("server.db");
    let ids: Ids = {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        seed_ids(&mut persistence)
    };
    (router_over(Storage::file(path)), ids, dir)
}

/// Sends one request and returns the status and decoded JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    actor: Option<(i64, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((id, role)) = actor {
        builder = builder
            .header("x-actor-id", id.to_string())
            .header("x-actor-role", role);
    }
    let request: Request<Body> = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

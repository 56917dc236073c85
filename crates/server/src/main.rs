// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod seed;
mod session;
mod storage;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use skillbridge::{Clock, SystemClock, WorkflowPolicy};
use skillbridge_api::{
    AllocationRequestInfo, ApiError, ApproveRequestRequest, ApproveRequestResponse,
    AssignmentInfo, AuditTrailResponse, CreateAllocationRequest, CreateAssignmentRequest,
    CurrentAllocationResponse, EmployeeAssignmentsResponse, EmployeeUtilizationResponse,
    ForwardRequestRequest, HandlerContext, ListAssignmentsResponse, ListRequestsResponse,
    OrgSummaryResponse, ProjectInfo, RejectRequestRequest, TeamUtilizationResponse,
    UpdateAssignmentRequest, activate_project, approve_request, audit_trail, create_assignment,
    create_request, current_allocation, employee_utilization, end_assignment, forward_request,
    list_all_assignments, list_employee_assignments, list_my_requests, list_pending_requests,
    most_recent_assignment, org_summary, reject_request, team_utilization, update_assignment,
};
use skillbridge_persistence::Persistence;
use std::sync::Arc;
use tracing::{error, info};

use crate::session::{ActorIdentity, request_cause};
use crate::storage::Storage;

/// `SkillBridge` Server - HTTP server for the `SkillBridge` allocation engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "SKILLBRIDGE_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "SKILLBRIDGE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, env = "SKILLBRIDGE_PORT", default_value_t = 3000)]
    port: u16,

    /// JSON file of employees and projects to load at startup
    #[arg(long, env = "SKILLBRIDGE_SEED")]
    seed: Option<String>,

    /// Promote PLANNED projects to ACTIVE when an assignment is created on them
    #[arg(long, env = "SKILLBRIDGE_PROMOTE_PLANNED_PROJECTS")]
    promote_planned_projects: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Connection source; see [`Storage`].
    storage: Storage,
    /// Source of "now" for audit timestamps and default dates.
    clock: Arc<dyn Clock>,
    /// Engine behavior switches.
    policy: WorkflowPolicy,
}

impl AppState {
    fn new(storage: Storage, clock: Arc<dyn Clock>, policy: WorkflowPolicy) -> Self {
        Self {
            storage,
            clock,
            policy,
        }
    }

    /// Runs one API operation off the async workers.
    async fn run<T, F>(&self, work: F) -> Result<T, HttpError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Persistence, HandlerContext<'_>) -> Result<T, ApiError> + Send + 'static,
    {
        let clock: Arc<dyn Clock> = Arc::clone(&self.clock);
        let policy: WorkflowPolicy = self.policy;
        let result: T = self
            .storage
            .run(move |persistence| {
                work(persistence, HandlerContext::new(clock.as_ref(), policy))
            })
            .await?;
        Ok(result)
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Machine-readable error category.
    kind: String,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Machine-readable error category.
    kind: &'static str,
    /// The error message.
    message: String,
}

impl HttpError {
    /// Creates an error response for identity failures.
    pub const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            kind: "AUTHENTICATION_FAILED",
            message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let (status, kind): (StatusCode, &'static str) = match &err {
            ApiError::AuthenticationFailed { .. } => {
                (StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED")
            }
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. } => {
                (StatusCode::FORBIDDEN, "FORBIDDEN")
            }
            ApiError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "VALIDATION"),
            ApiError::ResourceNotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::InvalidState { .. } => (StatusCode::CONFLICT, "INVALID_STATE"),
            ApiError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::ConcurrentModification { .. } => {
                (StatusCode::CONFLICT, "CONCURRENT_MODIFICATION")
            }
            ApiError::CapacityExceeded { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "CAPACITY_EXCEEDED")
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
            }
        };
        Self {
            status,
            kind,
            message: err.to_string(),
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Always `"ok"`.
    status: String,
}

// ============================================================================
// Allocation requests
// ============================================================================

/// Handler for POST `/allocation-requests`.
async fn handle_create_request(
    AxumState(app_state): AxumState<AppState>,
    ActorIdentity(actor, cause_id): ActorIdentity,
    Json(req): Json<CreateAllocationRequest>,
) -> Result<Json<AllocationRequestInfo>, HttpError> {
    info!(
        employee_id = actor.employee_id,
        project_id = req.project_id,
        "Handling create_request"
    );
    let response: AllocationRequestInfo = app_state
        .run(move |persistence, context| {
            create_request(
                persistence,
                context,
                &req,
                &actor,
                request_cause("create_request", &actor, cause_id),
            )
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/allocation-requests/mine`.
async fn handle_list_my_requests(
    AxumState(app_state): AxumState<AppState>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    let response: ListRequestsResponse = app_state
        .run(move |persistence, context| {
            list_my_requests(persistence, context, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/allocation-requests/pending`.
async fn handle_list_pending_requests(
    AxumState(app_state): AxumState<AppState>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    let response: ListRequestsResponse = app_state
        .run(move |persistence, context| {
            list_pending_requests(persistence, context, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for PUT `/allocation-requests/{id}/forward`.
async fn handle_forward_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
    ActorIdentity(actor, cause_id): ActorIdentity,
    Json(req): Json<ForwardRequestRequest>,
) -> Result<Json<AllocationRequestInfo>, HttpError> {
    info!(
        request_id,
        manager_id = actor.employee_id,
        "Handling forward_request"
    );
    let response: AllocationRequestInfo = app_state
        .run(move |persistence, context| {
            forward_request(
                persistence,
                context,
                request_id,
                req,
                &actor,
                request_cause("forward_request", &actor, cause_id),
            )
        })
        .await?;
    Ok(Json(response))
}

/// Handler for PUT `/allocation-requests/{id}/approve`.
async fn handle_approve_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
    ActorIdentity(actor, cause_id): ActorIdentity,
    Json(req): Json<ApproveRequestRequest>,
) -> Result<Json<ApproveRequestResponse>, HttpError> {
    info!(
        request_id,
        hr_id = actor.employee_id,
        allocation_percent = ?req.allocation_percent,
        "Handling approve_request"
    );
    let response: ApproveRequestResponse = app_state
        .run(move |persistence, context| {
            approve_request(
                persistence,
                context,
                request_id,
                &req,
                &actor,
                request_cause("approve_request", &actor, cause_id),
            )
        })
        .await?;
    Ok(Json(response))
}

/// Handler for PUT `/allocation-requests/{id}/reject`.
async fn handle_reject_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
    ActorIdentity(actor, cause_id): ActorIdentity,
    Json(req): Json<RejectRequestRequest>,
) -> Result<Json<AllocationRequestInfo>, HttpError> {
    info!(
        request_id,
        reviewer_id = actor.employee_id,
        "Handling reject_request"
    );
    let response: AllocationRequestInfo = app_state
        .run(move |persistence, context| {
            reject_request(
                persistence,
                context,
                request_id,
                &req,
                &actor,
                request_cause("reject_request", &actor, cause_id),
            )
        })
        .await?;
    Ok(Json(response))
}

// ============================================================================
// Assignments
// ============================================================================

/// Handler for POST `/assignments`.
async fn handle_create_assignment(
    AxumState(app_state): AxumState<AppState>,
    ActorIdentity(actor, cause_id): ActorIdentity,
    Json(req): Json<CreateAssignmentRequest>,
) -> Result<Json<AssignmentInfo>, HttpError> {
    info!(
        employee_id = req.employee_id,
        project_id = req.project_id,
        actor_id = actor.employee_id,
        "Handling create_assignment"
    );
    let response: AssignmentInfo = app_state
        .run(move |persistence, context| {
            create_assignment(
                persistence,
                context,
                req,
                &actor,
                request_cause("create_assignment", &actor, cause_id),
            )
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/assignments`.
async fn handle_list_all_assignments(
    AxumState(app_state): AxumState<AppState>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<ListAssignmentsResponse>, HttpError> {
    let response: ListAssignmentsResponse = app_state
        .run(move |persistence, context| {
            list_all_assignments(persistence, context, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/assignments/employees/{id}`.
async fn handle_list_employee_assignments(
    AxumState(app_state): AxumState<AppState>,
    Path(employee_id): Path<i64>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<EmployeeAssignmentsResponse>, HttpError> {
    let response: EmployeeAssignmentsResponse = app_state
        .run(move |persistence, context| {
            list_employee_assignments(persistence, context, employee_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for PUT `/assignments/{id}/end`.
async fn handle_end_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    ActorIdentity(actor, cause_id): ActorIdentity,
) -> Result<Json<AssignmentInfo>, HttpError> {
    info!(
        assignment_id,
        actor_id = actor.employee_id,
        "Handling end_assignment"
    );
    let response: AssignmentInfo = app_state
        .run(move |persistence, context| {
            end_assignment(
                persistence,
                context,
                assignment_id,
                &actor,
                request_cause("end_assignment", &actor, cause_id),
            )
        })
        .await?;
    Ok(Json(response))
}

/// Handler for PATCH `/assignments/{id}`.
async fn handle_update_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    ActorIdentity(actor, cause_id): ActorIdentity,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Result<Json<AssignmentInfo>, HttpError> {
    info!(
        assignment_id,
        expected_version = req.expected_version,
        actor_id = actor.employee_id,
        "Handling update_assignment"
    );
    let response: AssignmentInfo = app_state
        .run(move |persistence, context| {
            update_assignment(
                persistence,
                context,
                assignment_id,
                req,
                &actor,
                request_cause("update_assignment", &actor, cause_id),
            )
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/allocations/me`.
async fn handle_my_allocation(
    AxumState(app_state): AxumState<AppState>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<CurrentAllocationResponse>, HttpError> {
    let response: CurrentAllocationResponse = app_state
        .run(move |persistence, context| {
            current_allocation(persistence, context, actor.employee_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/allocations/employees/{id}`.
async fn handle_employee_allocation(
    AxumState(app_state): AxumState<AppState>,
    Path(employee_id): Path<i64>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<CurrentAllocationResponse>, HttpError> {
    let response: CurrentAllocationResponse = app_state
        .run(move |persistence, context| {
            current_allocation(persistence, context, employee_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/allocations/employees/{id}/latest`.
async fn handle_latest_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path(employee_id): Path<i64>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<Option<AssignmentInfo>>, HttpError> {
    let response: Option<AssignmentInfo> = app_state
        .run(move |persistence, context| {
            most_recent_assignment(persistence, context, employee_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/projects/{id}/activate`.
async fn handle_activate_project(
    AxumState(app_state): AxumState<AppState>,
    Path(project_id): Path<i64>,
    ActorIdentity(actor, cause_id): ActorIdentity,
) -> Result<Json<ProjectInfo>, HttpError> {
    info!(
        project_id,
        actor_id = actor.employee_id,
        "Handling activate_project"
    );
    let response: ProjectInfo = app_state
        .run(move |persistence, context| {
            activate_project(
                persistence,
                context,
                project_id,
                &actor,
                request_cause("activate_project", &actor, cause_id),
            )
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/employees/{id}/audit`.
async fn handle_audit_trail(
    AxumState(app_state): AxumState<AppState>,
    Path(employee_id): Path<i64>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<AuditTrailResponse>, HttpError> {
    let response: AuditTrailResponse = app_state
        .run(move |persistence, context| {
            audit_trail(persistence, context, employee_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

// ============================================================================
// Utilization
// ============================================================================

/// Handler for GET `/utilization/employees/{id}`.
async fn handle_employee_utilization(
    AxumState(app_state): AxumState<AppState>,
    Path(employee_id): Path<i64>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<EmployeeUtilizationResponse>, HttpError> {
    let response: EmployeeUtilizationResponse = app_state
        .run(move |persistence, context| {
            employee_utilization(persistence, context, employee_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/utilization/me`.
async fn handle_my_utilization(
    AxumState(app_state): AxumState<AppState>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<EmployeeUtilizationResponse>, HttpError> {
    let response: EmployeeUtilizationResponse = app_state
        .run(move |persistence, context| {
            employee_utilization(persistence, context, actor.employee_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/utilization/team`.
async fn handle_my_team_utilization(
    AxumState(app_state): AxumState<AppState>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<TeamUtilizationResponse>, HttpError> {
    let response: TeamUtilizationResponse = app_state
        .run(move |persistence, context| {
            team_utilization(persistence, context, actor.employee_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/utilization/teams/{manager_id}`.
async fn handle_team_utilization(
    AxumState(app_state): AxumState<AppState>,
    Path(manager_id): Path<i64>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<TeamUtilizationResponse>, HttpError> {
    let response: TeamUtilizationResponse = app_state
        .run(move |persistence, context| {
            team_utilization(persistence, context, manager_id, &actor)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/utilization/summary`.
async fn handle_org_summary(
    AxumState(app_state): AxumState<AppState>,
    ActorIdentity(actor, _): ActorIdentity,
) -> Result<Json<OrgSummaryResponse>, HttpError> {
    let response: OrgSummaryResponse = app_state
        .run(move |persistence, context| {
            org_summary(persistence, context, &actor)
        })
        .await?;
    Ok(Json(response))
}

fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { health() }))
        .route("/allocation-requests", post(handle_create_request))
        .route("/allocation-requests/mine", get(handle_list_my_requests))
        .route(
            "/allocation-requests/pending",
            get(handle_list_pending_requests),
        )
        .route(
            "/allocation-requests/{id}/forward",
            put(handle_forward_request),
        )
        .route(
            "/allocation-requests/{id}/approve",
            put(handle_approve_request),
        )
        .route("/allocation-requests/{id}/reject", put(handle_reject_request))
        .route(
            "/assignments",
            post(handle_create_assignment).get(handle_list_all_assignments),
        )
        .route("/assignments/{id}", patch(handle_update_assignment))
        .route("/assignments/{id}/end", put(handle_end_assignment))
        .route(
            "/assignments/employees/{id}",
            get(handle_list_employee_assignments),
        )
        .route("/allocations/me", get(handle_my_allocation))
        .route("/allocations/employees/{id}", get(handle_employee_allocation))
        .route(
            "/allocations/employees/{id}/latest",
            get(handle_latest_assignment),
        )
        .route("/projects/{id}/activate", post(handle_activate_project))
        .route("/employees/{id}/audit", get(handle_audit_trail))
        .route("/utilization/me", get(handle_my_utilization))
        .route("/utilization/team", get(handle_my_team_utilization))
        .route("/utilization/teams/{id}", get(handle_team_utilization))
        .route(
            "/utilization/employees/{id}",
            get(handle_employee_utilization),
        )
        .route("/utilization/summary", get(handle_org_summary))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing SkillBridge Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(seed_path) = &args.seed {
        seed::load_seed_file(&mut persistence, seed_path)?;
    }

    // The startup connection migrated the file; requests open their own
    let storage: Storage = match &args.database {
        Some(db_path) => {
            drop(persistence);
            Storage::file(db_path)
        }
        None => Storage::memory(persistence),
    };

    let policy: WorkflowPolicy = if args.promote_planned_projects {
        info!("Planned projects will be promoted on first assignment");
        WorkflowPolicy::promoting()
    } else {
        WorkflowPolicy::default()
    };

    let app_state: AppState = AppState::new(storage, Arc::new(SystemClock), policy);
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity extraction for the server.
//!
//! Authentication happens upstream: a gateway verifies the caller and
//! forwards their directory id and role in `x-actor-id` / `x-actor-role`.
//! An optional `x-cause-id` header ties a change to an external ticket.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use skillbridge_api::AuthenticatedActor;
use skillbridge_audit::Cause;
use tracing::{debug, warn};

use crate::AppState;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
pub const CAUSE_ID_HEADER: &str = "x-cause-id";

/// Extractor for the asserted caller identity.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     ActorIdentity(actor, cause_id): ActorIdentity,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     let cause: Cause = request_cause("my_operation", &actor, cause_id);
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 if either identity header is missing, not valid
/// UTF-8, or does not parse into an id and a known role.
pub struct ActorIdentity(pub AuthenticatedActor, pub Option<String>);

/// Builds the audit cause for `operation`, preferring the caller's
/// correlation id.
#[must_use]
pub fn request_cause(
    operation: &str,
    actor: &AuthenticatedActor,
    cause_id: Option<String>,
) -> Cause {
    let id: String = cause_id.unwrap_or_else(|| format!("http-{operation}"));
    Cause::new(
        id,
        format!("{operation} by employee {} via HTTP", actor.employee_id),
    )
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, IdentityError> {
    headers
        .get(name)
        .ok_or_else(|| {
            debug!(header = name, "Missing identity header");
            IdentityError::MissingHeader(name)
        })?
        .to_str()
        .map_err(|_| {
            warn!(header = name, "Identity header is not valid text");
            IdentityError::InvalidHeader(name)
        })
}

impl FromRequestParts<AppState> for ActorIdentity {
    type Rejection = IdentityError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id: &str = header(&parts.headers, ACTOR_ID_HEADER)?;
        let role: &str = header(&parts.headers, ACTOR_ROLE_HEADER)?;

        let actor: AuthenticatedActor =
            AuthenticatedActor::from_asserted(id, role).map_err(|e| {
                warn!(error = %e, "Rejected asserted identity");
                IdentityError::Rejected(e.to_string())
            })?;

        let cause_id: Option<String> = parts
            .headers
            .get(CAUSE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        debug!(
            employee_id = actor.employee_id,
            role = %actor.role,
            "Identity accepted"
        );

        Ok(Self(actor, cause_id))
    }
}

/// Identity extraction errors.
///
/// These errors are returned when the identity headers are unusable and
/// are converted to HTTP 401 responses.
#[derive(Debug)]
pub enum IdentityError {
    /// A required header is absent.
    MissingHeader(&'static str),
    /// A header is not valid text.
    InvalidHeader(&'static str),
    /// The id or role did not parse.
    Rejected(String),
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingHeader(name) => format!("Missing {name} header"),
            Self::InvalidHeader(name) => format!("Invalid {name} header"),
            Self::Rejected(reason) => format!("Authentication failed: {reason}"),
        };
        crate::HttpError::new(StatusCode::UNAUTHORIZED, message).into_response()
    }
}

// Event registration HTTP routes (the ledger's public surface)
//
// The store guarantees the capacity/waitlist invariants; this module only
// authenticates callers and maps the ledger's typed errors onto HTTP
// statuses. CapacityConflict and StoreUnavailable are retryable by clients
// with backoff; the rest are terminal for the request.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use gather_core::{
    Attendance, LedgerError, Registration, RegistrationCounts, RegistrationOutcome,
    RegistrationPayload, RegistrationStore,
};

use crate::auth::{self, AuthConfig};
use crate::common::ListResponse;
use crate::services::registration::RegistrationService;

/// App state for registration routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RegistrationService>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn RegistrationStore>, auth: Arc<AuthConfig>) -> Self {
        Self {
            service: Arc::new(RegistrationService::new(store)),
            auth,
        }
    }
}

/// Create registration routes (nested under events)
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/events/:event_id/registrations",
            post(register).get(list_registrations),
        )
        .route(
            "/v1/events/:event_id/registrations/:user_id",
            get(registration_status).delete(unregister),
        )
        .route(
            "/v1/events/:event_id/registrations/:user_id/check-in",
            post(check_in),
        )
        .route(
            "/v1/events/:event_id/registration-counts",
            get(registration_counts),
        )
        .with_state(state)
}

/// Map ledger errors onto HTTP statuses
fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::EventNotFound(_) | LedgerError::NotRegistered { .. } => StatusCode::NOT_FOUND,
        LedgerError::RegistrationClosed(_) => StatusCode::FORBIDDEN,
        LedgerError::AlreadyRegistered { .. } | LedgerError::CapacityConflict(_) => {
            StatusCode::CONFLICT
        }
        LedgerError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_ledger_error(err: LedgerError) -> StatusCode {
    if err.is_retryable() {
        tracing::warn!("ledger operation failed (retryable): {}", err);
    } else {
        tracing::debug!("ledger operation refused: {}", err);
    }
    ledger_status(&err)
}

// ============================================
// Request/response DTOs
// ============================================

/// Request to register for an event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    /// Answers to the event's form questions, keyed by question label
    #[serde(default)]
    pub answers: serde_json::Value,
}

/// Request to record attendance at check-in
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckInRequest {
    pub attendance: Attendance,
}

/// One user's registration standing for an event
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationStatusResponse {
    /// Latest registration for the pair, cancelled included; null when the
    /// user never registered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<Registration>,
    /// 1-based waitlist rank, present only while waitlisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waitlist_position: Option<u32>,
    pub counts: RegistrationCounts,
}

// ============================================
// HTTP Handlers
// ============================================

/// POST /v1/events/{event_id}/registrations - Register the caller
///
/// Lands active while capacity allows, otherwise waitlisted in FIFO order.
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/registrations",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration created", body = RegistrationOutcome),
        (status = 403, description = "Registration is closed"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Already registered, or a concurrent conflict; retry on conflict"),
        (status = 503, description = "Store unavailable, retry with backoff")
    ),
    tag = "registrations"
)]
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegistrationOutcome>), StatusCode> {
    let identity = auth::identify(&state.auth, &headers)?;

    let payload = RegistrationPayload {
        name: req.name,
        email: req.email,
        answers: req.answers,
    };

    let outcome = state
        .service
        .register(event_id, identity.user_id, payload)
        .await
        .map_err(handle_ledger_error)?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// DELETE /v1/events/{event_id}/registrations/{user_id} - Cancel a registration
///
/// Users cancel their own registration; admins may cancel anyone's. When an
/// active registration on a capacity-limited event is cancelled, the head of
/// the waitlist is promoted.
#[utoipa::path(
    delete,
    path = "/v1/events/{event_id}/registrations/{user_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Registration cancelled"),
        (status = 403, description = "Not allowed to cancel this registration"),
        (status = 404, description = "No cancellable registration"),
        (status = 503, description = "Store unavailable, retry with backoff")
    ),
    tag = "registrations"
)]
pub async fn unregister(
    State(state): State<AppState>,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let identity = auth::identify(&state.auth, &headers)?;
    if !identity.may_act_for(user_id) {
        return Err(StatusCode::FORBIDDEN);
    }

    state
        .service
        .unregister(event_id, user_id)
        .await
        .map_err(handle_ledger_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/events/{event_id}/registrations - List registrations (admin)
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/registrations",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "All registrations for the event, cancelled included", body = ListResponse<Registration>),
        (status = 403, description = "Admin privileges required"),
        (status = 503, description = "Store unavailable, retry with backoff")
    ),
    tag = "registrations"
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<ListResponse<Registration>>, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let registrations = state
        .service
        .list(event_id)
        .await
        .map_err(handle_ledger_error)?;

    Ok(Json(ListResponse::new(registrations)))
}

/// GET /v1/events/{event_id}/registrations/{user_id} - Registration standing
///
/// Returns the user's latest registration, their current waitlist rank, and
/// the event's tallies. Visible to the user themself and to admins.
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/registrations/{user_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Registration standing", body = RegistrationStatusResponse),
        (status = 403, description = "Not allowed to view this registration"),
        (status = 503, description = "Store unavailable, retry with backoff")
    ),
    tag = "registrations"
)]
pub async fn registration_status(
    State(state): State<AppState>,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Result<Json<RegistrationStatusResponse>, StatusCode> {
    let identity = auth::identify(&state.auth, &headers)?;
    if !identity.may_act_for(user_id) {
        return Err(StatusCode::FORBIDDEN);
    }

    let status = state
        .service
        .status(event_id, user_id)
        .await
        .map_err(handle_ledger_error)?;

    Ok(Json(RegistrationStatusResponse {
        registration: status.registration,
        waitlist_position: status.waitlist_position,
        counts: status.counts,
    }))
}

/// GET /v1/events/{event_id}/registration-counts - Active/waitlisted tallies
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/registration-counts",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Registration tallies", body = RegistrationCounts),
        (status = 503, description = "Store unavailable, retry with backoff")
    ),
    tag = "registrations"
)]
pub async fn registration_counts(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationCounts>, StatusCode> {
    let counts = state
        .service
        .counts(event_id)
        .await
        .map_err(handle_ledger_error)?;

    Ok(Json(counts))
}

/// POST /v1/events/{event_id}/registrations/{user_id}/check-in - Record attendance
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/registrations/{user_id}/check-in",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Attendance recorded", body = Registration),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "No live registration for the pair"),
        (status = 503, description = "Store unavailable, retry with backoff")
    ),
    tag = "registrations"
)]
pub async fn check_in(
    State(state): State<AppState>,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Json(req): Json<CheckInRequest>,
) -> Result<Json<Registration>, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let registration = state
        .service
        .check_in(event_id, user_id, req.attendance)
        .await
        .map_err(handle_ledger_error)?;

    Ok(Json(registration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_errors_map_to_documented_statuses() {
        let event_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();

        assert_eq!(
            ledger_status(&LedgerError::EventNotFound(event_id)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ledger_status(&LedgerError::NotRegistered { event_id, user_id }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ledger_status(&LedgerError::RegistrationClosed(event_id)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ledger_status(&LedgerError::AlreadyRegistered { event_id, user_id }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ledger_status(&LedgerError::CapacityConflict(event_id)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ledger_status(&LedgerError::StoreUnavailable("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}

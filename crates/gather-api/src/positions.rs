// Position and application HTTP routes
//
// Applications are nested under positions and are never deleted; review
// moves them between pending/accepted/rejected.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use gather_core::{Application, ApplicationStatus, Position, PositionStatus};
use gather_storage::{
    models::{CreateApplication, CreatePosition, UpdatePosition},
    Database,
};

use crate::auth::{self, AuthConfig};
use crate::common::ListResponse;
use crate::services::PositionService;

/// App state for position routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PositionService>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth: Arc<AuthConfig>) -> Self {
        Self {
            service: Arc::new(PositionService::new(db)),
            auth,
        }
    }
}

/// Create position routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/positions", post(create_position).get(list_positions))
        .route(
            "/v1/positions/:position_id",
            get(get_position).patch(update_position),
        )
        .route(
            "/v1/positions/:position_id/applications",
            post(submit_application).get(list_applications),
        )
        .route(
            "/v1/positions/:position_id/applications/:application_id/status",
            put(set_application_status),
        )
        .with_state(state)
}

/// Request to create a position
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePositionRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<PositionStatus>,
}

/// Request to update a position; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePositionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PositionStatus>,
}

/// Request to submit an application
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitApplicationRequest {
    pub name: String,
    pub email: String,
    /// Answers keyed by question label
    #[serde(default)]
    pub answers: serde_json::Value,
}

/// Request to review an application
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetApplicationStatusRequest {
    pub status: ApplicationStatus,
}

/// Query parameters for the position listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPositionsQuery {
    /// Include draft and inactive positions (admin only)
    #[serde(default)]
    pub all: bool,
}

/// POST /v1/positions - Create a position (admin)
#[utoipa::path(
    post,
    path = "/v1/positions",
    request_body = CreatePositionRequest,
    responses(
        (status = 201, description = "Position created", body = Position),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "positions"
)]
pub async fn create_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreatePositionRequest>,
) -> Result<(StatusCode, Json<Position>), StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let input = CreatePosition {
        name: req.name,
        description: req.description,
        tags: req.tags,
        status: req.status.unwrap_or(PositionStatus::Draft).to_string(),
    };

    let position = state.service.create(input).await.map_err(|e| {
        tracing::error!("Failed to create position: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((StatusCode::CREATED, Json(position)))
}

/// GET /v1/positions - List positions
#[utoipa::path(
    get,
    path = "/v1/positions",
    params(ListPositionsQuery),
    responses(
        (status = 200, description = "List of positions", body = ListResponse<Position>),
        (status = 403, description = "Admin privileges required for all=true"),
        (status = 500, description = "Internal server error")
    ),
    tag = "positions"
)]
pub async fn list_positions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListPositionsQuery>,
) -> Result<Json<ListResponse<Position>>, StatusCode> {
    if query.all {
        auth::identify_admin(&state.auth, &headers)?;
    }

    let positions = state.service.list(!query.all).await.map_err(|e| {
        tracing::error!("Failed to list positions: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(positions)))
}

/// GET /v1/positions/{position_id} - Get position by ID
#[utoipa::path(
    get,
    path = "/v1/positions/{position_id}",
    params(
        ("position_id" = Uuid, Path, description = "Position ID")
    ),
    responses(
        (status = 200, description = "Position found", body = Position),
        (status = 404, description = "Position not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "positions"
)]
pub async fn get_position(
    State(state): State<AppState>,
    Path(position_id): Path<Uuid>,
) -> Result<Json<Position>, StatusCode> {
    let position = state
        .service
        .get(position_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get position: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(position))
}

/// PATCH /v1/positions/{position_id} - Update position (admin)
#[utoipa::path(
    patch,
    path = "/v1/positions/{position_id}",
    params(
        ("position_id" = Uuid, Path, description = "Position ID")
    ),
    request_body = UpdatePositionRequest,
    responses(
        (status = 200, description = "Position updated", body = Position),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Position not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "positions"
)]
pub async fn update_position(
    State(state): State<AppState>,
    Path(position_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdatePositionRequest>,
) -> Result<Json<Position>, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let input = UpdatePosition {
        name: req.name,
        description: req.description,
        tags: req.tags,
        status: req.status.map(|s| s.to_string()),
    };

    let position = state
        .service
        .update(position_id, input)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update position: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(position))
}

/// POST /v1/positions/{position_id}/applications - Apply (self)
///
/// The position must be active; one application per user, never deleted.
#[utoipa::path(
    post,
    path = "/v1/positions/{position_id}/applications",
    params(
        ("position_id" = Uuid, Path, description = "Position ID")
    ),
    request_body = SubmitApplicationRequest,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 403, description = "Position is not accepting applications"),
        (status = 404, description = "Position not found"),
        (status = 409, description = "Already applied"),
        (status = 500, description = "Internal server error")
    ),
    tag = "positions"
)]
pub async fn submit_application(
    State(state): State<AppState>,
    Path(position_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), StatusCode> {
    let identity = auth::identify(&state.auth, &headers)?;

    let position = state
        .service
        .get(position_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get position: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    if !position.accepts_applications() {
        return Err(StatusCode::FORBIDDEN);
    }

    let application = state
        .service
        .apply(CreateApplication {
            position_id,
            user_id: identity.user_id,
            name: req.name,
            email: req.email,
            answers: req.answers,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to submit application: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::CONFLICT)?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /v1/positions/{position_id}/applications - List applications (admin)
#[utoipa::path(
    get,
    path = "/v1/positions/{position_id}/applications",
    params(
        ("position_id" = Uuid, Path, description = "Position ID")
    ),
    responses(
        (status = 200, description = "Applications in submission order", body = ListResponse<Application>),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "positions"
)]
pub async fn list_applications(
    State(state): State<AppState>,
    Path(position_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<ListResponse<Application>>, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let applications = state
        .service
        .list_applications(position_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list applications: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ListResponse::new(applications)))
}

/// PUT /v1/positions/{position_id}/applications/{application_id}/status - Review (admin)
#[utoipa::path(
    put,
    path = "/v1/positions/{position_id}/applications/{application_id}/status",
    params(
        ("position_id" = Uuid, Path, description = "Position ID"),
        ("application_id" = Uuid, Path, description = "Application ID")
    ),
    request_body = SetApplicationStatusRequest,
    responses(
        (status = 200, description = "Application reviewed", body = Application),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Application not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "positions"
)]
pub async fn set_application_status(
    State(state): State<AppState>,
    Path((_position_id, application_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Json(req): Json<SetApplicationStatusRequest>,
) -> Result<Json<Application>, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let application = state
        .service
        .set_application_status(application_id, req.status)
        .await
        .map_err(|e| {
            tracing::error!("Failed to review application: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(application))
}

// Team roster HTTP routes

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use gather_core::{TeamMember, TeamRole};
use gather_storage::{
    models::{CreateTeamMember, UpdateTeamMember},
    Database,
};

use crate::auth::{self, AuthConfig};
use crate::common::ListResponse;
use crate::services::TeamService;

/// App state for team routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TeamService>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth: Arc<AuthConfig>) -> Self {
        Self {
            service: Arc::new(TeamService::new(db)),
            auth,
        }
    }
}

/// Create team routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/team", get(roster))
        .route("/v1/team/members", post(create_member))
        .route(
            "/v1/team/members/:member_id",
            get(get_member).patch(update_member).delete(delete_member),
        )
        .with_state(state)
}

/// Request to add a roster entry
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTeamMemberRequest {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub role: TeamRole,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

/// Request to update a roster entry; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTeamMemberRequest {
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub role: Option<TeamRole>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub display_order: Option<i32>,
}

/// GET /v1/team - Roster in display order
#[utoipa::path(
    get,
    path = "/v1/team",
    responses(
        (status = 200, description = "Roster ordered by role rank, then custom order", body = ListResponse<TeamMember>),
        (status = 500, description = "Internal server error")
    ),
    tag = "team"
)]
pub async fn roster(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<TeamMember>>, StatusCode> {
    let members = state.service.roster().await.map_err(|e| {
        tracing::error!("Failed to load roster: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(members)))
}

/// POST /v1/team/members - Add a roster entry (admin)
#[utoipa::path(
    post,
    path = "/v1/team/members",
    request_body = CreateTeamMemberRequest,
    responses(
        (status = 201, description = "Roster entry created", body = TeamMember),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "team"
)]
pub async fn create_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTeamMemberRequest>,
) -> Result<(StatusCode, Json<TeamMember>), StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let input = CreateTeamMember {
        user_id: req.user_id,
        name: req.name,
        role: req.role.to_string(),
        bio: req.bio,
        image_url: req.image_url,
        linkedin: req.linkedin,
        github: req.github,
        display_order: req.display_order,
    };

    let member = state.service.create(input).await.map_err(|e| {
        tracing::error!("Failed to add roster entry: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /v1/team/members/{member_id} - Get roster entry by ID
#[utoipa::path(
    get,
    path = "/v1/team/members/{member_id}",
    params(
        ("member_id" = Uuid, Path, description = "Roster entry ID")
    ),
    responses(
        (status = 200, description = "Roster entry found", body = TeamMember),
        (status = 404, description = "Roster entry not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "team"
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<TeamMember>, StatusCode> {
    let member = state
        .service
        .get(member_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get roster entry: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(member))
}

/// PATCH /v1/team/members/{member_id} - Update roster entry (admin)
#[utoipa::path(
    patch,
    path = "/v1/team/members/{member_id}",
    params(
        ("member_id" = Uuid, Path, description = "Roster entry ID")
    ),
    request_body = UpdateTeamMemberRequest,
    responses(
        (status = 200, description = "Roster entry updated", body = TeamMember),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Roster entry not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "team"
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateTeamMemberRequest>,
) -> Result<Json<TeamMember>, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let input = UpdateTeamMember {
        user_id: req.user_id,
        name: req.name,
        role: req.role.map(|r| r.to_string()),
        bio: req.bio,
        image_url: req.image_url,
        linkedin: req.linkedin,
        github: req.github,
        display_order: req.display_order,
    };

    let member = state
        .service
        .update(member_id, input)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update roster entry: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(member))
}

/// DELETE /v1/team/members/{member_id} - Remove roster entry (admin)
#[utoipa::path(
    delete,
    path = "/v1/team/members/{member_id}",
    params(
        ("member_id" = Uuid, Path, description = "Roster entry ID")
    ),
    responses(
        (status = 204, description = "Roster entry removed"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Roster entry not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "team"
)]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let deleted = state.service.delete(member_id).await.map_err(|e| {
        tracing::error!("Failed to remove roster entry: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

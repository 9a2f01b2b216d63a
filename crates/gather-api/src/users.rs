// User profile and role HTTP routes
//
// Role grants mirror the identity service's custom claims: only a
// superadmin may grant or revoke roles, and the grant is recorded on the
// user row for this API's own enforcement.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use gather_core::{User, UserRole};
use gather_storage::{
    models::{CreateUser, UpdateUser},
    Database,
};

use crate::auth::{self, AuthConfig};
use crate::common::ListResponse;
use crate::services::UserService;

/// App state for user routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth: Arc<AuthConfig>) -> Self {
        Self {
            service: Arc::new(UserService::new(db)),
            auth,
        }
    }
}

/// Create user routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/users", get(list_users))
        .route("/v1/users/:user_id", get(get_user).patch(update_user))
        .route("/v1/users/:user_id/role", put(set_role))
        .with_state(state)
}

/// Request to update a user profile; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub public_name: Option<String>,
    pub bio: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub profile_image_url: Option<String>,
    /// Email recorded when the profile row is created lazily
    pub email: Option<String>,
}

/// Request to set a user's role
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetRoleRequest {
    pub role: UserRole,
}

/// GET /v1/users - List users (admin)
#[utoipa::path(
    get,
    path = "/v1/users",
    responses(
        (status = 200, description = "List of users", body = ListResponse<User>),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListResponse<User>>, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let users = state.service.list().await.map_err(|e| {
        tracing::error!("Failed to list users: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(users)))
}

/// GET /v1/users/{user_id} - Get user by ID
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, StatusCode> {
    let user = state
        .service
        .get(user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(user))
}

/// PATCH /v1/users/{user_id} - Update a profile (self or admin)
///
/// Creates the profile row lazily on first write.
#[utoipa::path(
    patch,
    path = "/v1/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 403, description = "Not allowed to edit this profile"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, StatusCode> {
    let identity = auth::identify(&state.auth, &headers)?;
    if !identity.may_act_for(user_id) {
        return Err(StatusCode::FORBIDDEN);
    }

    // Lazy profile creation on first write
    if state
        .service
        .get(user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .is_none()
    {
        let email = req.email.clone().ok_or(StatusCode::BAD_REQUEST)?;
        state
            .service
            .upsert(CreateUser {
                id: user_id,
                email,
                public_name: req.public_name.clone(),
            })
            .await
            .map_err(|e| {
                tracing::error!("Failed to create user: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
    }

    let input = UpdateUser {
        public_name: req.public_name,
        bio: req.bio,
        linkedin: req.linkedin,
        github: req.github,
        profile_image_url: req.profile_image_url,
    };

    let user = state
        .service
        .update(user_id, input)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(user))
}

/// PUT /v1/users/{user_id}/role - Grant or revoke a role (superadmin)
#[utoipa::path(
    put,
    path = "/v1/users/{user_id}/role",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = SetRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = User),
        (status = 403, description = "Superadmin privileges required"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn set_role(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<SetRoleRequest>,
) -> Result<Json<User>, StatusCode> {
    auth::identify_superadmin(&state.auth, &headers)?;

    let user = state
        .service
        .set_role(user_id, req.role)
        .await
        .map_err(|e| {
            tracing::error!("Failed to set role: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(user))
}

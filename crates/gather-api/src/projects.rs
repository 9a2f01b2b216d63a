// Project showcase HTTP routes

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

use gather_core::{Contributor, Project};
use gather_storage::{
    models::{CreateProject, UpdateProject},
    Database,
};

use crate::auth::{self, AuthConfig};
use crate::common::ListResponse;
use crate::services::ProjectService;

/// App state for project routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProjectService>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth: Arc<AuthConfig>) -> Self {
        Self {
            service: Arc::new(ProjectService::new(db)),
            auth,
        }
    }
}

/// Create project routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/projects", post(create_project).get(list_projects))
        .route(
            "/v1/projects/:project_id",
            get(get_project).patch(update_project).delete(delete_project),
        )
        .with_state(state)
}

/// Request to create a project
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    pub image_url: Option<String>,
}

/// Request to update a project; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub languages: Option<Vec<String>>,
    pub link: Option<String>,
    pub color: Option<String>,
    pub contributors: Option<Vec<Contributor>>,
    pub image_url: Option<String>,
}

/// POST /v1/projects - Create a project (admin)
#[utoipa::path(
    post,
    path = "/v1/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let input = CreateProject {
        title: req.title,
        description: req.description,
        languages: req.languages,
        link: req.link,
        color: req.color,
        contributors: serde_json::to_value(&req.contributors)
            .unwrap_or_else(|_| serde_json::Value::Array(vec![])),
        image_url: req.image_url,
    };

    let project = state.service.create(input).await.map_err(|e| {
        tracing::error!("Failed to create project: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /v1/projects - List projects
#[utoipa::path(
    get,
    path = "/v1/projects",
    responses(
        (status = 200, description = "List of projects", body = ListResponse<Project>),
        (status = 500, description = "Internal server error")
    ),
    tag = "projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Project>>, StatusCode> {
    let projects = state.service.list().await.map_err(|e| {
        tracing::error!("Failed to list projects: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(projects)))
}

/// GET /v1/projects/{project_id} - Get project by ID
#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Project>, StatusCode> {
    let project = state
        .service
        .get(project_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get project: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(project))
}

/// PATCH /v1/projects/{project_id} - Update project (admin)
#[utoipa::path(
    patch,
    path = "/v1/projects/{project_id}",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let input = UpdateProject {
        title: req.title,
        description: req.description,
        languages: req.languages,
        link: req.link,
        color: req.color,
        contributors: req.contributors.map(|c| {
            serde_json::to_value(&c).unwrap_or_else(|_| serde_json::Value::Array(vec![]))
        }),
        image_url: req.image_url,
    };

    let project = state
        .service
        .update(project_id, input)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update project: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(project))
}

/// DELETE /v1/projects/{project_id} - Delete project (admin)
#[utoipa::path(
    delete,
    path = "/v1/projects/{project_id}",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let deleted = state.service.delete(project_id).await.map_err(|e| {
        tracing::error!("Failed to delete project: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

// Event CRUD HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use gather_core::{Event, EventQuestion, EventStatus};
use gather_storage::{
    models::{CreateEvent, UpdateEvent},
    Database,
};

use crate::auth::{self, AuthConfig};
use crate::common::ListResponse;
use crate::services::EventService;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth: Arc<AuthConfig>) -> Self {
        Self {
            service: Arc::new(EventService::new(db)),
            auth,
        }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event).get(list_events))
        .route(
            "/v1/events/:event_id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .with_state(state)
}

/// Request to create an event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Maximum simultaneously active registrations; omit for unbounded
    pub capacity: Option<i32>,
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub organizers: Vec<Uuid>,
    pub link: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub questions: Vec<EventQuestion>,
}

/// Request to update an event; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub status: Option<EventStatus>,
    pub tags: Option<Vec<String>>,
    pub organizers: Option<Vec<Uuid>>,
    pub link: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub questions: Option<Vec<EventQuestion>>,
}

/// Query parameters for the event listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListEventsQuery {
    /// Include hidden and test events (admin only)
    #[serde(default)]
    pub all: bool,
}

/// POST /v1/events - Create a new event
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created successfully", body = Event),
        (status = 403, description = "Admin privileges required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let input = CreateEvent {
        title: req.title,
        description: req.description,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        location: req.location,
        registration_deadline: req.registration_deadline,
        capacity: req.capacity,
        status: req.status.unwrap_or(EventStatus::Published).to_string(),
        tags: req.tags,
        organizers: req.organizers,
        link: req.link,
        image_urls: req.image_urls,
        questions: serde_json::to_value(&req.questions)
            .unwrap_or_else(|_| serde_json::Value::Array(vec![])),
    };

    let event = state.service.create(input).await.map_err(|e| {
        tracing::error!("Failed to create event: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /v1/events - List events
///
/// Hidden and test events appear only with `?all=true` and admin rights.
#[utoipa::path(
    get,
    path = "/v1/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "List of events", body = ListResponse<Event>),
        (status = 403, description = "Admin privileges required for all=true"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListResponse<Event>>, StatusCode> {
    if query.all {
        auth::identify_admin(&state.auth, &headers)?;
    }

    let events = state.service.list(!query.all).await.map_err(|e| {
        tracing::error!("Failed to list events: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, StatusCode> {
    let event = state
        .service
        .get(event_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get event: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(event))
}

/// PATCH /v1/events/{event_id} - Update event
#[utoipa::path(
    patch,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated successfully", body = Event),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let input = UpdateEvent {
        title: req.title,
        description: req.description,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        location: req.location,
        registration_deadline: req.registration_deadline,
        capacity: req.capacity,
        status: req.status.map(|s| s.to_string()),
        tags: req.tags,
        organizers: req.organizers,
        link: req.link,
        image_urls: req.image_urls,
        questions: req.questions.map(|q| {
            serde_json::to_value(&q).unwrap_or_else(|_| serde_json::Value::Array(vec![]))
        }),
    };

    let event = state
        .service
        .update(event_id, input)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update event: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(event))
}

/// DELETE /v1/events/{event_id} - Delete event
///
/// Registrations for the event are retained as history.
#[utoipa::path(
    delete,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted successfully"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    auth::identify_admin(&state.auth, &headers)?;

    let deleted = state.service.delete(event_id).await.map_err(|e| {
        tracing::error!("Failed to delete event: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

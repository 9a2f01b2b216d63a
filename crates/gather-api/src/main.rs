// Gather API server
// Decision: Flexible auth with support for no-auth and jwt-verification modes
// Decision: Per-resource route modules with their own states, merged here

mod auth;
mod common;
mod events;
mod positions;
mod projects;
mod registrations;
mod services;
mod team;
mod users;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use gather_core::{
    Application, ApplicationStatus, Attendance, Contributor, Event, EventQuestion, EventStatus,
    Position, PositionStatus, Project, QuestionKind, Registration, RegistrationCounts,
    RegistrationOutcome, RegistrationStatus, RegistrationStore, TeamMember, TeamRole, User,
    UserRole,
};
use gather_storage::{Database, PgRegistrationStore};

use common::ListResponse;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    auth_mode: String,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        auth_mode: state.auth_mode.clone(),
    })
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    auth_mode: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        events::create_event,
        events::list_events,
        events::get_event,
        events::update_event,
        events::delete_event,
        registrations::register,
        registrations::unregister,
        registrations::list_registrations,
        registrations::registration_status,
        registrations::registration_counts,
        registrations::check_in,
        users::list_users,
        users::get_user,
        users::update_user,
        users::set_role,
        positions::create_position,
        positions::list_positions,
        positions::get_position,
        positions::update_position,
        positions::submit_application,
        positions::list_applications,
        positions::set_application_status,
        projects::create_project,
        projects::list_projects,
        projects::get_project,
        projects::update_project,
        projects::delete_project,
        team::roster,
        team::create_member,
        team::get_member,
        team::update_member,
        team::delete_member,
    ),
    components(
        schemas(
            Event, EventStatus, EventQuestion, QuestionKind,
            Registration, RegistrationStatus, Attendance,
            RegistrationOutcome, RegistrationCounts,
            User, UserRole,
            Position, PositionStatus, Application, ApplicationStatus,
            Project, Contributor,
            TeamMember, TeamRole,
            events::CreateEventRequest, events::UpdateEventRequest,
            registrations::RegisterRequest, registrations::CheckInRequest,
            registrations::RegistrationStatusResponse,
            users::UpdateUserRequest, users::SetRoleRequest,
            positions::CreatePositionRequest, positions::UpdatePositionRequest,
            positions::SubmitApplicationRequest, positions::SetApplicationStatusRequest,
            projects::CreateProjectRequest, projects::UpdateProjectRequest,
            team::CreateTeamMemberRequest, team::UpdateTeamMemberRequest,
            ListResponse<Event>,
            ListResponse<Registration>,
            ListResponse<User>,
            ListResponse<Position>,
            ListResponse<Application>,
            ListResponse<Project>,
            ListResponse<TeamMember>,
        )
    ),
    tags(
        (name = "events", description = "Event management endpoints"),
        (name = "registrations", description = "Event registration and waitlist endpoints"),
        (name = "users", description = "User profile and role endpoints"),
        (name = "positions", description = "Open position and application endpoints"),
        (name = "projects", description = "Project showcase endpoints"),
        (name = "team", description = "Team roster endpoints")
    ),
    info(
        title = "Gather API",
        version = "0.2.0",
        description = "API for community events, registrations, positions, projects, and team",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gather_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    tracing::info!("gather-api starting...");

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    // Load authentication configuration
    let auth_config = Arc::new(auth::AuthConfig::from_env());
    tracing::info!(mode = ?auth_config.mode, "Authentication configured");

    // The registration ledger shares the database pool
    let registration_store: Arc<dyn RegistrationStore> =
        Arc::new(PgRegistrationStore::new(db.pool().clone()));

    // Create module-specific states
    let db = Arc::new(db);
    let events_state = events::AppState::new(db.clone(), auth_config.clone());
    let registrations_state =
        registrations::AppState::new(registration_store, auth_config.clone());
    let users_state = users::AppState::new(db.clone(), auth_config.clone());
    let positions_state = positions::AppState::new(db.clone(), auth_config.clone());
    let projects_state = projects::AppState::new(db.clone(), auth_config.clone());
    let team_state = team::AppState::new(db.clone(), auth_config.clone());
    let health_state = HealthState {
        auth_mode: format!("{:?}", auth_config.mode),
    };

    // Load API prefix from environment (default: empty)
    // Example: API_PREFIX="/api" results in routes like /api/v1/events
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();
    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    // Load CORS allowed origins from environment (optional)
    // Only needed when the site is served from a different origin than the API
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    // Note: registration routes must be merged alongside event routes;
    // their paths nest under /v1/events/{event_id} without conflicting
    let api_routes = Router::new()
        .merge(events::routes(events_state))
        .merge(registrations::routes(registrations_state))
        .merge(users::routes(users_state))
        .merge(positions::routes(positions_state))
        .merge(projects::routes(projects_state))
        .merge(team::routes(team_state));

    // Build main router with health (not prefixed) and prefixed API routes
    let mut app = Router::new().route("/health", get(health).with_state(health_state));

    // Apply API prefix if configured
    app = app.merge(build_router_with_prefix(api_routes, &api_prefix));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:9000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/v1/test", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        // Route should work with prefix
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }
}

// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use gather_core::{
    Application, Contributor, Event, EventQuestion, Position, Project, Registration, TeamMember,
    User,
};

// ============================================
// User models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub public_name: Option<String>,
    pub email: String,
    pub bio: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub profile_image_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            public_name: row.public_name,
            email: row.email,
            bio: row.bio,
            linkedin: row.linkedin,
            github: row.github,
            profile_image_url: row.profile_image_url,
            role: row.role.as_str().into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub email: String,
    pub public_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub public_name: Option<String>,
    pub bio: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub profile_image_url: Option<String>,
}

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub status: String,
    pub tags: Vec<String>,
    pub organizers: Vec<Uuid>,
    pub link: Option<String>,
    pub image_urls: Vec<String>,
    pub questions: sqlx::types::JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let questions: Vec<EventQuestion> =
            serde_json::from_value(row.questions).unwrap_or_default();
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            location: row.location,
            registration_deadline: row.registration_deadline,
            capacity: row.capacity,
            status: row.status.as_str().into(),
            tags: row.tags,
            organizers: row.organizers,
            link: row.link,
            image_urls: row.image_urls,
            questions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub status: String,
    pub tags: Vec<String>,
    pub organizers: Vec<Uuid>,
    pub link: Option<String>,
    pub image_urls: Vec<String>,
    pub questions: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub organizers: Option<Vec<Uuid>>,
    pub link: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub questions: Option<serde_json::Value>,
}

// ============================================
// Registration models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub position: Option<i64>,
    pub name: String,
    pub email: String,
    pub answers: sqlx::types::JsonValue,
    pub attendance: String,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Registration {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            status: row.status.as_str().into(),
            position: row.position,
            name: row.name,
            email: row.email,
            answers: row.answers,
            attendance: row.attendance.as_str().into(),
            checked_in_at: row.checked_in_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ============================================
// Position and application models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct PositionRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PositionRow> for Position {
    fn from(row: PositionRow) -> Self {
        Position {
            id: row.id,
            name: row.name,
            description: row.description,
            tags: row.tags,
            status: row.status.as_str().into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePosition {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePosition {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub position_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub answers: sqlx::types::JsonValue,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Application {
            id: row.id,
            position_id: row.position_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            answers: row.answers,
            status: row.status.as_str().into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateApplication {
    pub position_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub answers: serde_json::Value,
}

// ============================================
// Project models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub languages: Vec<String>,
    pub link: String,
    pub color: String,
    pub contributors: sqlx::types::JsonValue,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        let contributors: Vec<Contributor> =
            serde_json::from_value(row.contributors).unwrap_or_default();
        Project {
            id: row.id,
            title: row.title,
            description: row.description,
            languages: row.languages,
            link: row.link,
            color: row.color,
            contributors,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub languages: Vec<String>,
    pub link: String,
    pub color: String,
    pub contributors: serde_json::Value,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub languages: Option<Vec<String>>,
    pub link: Option<String>,
    pub color: Option<String>,
    pub contributors: Option<serde_json::Value>,
    pub image_url: Option<String>,
}

// ============================================
// Team roster models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        TeamMember {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            role: row.role.as_str().into(),
            bio: row.bio,
            image_url: row.image_url,
            linkedin: row.linkedin,
            github: row.github,
            display_order: row.display_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTeamMember {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTeamMember {
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub display_order: Option<i32>,
}

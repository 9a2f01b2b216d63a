// Position and application domain types
//
// Applications follow the same retention rule as registrations: they are
// never deleted, only moved between statuses. One application per
// (position, user) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Position status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Draft,
    Active,
    Inactive,
}

impl std::fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionStatus::Draft => write!(f, "draft"),
            PositionStatus::Active => write!(f, "active"),
            PositionStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl From<&str> for PositionStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => PositionStatus::Active,
            "inactive" => PositionStatus::Inactive,
            _ => PositionStatus::Draft,
        }
    }
}

/// Position - an open role members can apply to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Position {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: PositionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    /// Only active positions accept applications
    pub fn accepts_applications(&self) -> bool {
        self.status == PositionStatus::Active
    }
}

/// Application status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Accepted => write!(f, "accepted"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl From<&str> for ApplicationStatus {
    fn from(s: &str) -> Self {
        match s {
            "accepted" => ApplicationStatus::Accepted,
            "rejected" => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Pending,
        }
    }
}

/// Application - one user's submission for one position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Application {
    pub id: Uuid,
    pub position_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    /// Answers keyed by question label
    #[serde(default)]
    pub answers: serde_json::Value,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

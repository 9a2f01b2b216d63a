// Registration domain types
//
// A registration row is never deleted: cancellation is a status transition
// and a later attempt by the same user creates a fresh row. At most one
// non-cancelled row exists per (event, user) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Registration status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Confirmed, capacity-consuming registration
    Active,
    /// Held in FIFO order pending a future vacancy
    Waitlisted,
    /// Terminal; never reactivated
    Cancelled,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Active => write!(f, "active"),
            RegistrationStatus::Waitlisted => write!(f, "waitlisted"),
            RegistrationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl From<&str> for RegistrationStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => RegistrationStatus::Active,
            "waitlisted" => RegistrationStatus::Waitlisted,
            _ => RegistrationStatus::Cancelled,
        }
    }
}

/// Attendance outcome recorded at check-in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    Pending,
    Attended,
    NoShow,
}

impl std::fmt::Display for Attendance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attendance::Pending => write!(f, "pending"),
            Attendance::Attended => write!(f, "attended"),
            Attendance::NoShow => write!(f, "no_show"),
        }
    }
}

impl From<&str> for Attendance {
    fn from(s: &str) -> Self {
        match s {
            "attended" => Attendance::Attended,
            "no_show" => Attendance::NoShow,
            _ => Attendance::Pending,
        }
    }
}

/// Registration - one attempt by one user to attend one event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
    /// Per-event creation-order token for waitlisted rows; cleared on
    /// promotion, never renumbered. Rank is computed on read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    pub name: String,
    pub email: String,
    /// Answers to the event's form questions, keyed by question label
    #[serde(default)]
    pub answers: serde_json::Value,
    pub attendance: Attendance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Active
    }

    pub fn is_waitlisted(&self) -> bool {
        self.status == RegistrationStatus::Waitlisted
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == RegistrationStatus::Cancelled
    }
}

/// Attendee details captured at registration time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegistrationPayload {
    pub name: String,
    pub email: String,
    #[serde(default = "empty_answers")]
    pub answers: serde_json::Value,
}

fn empty_answers() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Outcome of a successful register call
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegistrationOutcome {
    pub registration: Registration,
    /// 1-based waitlist rank when the attempt landed on the waitlist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waitlist_position: Option<u32>,
}

/// Active/waitlisted tallies for an event
#[derive(Debug, Clone, Copy, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegistrationCounts {
    pub active: u32,
    pub waitlisted: u32,
}

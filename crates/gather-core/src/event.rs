// Event domain types
//
// These types represent the Event entity, its visibility status, and the
// registration form schema. Used by both API and storage crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Event visibility status
///
/// `Test` events are never open for registration and never public.
/// `Hidden` events accept registrations via direct link but stay off the
/// public listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Published,
    Hidden,
    Test,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Published => write!(f, "published"),
            EventStatus::Hidden => write!(f, "hidden"),
            EventStatus::Test => write!(f, "test"),
        }
    }
}

impl From<&str> for EventStatus {
    fn from(s: &str) -> Self {
        match s {
            "hidden" => EventStatus::Hidden,
            "test" => EventStatus::Test,
            _ => EventStatus::Published,
        }
    }
}

/// Kind of answer a registration form question collects
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Textarea,
    Select,
    Checkbox,
    File,
}

/// A question on the event's registration form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventQuestion {
    pub kind: QuestionKind,
    pub label: String,
    /// Choices for select and checkbox questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
}

/// Event - a gathering users can register for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New attempts are refused after this moment; defaults to `starts_at`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Maximum simultaneously active registrations; unbounded if absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    pub status: EventStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    /// User ids of the organizers
    #[serde(default)]
    pub organizers: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub questions: Vec<EventQuestion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether a new registration attempt is accepted at `now`.
    ///
    /// Test events are never open. Otherwise the window closes at the
    /// registration deadline when one is set, else at the event start.
    pub fn is_registration_open_at(&self, now: DateTime<Utc>) -> bool {
        if self.status == EventStatus::Test {
            return false;
        }
        match self.registration_deadline {
            Some(deadline) => deadline > now,
            None => self.starts_at > now,
        }
    }

    /// Whether a new registration attempt is accepted right now
    pub fn is_registration_open(&self) -> bool {
        self.is_registration_open_at(Utc::now())
    }

    /// Visible on the public listing
    pub fn is_public(&self) -> bool {
        self.status == EventStatus::Published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(status: EventStatus) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::now_v7(),
            title: "Intro night".to_string(),
            description: String::new(),
            starts_at: now + Duration::days(7),
            ends_at: None,
            location: None,
            registration_deadline: None,
            capacity: None,
            status,
            tags: vec![],
            organizers: vec![],
            link: None,
            image_urls: vec![],
            questions: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn open_until_event_start_without_deadline() {
        let e = event(EventStatus::Published);
        assert!(e.is_registration_open_at(e.starts_at - Duration::hours(1)));
        assert!(!e.is_registration_open_at(e.starts_at));
        assert!(!e.is_registration_open_at(e.starts_at + Duration::hours(1)));
    }

    #[test]
    fn deadline_overrides_event_start() {
        let mut e = event(EventStatus::Published);
        e.registration_deadline = Some(e.starts_at - Duration::days(2));
        assert!(e.is_registration_open_at(e.starts_at - Duration::days(3)));
        assert!(!e.is_registration_open_at(e.starts_at - Duration::days(1)));
    }

    #[test]
    fn test_events_are_never_open() {
        let e = event(EventStatus::Test);
        assert!(!e.is_registration_open_at(e.starts_at - Duration::days(1)));
    }

    #[test]
    fn hidden_events_are_open_but_not_public() {
        let e = event(EventStatus::Hidden);
        assert!(e.is_registration_open_at(e.starts_at - Duration::days(1)));
        assert!(!e.is_public());
    }
}

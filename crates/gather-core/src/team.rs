// Team roster domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Fixed set of roster roles, ordered for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    CoLead,
    ViceLead,
    Technology,
    Advisor,
    Academics,
    Marketing,
    Operations,
}

impl TeamRole {
    /// Display rank; lower sorts first on the roster
    pub fn rank(self) -> u8 {
        match self {
            TeamRole::CoLead => 1,
            TeamRole::ViceLead => 2,
            TeamRole::Technology => 3,
            TeamRole::Advisor => 4,
            TeamRole::Academics => 5,
            TeamRole::Marketing => 6,
            TeamRole::Operations => 7,
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamRole::CoLead => write!(f, "co_lead"),
            TeamRole::ViceLead => write!(f, "vice_lead"),
            TeamRole::Technology => write!(f, "technology"),
            TeamRole::Advisor => write!(f, "advisor"),
            TeamRole::Academics => write!(f, "academics"),
            TeamRole::Marketing => write!(f, "marketing"),
            TeamRole::Operations => write!(f, "operations"),
        }
    }
}

impl From<&str> for TeamRole {
    fn from(s: &str) -> Self {
        match s {
            "co_lead" => TeamRole::CoLead,
            "vice_lead" => TeamRole::ViceLead,
            "technology" => TeamRole::Technology,
            "advisor" => TeamRole::Advisor,
            "academics" => TeamRole::Academics,
            "marketing" => TeamRole::Marketing,
            _ => TeamRole::Operations,
        }
    }
}

/// Team member - one roster entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TeamMember {
    pub id: Uuid,
    /// Linked member account, when the person has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub name: String,
    pub role: TeamRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// Custom ordering within a role
    #[serde(default)]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sort roster entries by role rank, then custom order, then name
pub fn sort_roster(members: &mut [TeamMember]) {
    members.sort_by(|a, b| {
        (a.role.rank(), a.display_order, a.name.as_str())
            .cmp(&(b.role.rank(), b.display_order, b.name.as_str()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, role: TeamRole, display_order: i32) -> TeamMember {
        let now = Utc::now();
        TeamMember {
            id: Uuid::now_v7(),
            user_id: None,
            name: name.to_string(),
            role,
            bio: None,
            image_url: None,
            linkedin: None,
            github: None,
            display_order,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn roster_sorts_by_role_then_order_then_name() {
        let mut members = vec![
            member("Zoe", TeamRole::Operations, 0),
            member("Amir", TeamRole::CoLead, 1),
            member("Bea", TeamRole::CoLead, 0),
            member("Cal", TeamRole::Technology, 0),
        ];
        sort_roster(&mut members);
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Bea", "Amir", "Cal", "Zoe"]);
    }
}

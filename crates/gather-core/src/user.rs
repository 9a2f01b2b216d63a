// User domain types
//
// User rows mirror subjects issued by the external identity service; the id
// is the identity subject. Roles are recorded here and enforced on this API;
// claim issuance happens in the identity service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Member,
    Admin,
    Superadmin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Member => write!(f, "member"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::Superadmin => write!(f, "superadmin"),
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "admin" => UserRole::Admin,
            "superadmin" => UserRole::Superadmin,
            _ => UserRole::Member,
        }
    }
}

impl UserRole {
    /// Admins and superadmins manage content (events, positions, projects,
    /// team roster, check-in)
    pub fn can_manage_content(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Superadmin)
    }

    /// Only superadmins grant or revoke roles
    pub fn can_grant_roles(self) -> bool {
        self == UserRole::Superadmin
    }
}

/// User - a member profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct User {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_permissions() {
        assert!(!UserRole::Member.can_manage_content());
        assert!(UserRole::Admin.can_manage_content());
        assert!(!UserRole::Admin.can_grant_roles());
        assert!(UserRole::Superadmin.can_manage_content());
        assert!(UserRole::Superadmin.can_grant_roles());
    }
}

// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: Default to "none" mode for local development

/// Authentication mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No authentication required (local development); the caller is a
    /// superadmin and may impersonate via the x-user-id header
    #[default]
    None,
    /// Verify bearer tokens issued by the external identity service
    Jwt,
}

impl AuthMode {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "jwt" => AuthMode::Jwt,
            _ => AuthMode::None,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Authentication mode
    pub mode: AuthMode,
    /// HS256 secret shared with the identity service (required in jwt mode)
    pub jwt_secret: String,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mode = std::env::var("AUTH_MODE")
            .map(|s| AuthMode::from_str(&s))
            .unwrap_or_default();
        let jwt_secret = std::env::var("AUTH_JWT_SECRET").unwrap_or_default();

        if mode == AuthMode::Jwt && jwt_secret.is_empty() {
            tracing::warn!("AUTH_MODE=jwt but AUTH_JWT_SECRET is not set; all requests will be rejected");
        }

        Self { mode, jwt_secret }
    }
}

// Authentication module
// Decision: This API only verifies tokens; issuance lives in the external
// identity service. Claims carry the subject and a role claim, mirroring
// the identity service's custom claims.

pub mod config;

pub use config::{AuthConfig, AuthMode};

use axum::http::{header, HeaderMap, StatusCode};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use gather_core::UserRole;

/// Token claims issued by the identity service
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    /// Role claim; absent means member
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

/// The verified caller of a request
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Identity {
    /// Whether the caller may act on `user_id`'s behalf (self, or content
    /// managers acting for others)
    pub fn may_act_for(&self, user_id: Uuid) -> bool {
        self.user_id == user_id || self.role.can_manage_content()
    }
}

/// Resolve the caller's identity from request headers.
///
/// In `none` mode every caller is a superadmin; the `x-user-id` header picks
/// the acting subject for local development. In `jwt` mode the bearer token
/// is verified with the shared HS256 secret.
pub fn identify(config: &AuthConfig, headers: &HeaderMap) -> Result<Identity, StatusCode> {
    match config.mode {
        AuthMode::None => {
            let user_id = headers
                .get("x-user-id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| Uuid::parse_str(s).ok())
                .unwrap_or(Uuid::nil());
            Ok(Identity {
                user_id,
                role: UserRole::Superadmin,
            })
        }
        AuthMode::Jwt => {
            let token = bearer_token(headers).ok_or(StatusCode::UNAUTHORIZED)?;
            let data = decode::<Claims>(
                token,
                &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
                &Validation::default(),
            )
            .map_err(|e| {
                tracing::debug!("token rejected: {}", e);
                StatusCode::UNAUTHORIZED
            })?;

            let role = data
                .claims
                .role
                .as_deref()
                .map(UserRole::from)
                .unwrap_or(UserRole::Member);
            Ok(Identity {
                user_id: data.claims.sub,
                role,
            })
        }
    }
}

/// Resolve the caller and require content-management rights
pub fn identify_admin(config: &AuthConfig, headers: &HeaderMap) -> Result<Identity, StatusCode> {
    let identity = identify(config, headers)?;
    if !identity.role.can_manage_content() {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(identity)
}

/// Resolve the caller and require role-granting rights
pub fn identify_superadmin(
    config: &AuthConfig,
    headers: &HeaderMap,
) -> Result<Identity, StatusCode> {
    let identity = identify(config, headers)?;
    if !identity.role.can_grant_roles() {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(identity)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn jwt_config(secret: &str) -> AuthConfig {
        AuthConfig {
            mode: AuthMode::Jwt,
            jwt_secret: secret.to_string(),
        }
    }

    fn token_for(secret: &str, sub: Uuid, role: Option<&str>) -> String {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
        let claims = json!({ "sub": sub, "role": role, "exp": exp });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn headers_with_bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        headers
    }

    #[test]
    fn none_mode_grants_superadmin() {
        let config = AuthConfig::default();
        let identity = identify(&config, &HeaderMap::new()).unwrap();
        assert_eq!(identity.role, UserRole::Superadmin);
        assert_eq!(identity.user_id, Uuid::nil());

        let mut headers = HeaderMap::new();
        let user = Uuid::now_v7();
        headers.insert("x-user-id", user.to_string().parse().unwrap());
        assert_eq!(identify(&config, &headers).unwrap().user_id, user);
    }

    #[test]
    fn jwt_mode_verifies_and_reads_role_claim() {
        let config = jwt_config("sekrit");
        let user = Uuid::now_v7();

        let headers = headers_with_bearer(&token_for("sekrit", user, Some("admin")));
        let identity = identify(&config, &headers).unwrap();
        assert_eq!(identity.user_id, user);
        assert_eq!(identity.role, UserRole::Admin);

        // Missing role claim falls back to member
        let headers = headers_with_bearer(&token_for("sekrit", user, None));
        assert_eq!(identify(&config, &headers).unwrap().role, UserRole::Member);
    }

    #[test]
    fn jwt_mode_rejects_bad_tokens() {
        let config = jwt_config("sekrit");

        assert_eq!(
            identify(&config, &HeaderMap::new()).unwrap_err(),
            StatusCode::UNAUTHORIZED
        );

        let headers = headers_with_bearer(&token_for("wrong-secret", Uuid::now_v7(), None));
        assert_eq!(
            identify(&config, &headers).unwrap_err(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn admin_guard_rejects_members() {
        let config = jwt_config("sekrit");
        let member = headers_with_bearer(&token_for("sekrit", Uuid::now_v7(), None));
        assert_eq!(
            identify_admin(&config, &member).unwrap_err(),
            StatusCode::FORBIDDEN
        );

        let admin = headers_with_bearer(&token_for("sekrit", Uuid::now_v7(), Some("admin")));
        assert!(identify_admin(&config, &admin).is_ok());
        // Admins still cannot grant roles
        assert_eq!(
            identify_superadmin(&config, &admin).unwrap_err(),
            StatusCode::FORBIDDEN
        );

        let superadmin =
            headers_with_bearer(&token_for("sekrit", Uuid::now_v7(), Some("superadmin")));
        assert!(identify_superadmin(&config, &superadmin).is_ok());
    }
}

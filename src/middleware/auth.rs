use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::state::AppState;
use crate::utils::jwt::verify_token;
use praxeum_core::AppError;
use praxeum_models::auth::Claims;
use praxeum_models::enums::UserRole;
use praxeum_models::ids::UserId;

/// Extractor that validates the bearer JWT and exposes the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller's ID as a typed [`UserId`].
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn is_staff(&self) -> bool {
        self.0.role == UserRole::Staff
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Creates a role-gated extractor newtype. Route handlers take the generated
/// type as an argument and get compile-time-visible role requirements.
#[macro_export]
macro_rules! require_role {
    ($name:ident, $role:ident) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = praxeum_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                        $crate::state::AppState,
                    >>::from_request_parts(parts, state)
                    .await?;

                if auth_user.role() != praxeum_models::enums::UserRole::$role {
                    return Err(praxeum_core::AppError::forbidden(anyhow::anyhow!(
                        "Access denied. Requires the {} role",
                        praxeum_models::enums::UserRole::$role.as_str()
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_role!(RequireStaff, Staff);
require_role!(RequireTeacher, Teacher);

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_role(role: UserRole) -> Claims {
        Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id_parses_sub() {
        let claims = claims_with_role(UserRole::Teacher);
        let expected: UserId = claims.sub.parse().unwrap();
        let auth_user = AuthUser(claims);
        assert_eq!(auth_user.user_id().unwrap(), expected);
    }

    #[test]
    fn test_user_id_rejects_malformed_sub() {
        let mut claims = claims_with_role(UserRole::Teacher);
        claims.sub = "not-a-uuid".to_string();
        let auth_user = AuthUser(claims);
        assert!(auth_user.user_id().is_err());
    }

    #[test]
    fn test_is_staff() {
        assert!(AuthUser(claims_with_role(UserRole::Staff)).is_staff());
        assert!(!AuthUser(claims_with_role(UserRole::Teacher)).is_staff());
    }
}

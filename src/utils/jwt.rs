use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::jwt::JwtConfig;
use praxeum_core::AppError;
use praxeum_models::auth::Claims;
use praxeum_models::users::User;

/// Creates an HS256 access token for a user.
///
/// Token issuance is normally the identity service's job; this exists for
/// operational tooling and tests.
pub fn create_access_token(user: &User, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid or expired token")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxeum_models::enums::UserRole;
    use praxeum_models::ids::UserId;

    fn test_user(role: UserRole) -> User {
        User {
            id: UserId::new(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "test@example.com".to_string(),
            role,
            branch_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_and_verify_roundtrip() {
        let config = JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        };
        let user = test_user(UserRole::Teacher);

        let token = create_access_token(&user, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Teacher);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let config = JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        };
        let other = JwtConfig {
            secret: "other-secret".to_string(),
            access_token_expiry: 3600,
        };
        let token = create_access_token(&test_user(UserRole::Staff), &config).unwrap();

        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let config = JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        };
        assert!(verify_token("not-a-token", &config).is_err());
    }
}

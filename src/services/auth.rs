use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::Role;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: usize,
}

/// Caller identity decoded once at the handler boundary and passed
/// explicitly into operations instead of living in ambient request state.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub id: String,
    pub role: Role,
    pub name: String,
    pub permissions: Vec<String>,
}

impl AuthContext {
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Crypto(format!("password hashing failed: {e}")))
}

pub fn verify_password(hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

pub fn issue_token(
    config: &AppConfig,
    id: &str,
    role: Role,
    name: &str,
    permissions: Vec<String>,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: id.to_string(),
        role: role.as_str().to_string(),
        name: name.to_string(),
        permissions,
        exp: (Utc::now() + Duration::hours(config.token_ttl_hours)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Crypto(format!("token encoding failed: {e}")))
}

/// Decodes the bearer token into an [`AuthContext`]. Missing, malformed, or
/// expired tokens all surface as `Unauthorized`.
pub fn auth_context(headers: &HeaderMap, config: &AppConfig) -> Result<AuthContext, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let role = Role::parse(&data.claims.role).ok_or(AppError::Unauthorized)?;

    Ok(AuthContext {
        id: data.claims.sub,
        role,
        name: data.claims.name,
        permissions: data.claims.permissions,
    })
}

// ── Registration input checks ──

pub fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), AppError> {
    if !(10..=15).contains(&phone.len()) {
        return Err(AppError::Validation(
            "Phone must be 10-15 digits".to_string(),
        ));
    }
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Phone must contain only numbers".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            port: 5000,
            database_url: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
            cors_origin: String::new(),
            mail_api_key: String::new(),
            mail_domain: String::new(),
            mail_from: String::new(),
        }
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", format!("Bearer {token}").parse().unwrap());
        headers
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("secret123").unwrap();
        assert_ne!(hash, "secret123");
        assert!(verify_password(&hash, "secret123"));
        assert!(!verify_password(&hash, "secret124"));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("not-a-hash", "whatever"));
    }

    #[test]
    fn test_token_round_trip() {
        let config = test_config();
        let token = issue_token(&config, "u-1", Role::User, "Alice", vec![]).unwrap();

        let ctx = auth_context(&bearer_headers(&token), &config).unwrap();
        assert_eq!(ctx.id, "u-1");
        assert_eq!(ctx.role, Role::User);
        assert_eq!(ctx.name, "Alice");
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let config = test_config();
        let token = issue_token(&config, "u-1", Role::User, "Alice", vec![]).unwrap();

        let mut other = test_config();
        other.jwt_secret = "other-secret".to_string();
        assert!(matches!(
            auth_context(&bearer_headers(&token), &other),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_missing_and_malformed_header() {
        let config = test_config();
        assert!(matches!(
            auth_context(&HeaderMap::new(), &config),
            Err(AppError::Unauthorized)
        ));

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Token abc".parse().unwrap());
        assert!(matches!(
            auth_context(&headers, &config),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_require_role() {
        let ctx = AuthContext {
            id: "a-1".to_string(),
            role: Role::Admin,
            name: "Root".to_string(),
            permissions: vec!["manage_users".to_string()],
        };
        assert!(ctx.require_role(&[Role::Admin]).is_ok());
        assert!(ctx.require_role(&[Role::User, Role::Photographer]).is_err());
        assert!(ctx.has_permission("manage_users"));
        assert!(!ctx.has_permission("manage_payments"));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@nodot").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("98765abc10").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }
}

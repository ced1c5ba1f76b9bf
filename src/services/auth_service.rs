use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{AuthResponse, Claims, LoginRequest, RegisterRequest, User};

const TOKEN_TTL_HOURS: i64 = 24;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 15;

fn starting_cash() -> BigDecimal {
    "10000.00".parse::<BigDecimal>().unwrap()
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token encoding failed: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Password complexity rules: 6..=15 characters, at least one digit and
/// at least one capital letter.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::Validation("no password entered".to_string()));
    }
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "the password must be at least 6 characters long".to_string(),
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::Validation(
            "the password is too long (max 15 characters)".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "the password must contain at least one number".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(AppError::Validation(
            "the password must contain at least one capital letter".to_string(),
        ));
    }
    Ok(())
}

pub async fn register(
    pool: &PgPool,
    keys: &JwtKeys,
    input: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    if db::user_queries::username_exists(pool, &input.username).await? {
        return Err(AppError::Validation(
            "a user with this username already exists".to_string(),
        ));
    }
    if input.username.trim().is_empty() {
        return Err(AppError::Validation("no username entered".to_string()));
    }
    validate_password(&input.password)?;
    if input.password != input.confirmation {
        return Err(AppError::Validation("passwords don't match".to_string()));
    }

    let password_hash = hash_password(&input.password)?;
    let user = User::new(input.username, password_hash, starting_cash());
    let user = db::user_queries::insert(pool, user).await?;
    info!("Registered user {} ({})", user.username, user.id);

    let token = keys.issue(user.id)?;
    Ok(AuthResponse { token, user })
}

pub async fn login(
    pool: &PgPool,
    keys: &JwtKeys,
    input: LoginRequest,
) -> Result<AuthResponse, AppError> {
    if input.username.is_empty() {
        return Err(AppError::Validation("must provide username".to_string()));
    }
    if input.password.is_empty() {
        return Err(AppError::Validation("must provide password".to_string()));
    }

    let user = db::user_queries::fetch_by_username(pool, &input.username).await?;
    let Some(user) = user else {
        return Err(AppError::Unauthorized);
    };
    if !verify_password(&input.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    info!("User {} logged in", user.username);
    let token = keys.issue(user.id)?;
    Ok(AuthResponse { token, user })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_without_uppercase_rejected() {
        let err = validate_password("abc123").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("capital letter")));
    }

    #[test]
    fn password_with_uppercase_and_digit_accepted() {
        assert!(validate_password("Abc123").is_ok());
    }

    #[test]
    fn password_without_digit_rejected() {
        let err = validate_password("Abcdef").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("number")));
    }

    #[test]
    fn short_and_long_passwords_rejected() {
        assert!(validate_password("Ab1").is_err());
        assert!(validate_password("Abcdefgh12345678").is_err());
    }

    #[test]
    fn empty_password_rejected_first() {
        let err = validate_password("").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("no password")));
    }

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("Abc123").unwrap();
        assert!(verify_password("Abc123", &hash));
        assert!(!verify_password("Abc124", &hash));
    }

    #[test]
    fn verify_with_garbage_hash_is_false() {
        assert!(!verify_password("Abc123", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trip_preserves_subject() {
        let keys = JwtKeys::from_secret("test-secret");
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_rejected() {
        let keys = JwtKeys::from_secret("test-secret");
        let other = JwtKeys::from_secret("other-secret");
        let token = keys.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(other.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn starting_cash_is_ten_thousand() {
        assert_eq!(starting_cash(), "10000.00".parse::<BigDecimal>().unwrap());
    }
}

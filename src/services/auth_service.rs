//! # سرویس احراز هویت (Authentication Service)
//!
//! مدیریت کاربران، ورود، ثبت‌نام و JWT
//!
//! ## مفاهیم Rust:
//! - Password Hashing: هش کردن امن رمز عبور (Argon2)
//! - JWT: توکن‌های احراز هویت (HS256)

use std::sync::Arc;
use jsonwebtoken::{encode, decode, Header, Algorithm, Validation, EncodingKey, DecodingKey};
use tracing::{info, warn, instrument};
use validator::Validate;

use crate::{
    config::Config,
    database::UserRepository,
    error::{AppError, Result, ResultExt},
    models::{Claims, CreateUser, LoginRequest, LoginResponse, RegisterRequest, User},
    utils,
};

use super::{with_deadline, Service};

// =====================================
// Auth Service
// =====================================
/// سرویس احراز هویت
///
/// # مسئولیت‌ها:
/// - ثبت‌نام کاربر
/// - ورود و صدور توکن
/// - اعتبارسنجی توکن
#[derive(Debug, Clone)]
pub struct AuthService {
    repo: UserRepository,
    config: Arc<Config>,
}

impl Service for AuthService {}

impl AuthService {
    /// ساخت سرویس جدید
    #[must_use]
    pub fn new(repo: UserRepository, config: Arc<Config>) -> Self {
        Self { repo, config }
    }

    /// ثبت‌نام کاربر جدید
    ///
    /// # مفاهیم:
    /// - Password hashing با Argon2
    /// - نام کاربری تکراری رو constraint دیتابیس رد میکنه
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<String> {
        // Step 1: اعتبارسنجی
        request.validate()?;

        if !utils::is_valid_username(&request.username) {
            return Err(AppError::Validation(
                "username may contain letters, digits, '_', '-' and '.' only".to_string()
            ));
        }

        // Step 2: هش کردن رمز عبور
        let create_user = CreateUser {
            id: utils::new_id(),
            username: request.username,
            password_hash: utils::hash_password(&request.password)?,
            role: request.role,
        };

        // Step 3: ذخیره در دیتابیس
        let id = with_deadline("register_user", self.repo.create(&create_user)).await?;

        info!(user_id = %id, role = %create_user.role, "New user registered");
        Ok(id)
    }

    /// بررسی نام کاربری و رمز
    ///
    /// نبودن کاربر و رمز اشتباه هر دو `invalid credentials` میدن
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let user = with_deadline("find_user", self.repo.find_by_username(username))
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        if !utils::verify_password(password, &user.password_hash) {
            warn!(username = %utils::mask_string(username, 3), "Failed login attempt");
            return Err(AppError::invalid_credentials());
        }

        Ok(user)
    }

    /// ورود کاربر و صدور توکن
    ///
    /// # Errors
    /// - `Unauthorized("invalid credentials")` برای هر شکست در بررسی هویت
    /// - `Internal("failed to generate token")` اگه امضای توکن fail بشه
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        request.validate()?;

        // هر شکستی در بررسی هویت (حتی خطای دیتابیس) همون 401 میشه
        let user = self
            .authenticate(&request.username, &request.password)
            .await
            .map_err(|e| {
                if !matches!(e, AppError::Unauthorized(_)) {
                    warn!(error = %e, "Credential lookup failed");
                }
                AppError::invalid_credentials()
            })?;

        let (token, claims) = self
            .issue_token(&user.username, &user.role)
            .or_fail("failed to generate token")?;

        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// صدور توکن JWT
    ///
    /// # مفاهیم:
    /// - JWT encoding با HS256 (`Header::default`)
    /// - کلید امضا = `jwt_secret`
    pub fn issue_token(&self, username: &str, role: &str) -> Result<(String, Claims)> {
        let claims = Claims::new(username, role, self.config.jwt_expiration_hours)?;

        let encoding_key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let token = encode(&Header::default(), &claims, &encoding_key)?;

        Ok((token, claims))
    }

    /// اعتبارسنجی توکن JWT
    ///
    /// # مفاهیم:
    /// - JWT verification (امضا و انقضا)
    /// - Claims extraction
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| {
                warn!(error = %e, "Token verification failed");
                AppError::Unauthorized("invalid token".to_string())
            })?;

        if token_data.claims.is_expired() {
            return Err(AppError::Unauthorized("token expired".to_string()));
        }

        Ok(token_data.claims)
    }
}

// =====================================
// Token Utilities
// =====================================
/// استخراج توکن از header Authorization
///
/// # Format
/// `Authorization: Bearer <token>`
#[must_use]
pub fn extract_token_from_header(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::database::Database;

    async fn service() -> AuthService {
        let db = Database::in_memory().await.unwrap();
        let config = ConfigBuilder::new().jwt_secret("unit-test-secret").build();
        AuthService::new(UserRepository::new(db), Arc::new(config))
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token_from_header("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_token_from_header("Basic abc123"), None);
        assert_eq!(extract_token_from_header("abc123"), None);
        assert_eq!(extract_token_from_header("Bearer "), None);
    }

    #[tokio::test]
    async fn test_issue_and_verify_token() {
        let auth = service().await;
        let (token, issued) = auth.issue_token("chef", "admin").unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims, issued);
        assert_eq!(claims.sub, "chef");
        assert!(claims.is_admin());
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let auth = service().await;
        let other = AuthService::new(
            auth.repo.clone(),
            Arc::new(ConfigBuilder::new().jwt_secret("another-secret").build()),
        );

        let (token, _) = other.issue_token("chef", "admin").unwrap();
        assert!(matches!(auth.verify_token(&token), Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_username() {
        let auth = service().await;
        let request = RegisterRequest {
            username: "bad name".to_string(),
            password: "secret-pass".to_string(),
            role: "staff".to_string(),
        };

        assert!(matches!(auth.register(request).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_returns_token_for_stored_role() {
        let auth = service().await;
        auth.register(RegisterRequest {
            username: "waiter".to_string(),
            password: "secret-pass".to_string(),
            role: "staff".to_string(),
        })
        .await
        .unwrap();

        let response = auth
            .login(LoginRequest {
                username: "waiter".to_string(),
                password: "secret-pass".to_string(),
            })
            .await
            .unwrap();

        let claims = auth.verify_token(&response.token).unwrap();
        assert_eq!(claims.role, "staff");
        assert_eq!(response.expires_at.timestamp(), claims.exp);
    }

    #[tokio::test]
    async fn test_unbounded_lifetime_fails_login_without_panic() {
        let auth = service().await;
        auth.register(RegisterRequest {
            username: "waiter".to_string(),
            password: "secret-pass".to_string(),
            role: "staff".to_string(),
        })
        .await
        .unwrap();

        let broken = AuthService::new(
            auth.repo.clone(),
            Arc::new(
                ConfigBuilder::new()
                    .jwt_secret("unit-test-secret")
                    .jwt_expiration_hours(u64::MAX)
                    .build(),
            ),
        );

        assert!(matches!(broken.issue_token("waiter", "staff"), Err(AppError::Config(_))));

        let result = broken
            .login(LoginRequest {
                username: "waiter".to_string(),
                password: "secret-pass".to_string(),
            })
            .await;
        match result {
            Err(AppError::Internal(msg)) => assert_eq!(msg, "failed to generate token"),
            other => panic!("unexpected: {:?}", other.map(|r| r.token)),
        }
    }
}

//! # مدل کاربر (User Model)
//!
//! Entity و DTO‌های مربوط به کاربر و توکن

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::utils::ADMIN_ROLE;

// =====================================
// User Entity
// =====================================
/// Entity کاربر
///
/// # مفاهیم:
/// - `FromRow`: تبدیل از ردیف دیتابیس
/// - امنیت: `Serialize` نداره، پس password_hash هرگز به کلاینت ارسال نمیشه
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,

    /// هش رمز عبور در فرمت PHC
    pub password_hash: String,

    /// نقش آزاد؛ `"admin"` دسترسی ادمین میده
    pub role: String,
}

// =====================================
// Create User DTO
// =====================================
/// داده برای ساخت کاربر (داخلی)
///
/// رمز قبل از رسیدن به این struct هش شده
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

// =====================================
// API Request DTOs
// =====================================
/// درخواست ثبت‌نام
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,

    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 50, message = "role must be 1-50 characters"))]
    pub role: String,
}

/// درخواست ورود
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

// =====================================
// API Response DTOs
// =====================================
/// پاسخ ورود موفق
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// =====================================
// JWT Claims
// =====================================
/// محتویات توکن JWT
///
/// # مفاهیم:
/// - `sub`: Subject (نام کاربری)
/// - `role`: نقش کاربر برای تصمیم‌گیری دسترسی
/// - `exp`: Expiration time (Unix timestamp)
/// - `iat`: Issued at (زمان صدور)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// ساخت claims جدید
    ///
    /// # Errors
    /// اگه `expiration_hours` از بازه `TimeDelta` یا تقویم chrono بیرون بزنه
    pub fn new(username: &str, role: &str, expiration_hours: u64) -> Result<Self> {
        let now = Utc::now();
        let exp = i64::try_from(expiration_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Config(format!("token lifetime of {expiration_hours} hours is out of range"))
            })?;

        Ok(Self {
            sub: username.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }

    /// آیا توکن منقضی شده؟
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// آیا صاحب توکن ادمین هست؟
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// زمان انقضا به صورت DateTime
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_expiration() {
        let claims = Claims::new("chef", "admin", 1).unwrap();
        assert!(!claims.is_expired());
        assert!(claims.is_admin());

        let expired = Claims {
            sub: "chef".to_string(),
            role: "staff".to_string(),
            exp: Utc::now().timestamp() - 3600,
            iat: Utc::now().timestamp() - 7200,
        };
        assert!(expired.is_expired());
        assert!(!expired.is_admin());
    }

    #[test]
    fn test_expires_at_matches_exp() {
        let claims = Claims::new("chef", "admin", 2).unwrap();
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        assert!(matches!(
            Claims::new("chef", "admin", 1_000_000_000_000_000),
            Err(AppError::Config(_))
        ));

        // بدون تبدیل به عدد منفی
        assert!(matches!(
            Claims::new("chef", "admin", u64::MAX),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_lifetime_at_config_limit_is_in_the_future() {
        let claims = Claims::new("chef", "admin", crate::config::MAX_JWT_EXPIRATION_HOURS).unwrap();
        assert_eq!(
            claims.exp - claims.iat,
            i64::try_from(crate::config::MAX_JWT_EXPIRATION_HOURS).unwrap() * 3600
        );
        assert!(!claims.is_expired());
    }
}

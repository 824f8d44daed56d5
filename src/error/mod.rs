//! # ماژول مدیریت خطاها (Error Handling)
//!
//! این ماژول سیستم مدیریت خطای برنامه رو تعریف میکنه.
//!
//! ## مفاهیم Rust:
//! - **Custom Error Types**: تعریف نوع خطای سفارشی
//! - **thiserror**: derive macro برای Error trait
//! - **From Trait**: تبدیل خودکار نوع‌ها
//! - **Result Type Alias**: alias برای ساده‌تر شدن کد
//! - **Error Propagation**: انتشار خطا با `?`
//!
//! ## قرارداد پاسخ خطا
//!
//! همه خطاها به شکل `{"error": "<message>"}` به کلاینت میرسن.
//! جزئیات خطاهای دیتابیس هرگز به بیرون leak نمیشن؛ فقط یه پیام ثابت
//! مثل `"failed to create product"` برمیگرده و خطای اصلی لاگ میشه.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

// =====================================
// Result Type Alias
// =====================================
/// نوع Result سفارشی برنامه
///
/// به جای نوشتن `Result<Product, AppError>` میتونیم بنویسیم `Result<Product>`
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// =====================================
// Custom Error Enum
// =====================================
/// خطای اصلی برنامه
///
/// # مفاهیم:
/// - `#[derive(Error)]`: از thiserror برای پیاده‌سازی Error trait
/// - `#[error("...")]`: پیام خطا برای هر نوع (برای لاگ، نه کلاینت)
/// - `#[from]`: تبدیل خودکار از نوع‌های دیگه
#[derive(Debug, Error)]
pub enum AppError {
    // ----------------------------------------
    // خطاهای کاربر (4xx)
    // ----------------------------------------

    /// درخواست نامعتبر - 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// احراز هویت نشده - 401
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// دسترسی ممنوع - 403
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// پیدا نشد - 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// خطای اعتبارسنجی - 400
    ///
    /// جزئیات فیلدها فقط برای لاگ هست؛ کلاینت `"invalid request"` میبینه
    #[error("Validation error: {0}")]
    Validation(String),

    // ----------------------------------------
    // خطاهای سرور (5xx)
    // ----------------------------------------

    /// از مهلت زمانی یک فراخوانی سرویس گذشت - 504
    #[error("Deadline exceeded: {0}")]
    Timeout(String),

    /// خطای داخلی سرور - 500
    ///
    /// پیام این variant مستقیم به کلاینت نشون داده میشه،
    /// پس فقط پیام‌های ثابت مثل `"failed to fetch products"` توش بذارید
    #[error("{0}")]
    Internal(String),

    /// خطای سرور
    #[error("Server error: {0}")]
    Server(String),

    /// خطای تنظیمات
    #[error("Configuration error: {0}")]
    Config(String),

    // ----------------------------------------
    // خطاهای تبدیل شده از کتابخانه‌ها
    // ----------------------------------------

    /// خطای دیتابیس
    /// `#[from]` یعنی sqlx::Error خودکار به این تبدیل میشه
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// خطای migration
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// خطای IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// خطای JWT
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// گرفتن HTTP status code متناسب با خطا
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            // 5xx Server Errors
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_)
            | Self::Server(_)
            | Self::Config(_)
            | Self::Database(_)
            | Self::Migrate(_)
            | Self::Io(_)
            | Self::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// آیا این یه خطای سرور هست؟
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// پیامی که کلاینت میبینه
    ///
    /// خطاهای کتابخانه‌ای (دیتابیس، IO، JWT) فقط یه پیام عمومی دارن
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Validation(_) => "invalid request".to_string(),
            Self::Timeout(_) => "request timed out".to_string(),
            _ => "internal server error".to_string(),
        }
    }

    /// خطای یکسان برای همه شکست‌های ورود
    ///
    /// نبودن کاربر و اشتباه بودن رمز یک پیام دارن تا username enumeration ممکن نباشه
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::Unauthorized("invalid credentials".to_string())
    }
}

// =====================================
// Error Response DTO
// =====================================
/// ساختار پاسخ خطا در API
///
/// ```json
/// { "error": "invalid product ID" }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// پیام خطا
    pub error: String,
}

impl ErrorResponse {
    /// ساخت پاسخ خطای جدید
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// =====================================
// IntoResponse Implementation
// =====================================
/// تبدیل AppError به Response HTTP
///
/// # مفاهیم:
/// - `IntoResponse`: trait خاص axum برای تبدیل به response
/// - این باعث میشه بتونیم AppError رو مستقیم از handler برگردونیم
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // لاگ کردن خطاهای سرور
        if self.is_server_error() {
            error!(error = %self, "Server error occurred");
        }

        let status = self.status_code();
        let body = ErrorResponse::new(self.public_message());

        (status, Json(body)).into_response()
    }
}

// =====================================
// From Implementations
// =====================================
// این‌ها برای تبدیل خودکار خطاهای دیگه به AppError هستن

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Internal(s)
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        AppError::Internal(s.to_string())
    }
}

// تبدیل validator error
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        debug!(error = %err, "Request failed validation");
        AppError::Validation(err.to_string())
    }
}

// تبدیل خطای crate تنظیمات
impl From<::config::ConfigError> for AppError {
    fn from(err: ::config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

// تبدیل خطای argon2
impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::Server(format!("password hashing failed: {}", err))
    }
}

// =====================================
// Result Extensions
// =====================================
/// Extension trait برای Result
///
/// # مفاهیم:
/// - Extension Trait: اضافه کردن متد به نوع‌های موجود
/// - Generic: کار با هر نوع T و E
pub trait ResultExt<T, E> {
    /// جایگزین کردن خطای سرور با یک پیام ثابت
    ///
    /// خطای اصلی لاگ میشه و کلاینت فقط `message` رو میبینه.
    /// خطاهای 4xx و timeout دست نخورده عبور میکنن.
    ///
    /// ```rust,ignore
    /// state.product_service.list().await.or_fail("failed to fetch products")?;
    /// ```
    fn or_fail(self, message: &str) -> Result<T>
    where
        E: Into<AppError>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E> {
    fn or_fail(self, message: &str) -> Result<T>
    where
        E: Into<AppError>,
    {
        self.map_err(|e| {
            let err: AppError = e.into();
            match err {
                AppError::Timeout(_) => err,
                ref e if e.is_server_error() => {
                    error!(error = %e, "{}", message);
                    AppError::Internal(message.to_string())
                }
                _ => err,
            }
        })
    }
}

// =====================================
// Option Extensions
// =====================================
/// Extension trait برای Option
pub trait OptionExt<T> {
    /// تبدیل None به AppError::NotFound
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(message.into()))
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("test".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );

        assert_eq!(
            AppError::Validation("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );

        assert_eq!(
            AppError::Timeout("list products".to_string()).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );

        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_details_are_not_public() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn test_or_fail_replaces_server_errors() {
        let res: Result<()> = Err(AppError::Database(sqlx::Error::PoolTimedOut));
        let mapped = res.or_fail("failed to fetch products");

        match mapped {
            Err(AppError::Internal(msg)) => assert_eq!(msg, "failed to fetch products"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_or_fail_keeps_client_errors() {
        let res: Result<()> = Err(AppError::NotFound("product not found".to_string()));
        assert!(matches!(
            res.or_fail("failed to get product"),
            Err(AppError::NotFound(_))
        ));

        let res: Result<()> = Err(AppError::Timeout("x".to_string()));
        assert!(matches!(
            res.or_fail("failed to get product"),
            Err(AppError::Timeout(_))
        ));
    }

    #[test]
    fn test_option_extension() {
        let some_value: Option<i32> = Some(42);
        let none_value: Option<i32> = None;

        assert!(some_value.ok_or_not_found("not found").is_ok());
        assert!(none_value.ok_or_not_found("not found").is_err());
    }

    #[test]
    fn test_validation_details_stay_private() {
        let err = AppError::Validation("password: password must be 6-128 characters".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "invalid request");
    }
}

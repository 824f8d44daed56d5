//! # Custom Extractors
//!
//! Extractor‌های سفارشی برای استخراج داده از request
//!
//! ## مفاهیم Rust + Axum:
//! - **Extractors**: نوع‌هایی که از request داده استخراج میکنن
//! - **FromRequestParts**: trait برای extractor‌هایی که body لازم ندارن
//! - **FromRequest**: برای extractor‌هایی که body رو مصرف میکنن
//! - **Rejection**: نوع خطا برای extractors
//!
//! ## چطور کار میکنه؟
//! وقتی یه extractor به عنوان پارامتر handler تعریف میشه،
//! axum قبل از اجرای handler، extractor رو اجرا میکنه.
//! extractor‌های احراز هویت قبل از body اجرا میشن، پس 401/403 زودتر از 400 برمیگرده.

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header, request::Parts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use crate::{
    error::AppError,
    models::Claims,
    services::{extract_token_from_header, AppState},
};

// =====================================
// Bearer Token Extractor
// =====================================
/// استخراج توکن از header Authorization
///
/// # استفاده در handler:
/// ```rust,ignore
/// async fn handler(BearerToken(token): BearerToken) -> ... {
///     // token حالا یه String هست
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing token".to_string()))?;

        let token = extract_token_from_header(auth_header)
            .ok_or_else(|| AppError::Unauthorized("invalid token".to_string()))?;

        Ok(BearerToken(token.to_string()))
    }
}

// =====================================
// Auth User Extractor
// =====================================
/// کاربر احراز هویت شده (هر نقشی)
///
/// # مفاهیم:
/// - این extractor توکن رو verify میکنه
/// - اگه توکن نباشه یا نامعتبر باشه، 401 برمیگرده
///
/// # استفاده:
/// ```rust,ignore
/// async fn handler(AuthUser(claims): AuthUser) -> ... {
///     // claims.sub نام کاربری هست
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let claims = state.auth_service.verify_token(&token)?;

        Ok(AuthUser(claims))
    }
}

// =====================================
// Admin User Extractor
// =====================================
/// کاربر با نقش `admin`
///
/// توکن معتبر بدون نقش ادمین 403 میگیره
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        if !claims.is_admin() {
            debug!(username = %claims.sub, role = %claims.role, "Admin route refused");
            return Err(AppError::Forbidden("admin access required".to_string()));
        }

        Ok(AdminUser(claims))
    }
}

// =====================================
// JSON with Validation
// =====================================
/// استخراج JSON با اعتبارسنجی خودکار
///
/// # مفاهیم:
/// - Validation در سطح extractor
/// - JSON خراب همیشه `400 invalid request` میده و جزئیات parser لو نمیره
///
/// # استفاده:
/// ```rust,ignore
/// async fn handler(ValidatedJson(data): ValidatedJson<CreateProductRequest>) -> ... {
///     // data حتما valid هست
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| {
                debug!(error = %e, "Rejected request body");
                AppError::BadRequest("invalid request".to_string())
            })?;

        data.validate()?;

        Ok(ValidatedJson(data))
    }
}

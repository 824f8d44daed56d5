//! # Auth Handlers
//!
//! Handler‌های مربوط به احراز هویت

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    api::extractors::ValidatedJson,
    error::{Result, ResultExt},
    models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
    services::AppState,
};

// =====================================
// Register
// =====================================
/// ثبت‌نام کاربر جدید
///
/// # مفاهیم:
/// - Password hashing در سرویس انجام میشه
/// - نام کاربری تکراری خطای عمومی 500 میده
///
/// # Endpoint
/// `POST /register`
///
/// # Request Body
/// ```json
/// {
///   "username": "chef",
///   "password": "securepassword",
///   "role": "admin"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse> {
    state
        .auth_service
        .register(request)
        .await
        .or_fail("failed to register user")?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("user registered")),
    ))
}

// =====================================
// Login
// =====================================
/// ورود کاربر
///
/// # Endpoint
/// `POST /login`
///
/// # Response
/// ```json
/// {
///   "token": "eyJ...",
///   "expires_at": "2024-..."
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let response = state.auth_service.login(request).await?;

    Ok(Json(response))
}

//! # Category & Image Handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    api::extractors::{AdminUser, ValidatedJson},
    error::{Result, ResultExt},
    models::{CreateCategoryRequest, CreateImageRequest, IdResponse},
    services::AppState,
};

/// ساخت دسته‌بندی
///
/// # Endpoint
/// `POST /categories` (فقط ادمین)
///
/// ```json
/// { "name": "Soups" }
/// ```
pub async fn create_category(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    let id = state
        .catalog_service
        .create_category(request)
        .await
        .or_fail("failed to create category")?;

    Ok((StatusCode::CREATED, Json(IdResponse::new(id))))
}

/// ثبت تصویر
///
/// # Endpoint
/// `POST /images` (فقط ادمین)
///
/// ```json
/// { "url": "https://cdn.example.com/soup.png" }
/// ```
pub async fn create_image(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    ValidatedJson(request): ValidatedJson<CreateImageRequest>,
) -> Result<impl IntoResponse> {
    let id = state
        .catalog_service
        .create_image(request)
        .await
        .or_fail("failed to create image")?;

    Ok((StatusCode::CREATED, Json(IdResponse::new(id))))
}

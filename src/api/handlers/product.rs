//! # Product Handlers
//!
//! Handler‌های مربوط به منوی محصولات
//!
//! ## مفاهیم Axum:
//! - `State`: دسترسی به AppState
//! - `Path`: استخراج پارامتر از URL
//! - `Query`: استخراج query string
//! - `ValidatedJson`: JSON با اعتبارسنجی
//! - `AuthUser` / `AdminUser`: احراز هویت و مجوز

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    api::extractors::{AdminUser, AuthUser, ValidatedJson},
    error::{Result, ResultExt},
    models::{
        CreateProductRequest, IdResponse, MessageResponse, Product, SortParams,
        UpdateProductRequest,
    },
    services::{AppState, ProductService},
    utils::parse_id,
};

const INVALID_PRODUCT_ID: &str = "invalid product ID";

// =====================================
// Create Product
// =====================================
/// ساخت محصول جدید
///
/// # Endpoint
/// `POST /products` (نیاز به توکن)
///
/// # Request Body
/// ```json
/// {
///   "name": "Tomato soup",
///   "description": "with basil",
///   "price": 450,
///   "category_id": "…",
///   "image_id": "…"
/// }
/// ```
///
/// # Response
/// `201 Created` با `{ "id": "…" }`
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    let id = state
        .product_service
        .create(request)
        .await
        .or_fail("failed to create product")?;

    info!(product_id = %id, username = %claims.sub, "Product created via API");

    Ok((StatusCode::CREATED, Json(IdResponse::new(id))))
}

// =====================================
// Read
// =====================================
/// لیست همه محصولات
///
/// # Endpoint
/// `GET /products`
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .product_service
        .list()
        .await
        .or_fail("failed to fetch products")?;

    Ok(Json(products))
}

/// گرفتن یک محصول
///
/// # Endpoint
/// `GET /products/:id`
///
/// # Errors
/// - 400 `invalid product ID`
/// - 404 `product not found`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_id(&id, INVALID_PRODUCT_ID)?;

    let product = state
        .product_service
        .get(id)
        .await
        .or_fail("failed to fetch product")?;

    Ok(Json(product))
}

/// محصولات یک دسته
///
/// # Endpoint
/// `GET /products/category/:category_name`
pub async fn list_products_by_category(
    State(state): State<AppState>,
    Path(category_name): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .product_service
        .list_by_category(&category_name)
        .await
        .or_fail("failed to fetch products")?;

    Ok(Json(products))
}

/// محصولات مرتب شده بر اساس قیمت
///
/// # Endpoint
/// `GET /products/sorted?order=asc|desc` (پیش‌فرض `asc`)
pub async fn list_products_sorted(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<Product>>> {
    let order = ProductService::parse_order(params.order.as_deref())?;

    let products = state
        .product_service
        .list_sorted_by_price(order)
        .await
        .or_fail("failed to fetch products")?;

    Ok(Json(products))
}

// =====================================
// Update / Delete (Admin)
// =====================================
/// بروزرسانی جزئی محصول
///
/// # Endpoint
/// `PUT /products/:id` (فقط ادمین)
///
/// فیلدهایی که در body نیستن دست نمیخورن
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(changes): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, INVALID_PRODUCT_ID)?;

    state
        .product_service
        .update(id, changes)
        .await
        .or_fail("failed to update product")?;

    Ok(Json(MessageResponse::new("product updated")))
}

/// حذف محصول
///
/// # Endpoint
/// `DELETE /products/:id` (فقط ادمین)
///
/// حذف شناسه‌ای که وجود نداره هم 200 میده
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, INVALID_PRODUCT_ID)?;

    state
        .product_service
        .delete(id)
        .await
        .or_fail("failed to delete product")?;

    Ok(Json(MessageResponse::new("product deleted")))
}

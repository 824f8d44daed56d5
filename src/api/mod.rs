//! # لایه API
//!
//! این ماژول HTTP handlers و routing رو مدیریت میکنه.
//!
//! ## مفاهیم Rust + Axum:
//! - **Router**: تعریف مسیرها
//! - **Handler Functions**: پردازش request‌ها
//! - **Extractors**: استخراج داده از request
//! - **State**: اشتراک state بین handlers
//! - **Middleware**: پردازش قبل/بعد از handler
//!
//! ## ساختار URL‌ها:
//! - `GET /products` - همه محصولات
//! - `GET /products/:id` - یک محصول
//! - `GET /products/category/:category_name` - محصولات یک دسته
//! - `GET /products/sorted?order=asc|desc` - مرتب بر اساس قیمت
//! - `POST /products` - ساخت محصول (توکن)
//! - `PUT /products/:id` - بروزرسانی (ادمین)
//! - `DELETE /products/:id` - حذف (ادمین)
//! - `POST /categories` - ساخت دسته (ادمین)
//! - `POST /images` - ثبت تصویر (ادمین)
//! - `POST /register` - ثبت‌نام
//! - `POST /login` - ورود
//! - `GET /health` - Health check

mod handlers;
mod middleware;
mod extractors;

pub use handlers::*;
pub use middleware::*;
pub use extractors::*;

use axum::{
    routing::{get, post},
    Router,
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::time::Duration;

use crate::{
    config::Config,
    database::Database,
    services::AppState,
};

/// سقف زمانی کل یک request HTTP
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی برنامه
///
/// # Arguments
/// * `db` - اتصال دیتابیس
/// * `config` - تنظیمات برنامه
pub fn create_router(db: Database, config: Config) -> Router {
    router_with_state(AppState::new(db, config))
}

/// ساخت Router با یک AppState آماده (برای تست‌ها هم استفاده میشه)
///
/// # مفاهیم:
/// - `.route()`: اضافه کردن route
/// - `.merge()`: ترکیب router‌ها
/// - `.layer()`: اضافه کردن middleware
/// - `.with_state()`: تزریق state
pub fn router_with_state(state: AppState) -> Router {
    Router::new()
        .merge(product_routes())
        .merge(catalog_routes())
        .merge(auth_routes())

        // Health check
        .route("/health", get(handlers::health::health_check))

        // Middleware‌های سفارشی
        // timeout داخلی‌ترین لایه هست تا پاسخ 504 هم header‌ها رو بگیره
        .layer(axum_middleware::from_fn_with_state(REQUEST_TIMEOUT, request_deadline))
        .layer(axum_middleware::from_fn(security_headers))
        .layer(axum_middleware::from_fn(request_timing))
        .layer(axum_middleware::from_fn(request_id))

        // Middleware‌های عمومی
        .layer(
            ServiceBuilder::new()
                // Tracing - لاگ کردن request‌ها
                .layer(TraceLayer::new_for_http())

                // Compression - فشرده‌سازی response
                .layer(CompressionLayer::new())

                // CORS - اجازه دسترسی از دامنه‌های دیگه
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any)
                )
        )

        // تزریق state به همه handlers
        .with_state(state)
}

/// Route‌های محصولات
///
/// `/products/sorted` یک مسیر ثابت هست و بر `/products/:id` اولویت داره
fn product_routes() -> Router<AppState> {
    use handlers::product;

    Router::new()
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route("/products/sorted", get(product::list_products_sorted))
        .route(
            "/products/category/:category_name",
            get(product::list_products_by_category),
        )
        .route(
            "/products/:id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
}

/// Route‌های دسته و تصویر
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(handlers::catalog::create_category))
        .route("/images", post(handlers::catalog::create_image))
}

/// Route‌های احراز هویت
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

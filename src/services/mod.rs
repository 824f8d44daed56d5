//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! این ماژول منطق کسب‌وکار برنامه رو پیاده‌سازی میکنه.
//!
//! ## لایه‌بندی معماری
//!
//! ```text
//! ┌─────────────────┐
//! │    API Layer    │  <-- HTTP handlers (axum)
//! ├─────────────────┤
//! │  Service Layer  │  <-- Business logic + timeout (اینجا!)
//! ├─────────────────┤
//! │ Repository Layer│  <-- Data access
//! ├─────────────────┤
//! │    Database     │  <-- SQLite
//! └─────────────────┘
//! ```
//!
//! ## مفاهیم Rust:
//! - **Dependency Injection**: تزریق وابستگی‌ها
//! - **Arc<T>**: اشتراک امن بین threads
//! - **Generic Futures**: پیچیدن هر future در timeout

mod product_service;
mod catalog_service;
mod auth_service;

pub use product_service::*;
pub use catalog_service::*;
pub use auth_service::*;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::{
    config::Config,
    database::{CatalogRepository, Database, ProductRepository, UserRepository},
    error::{AppError, Result},
};

/// سقف زمانی هر فراخوانی سرویس
pub const CALL_TIMEOUT: Duration = Duration::from_secs(5);

// =====================================
// Application State
// =====================================
/// وضعیت برنامه که بین همه handlers اشتراک‌گذاری میشه
///
/// # مفاهیم:
/// - `Arc<T>`: Reference counting برای thread-safe sharing
/// - `Clone`: فقط Arc‌ها clone میشن، نه داده
/// - این state با `Router::with_state` به handlers میرسه
#[derive(Clone)]
pub struct AppState {
    /// سرویس محصولات
    pub product_service: Arc<ProductService>,

    /// سرویس دسته‌ها و تصاویر
    pub catalog_service: Arc<CatalogService>,

    /// سرویس احراز هویت
    pub auth_service: Arc<AuthService>,

    /// برای health check
    pub db: Database,
}

impl AppState {
    /// ساخت AppState جدید
    ///
    /// # مفاهیم:
    /// - Factory method: ساخت object پیچیده
    /// - Dependency Injection: همه وابستگی‌ها تزریق میشن
    #[must_use]
    pub fn new(db: Database, config: Config) -> Self {
        let product_service = Arc::new(ProductService::new(
            ProductRepository::new(db.clone()),
        ));

        let catalog_service = Arc::new(CatalogService::new(
            CatalogRepository::new(db.clone()),
        ));

        let auth_service = Arc::new(AuthService::new(
            UserRepository::new(db.clone()),
            Arc::new(config),
        ));

        Self {
            product_service,
            catalog_service,
            auth_service,
            db,
        }
    }
}

// =====================================
// Service Trait
// =====================================
/// Trait پایه برای services
///
/// # مفاهیم:
/// - marker trait: همه services باید Send + Sync باشن
pub trait Service: Send + Sync {}

// =====================================
// Deadline
// =====================================
/// اجرای یک عملیات با سقف زمانی `CALL_TIMEOUT`
///
/// اگه زمان تموم بشه future drop میشه و `AppError::Timeout` برمیگرده.
/// هیچ cleanup یا retry انجام نمیشه.
///
/// ```rust,ignore
/// with_deadline("list_products", self.repo.find_all()).await
/// ```
pub async fn with_deadline<T, F>(operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    with_timeout(CALL_TIMEOUT, operation, fut).await
}

/// مثل `with_deadline` با مدت دلخواه
pub async fn with_timeout<T, F>(limit: Duration, operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, timeout_ms = limit.as_millis() as u64, "Service call timed out");
            Err(AppError::Timeout(operation.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let value = with_deadline("fast", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let result: Result<()> = with_timeout(Duration::from_millis(10), "slow", async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(AppError::Timeout(ref op)) if op == "slow"));
    }

    #[tokio::test]
    async fn test_inner_error_is_kept() {
        let result: Result<()> = with_deadline("failing", async {
            Err(AppError::NotFound("product not found".to_string()))
        })
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

//! # ماژول دیتابیس (Database Layer)
//!
//! این ماژول لایه ارتباط با دیتابیس رو مدیریت میکنه.
//!
//! ## مفاهیم Rust:
//! - **Arc<T>**: Reference Counting برای اشتراک داده بین threads
//! - **async/await**: برنامه‌نویسی غیرهمزمان
//! - **Traits**: تعریف interface
//! - **async_trait**: پشتیبانی از async در traits
//!
//! ## الگوهای طراحی:
//! - Repository Pattern: جداسازی لایه داده از منطق
//! - Connection Pool: مدیریت اتصالات دیتابیس

mod repository;

pub use repository::*;

use std::sync::Arc;
use std::time::Duration;
use sqlx::{sqlite::{SqlitePool, SqlitePoolOptions}, migrate::Migrator};
use tracing::info;
use crate::error::Result;

// مسیر migration‌ها
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

// =====================================
// Pool Settings
// =====================================
/// حداکثر اتصال همزمان
pub const MAX_CONNECTIONS: u32 = 10;

/// حداقل اتصال باز
pub const MIN_CONNECTIONS: u32 = 1;

/// حداکثر عمر هر اتصال
pub const MAX_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// حداکثر زمان بیکاری هر اتصال
pub const MAX_CONNECTION_IDLE: Duration = Duration::from_secs(30 * 60);

/// حداکثر زمان انتظار برای گرفتن اتصال از pool
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

// =====================================
// Database Connection
// =====================================
/// اتصال به دیتابیس با Connection Pool
///
/// # مفاهیم:
/// - `#[derive(Clone)]`: Clone implementation
/// - `Arc<SqlitePool>`: Reference counting برای thread-safe sharing
///
/// ## چرا Arc؟
/// - هر clone فقط counter رو زیاد میکنه، داده کپی نمیشه
/// - وقتی همه reference‌ها drop شن، pool بسته میشه
#[derive(Debug, Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// اتصال به دیتابیس
    ///
    /// # Arguments
    /// * `database_url` - آدرس دیتابیس (مثلا `sqlite://data/restaurant.db?mode=rwc`)
    ///
    /// # Errors
    /// خطا برمیگردونه اگه اتصال موفق نباشه
    pub async fn connect(database_url: impl AsRef<str>) -> Result<Self> {
        let url = database_url.as_ref();

        // ساخت پوشه فایل دیتابیس اگه وجود نداره
        if let Some(path) = url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if let Some(parent) = std::path::Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // اتصال‌ها قبل از تحویل ping میشن (health check)
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .min_connections(MIN_CONNECTIONS)
            .max_lifetime(MAX_CONNECTION_LIFETIME)
            .idle_timeout(MAX_CONNECTION_IDLE)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .test_before_acquire(true)
            .connect(url)
            .await?;

        info!(max_connections = MAX_CONNECTIONS, "Database pool ready");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// ساخت دیتابیس in-memory (برای تست‌ها و اجرای موقت)
    ///
    /// فقط یک اتصال داره که هیچوقت بسته نمیشه، چون با بسته شدنش داده‌ها از بین میرن.
    ///
    /// # Errors
    /// خطا برمیگردونه اگه اتصال یا migration موفق نباشه
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self {
            pool: Arc::new(pool),
        };

        db.migrate().await?;
        Ok(db)
    }

    /// اجرای migration‌ها
    ///
    /// Migration‌ها تغییرات schema دیتابیس رو مدیریت میکنن
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&*self.pool).await?;
        Ok(())
    }

    /// دسترسی به pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// بررسی سلامت دیتابیس
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// بستن همه اتصال‌ها (هنگام خاموش شدن سرور)
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// =====================================
// Transaction Support
// =====================================
/// # مفاهیم:
/// - Transactions: گروه‌بندی عملیات، همه موفق یا همه لغو
/// - RAII: وقتی Transaction drop بشه، rollback میشه مگه commit شده باشه
impl Database {
    /// شروع یک تراکنش
    ///
    /// # مثال
    /// ```rust,ignore
    /// let mut tx = db.begin().await?;
    /// // عملیات‌ها
    /// tx.commit().await?;
    /// ```
    pub async fn begin(&self) -> Result<sqlx::Transaction<'static, sqlx::Sqlite>> {
        Ok(self.pool.begin().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::in_memory().await.unwrap();
        db.health_check().await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' ORDER BY name"
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        for table in ["categories", "images", "products", "users"] {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let db = Database::in_memory().await.unwrap();

        let result = sqlx::query(
            "INSERT INTO products (id, name, description, price, category_id, image_id) VALUES ('p', 'x', '', 1, 'nope', 'nope')"
        )
        .execute(db.pool())
        .await;

        assert!(result.is_err());
    }
}

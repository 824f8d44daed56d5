//! # Restaurant Backend Library
//!
//! این کتابخانه backend یک اپلیکیشن سفارش غذای رستوران رو ارائه میده:
//! مدیریت محصولات، دسته‌بندی‌ها و تصاویر، ثبت‌نام و ورود کاربران با JWT.
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs          # نقطه ورود کتابخانه - اینجا!
//! ├── main.rs         # نقطه ورود باینری
//! ├── config/         # مدیریت تنظیمات
//! ├── error/          # تعریف خطاها
//! ├── database/       # لایه دیتابیس (pool + repositories)
//! ├── models/         # مدل‌های داده
//! ├── services/       # منطق کسب‌وکار + timeout هر فراخوانی
//! ├── api/            # لایه HTTP
//! └── utils/          # توابع کمکی (hash رمز، اعتبارسنجی)
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust,no_run
//! use restaurant_backend::{api::create_router, config::Config, database::Database};
//!
//! #[tokio::main]
//! async fn main() -> restaurant_backend::Result<()> {
//!     let config = Config::load()?;
//!     let db = Database::connect(&config.database_url).await?;
//!     db.migrate().await?;
//!     let _app = create_router(db, config);
//!     Ok(())
//! }
//! ```

// =====================================
// Module Declarations
// =====================================

/// ماژول مدیریت تنظیمات برنامه
pub mod config;

/// ماژول تعریف و مدیریت خطاها
pub mod error;

/// ماژول ارتباط با دیتابیس
pub mod database;

/// ماژول مدل‌های داده (Domain Models)
pub mod models;

/// ماژول سرویس‌ها (Business Logic)
pub mod services;

/// ماژول API و HTTP Handlers
pub mod api;

/// ماژول توابع کمکی
pub mod utils;

// =====================================
// Re-exports
// =====================================
// کاربر به جای `restaurant_backend::error::Result` میتونه بنویسه `restaurant_backend::Result`

/// نتیجه عملیات با خطای سفارشی ما
pub use error::Result;

/// خطای اصلی برنامه
pub use error::AppError;

// =====================================
// Prelude Module
// =====================================
/// ماژول prelude برای import راحت‌تر آیتم‌های پرکاربرد
///
/// کاربرد:
/// ```rust
/// use restaurant_backend::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::Database;
    pub use crate::error::{AppError, Result};
    pub use crate::models::*;
    pub use crate::services::*;
}

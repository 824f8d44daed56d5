//! # ماژول مدل‌ها (Domain Models)
//!
//! این ماژول مدل‌های داده برنامه رو تعریف میکنه.
//!
//! ## مفاهیم Rust:
//! - **Structs**: ساختار داده
//! - **Enums**: نوع‌های شمارشی
//! - **FromRow**: تبدیل از ردیف دیتابیس
//! - **Serialize/Deserialize**: تبدیل JSON
//! - **Validation**: اعتبارسنجی داده
//!
//! ## تفاوت انواع مدل:
//! - **Entity**: داده‌ای که در دیتابیس ذخیره میشه (`Product`, `User`, ...)
//! - **DTO (Data Transfer Object)**: برای ارسال/دریافت از API

mod product;
mod user;
mod dto;

// Re-export همه مدل‌ها
pub use product::*;
pub use user::*;
pub use dto::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =====================================
// Sort Order
// =====================================
/// ترتیب مرتب‌سازی
///
/// # مثال
/// ```rust
/// use restaurant_backend::models::SortOrder;
///
/// let order: SortOrder = "desc".parse().unwrap();
/// assert_eq!(order.as_sql(), "DESC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// تبدیل به SQL
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(crate::error::AppError::BadRequest(
                "invalid sort order".to_string()
            )),
        }
    }
}

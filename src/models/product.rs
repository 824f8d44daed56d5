//! # مدل محصول، دسته‌بندی و تصویر
//!
//! Entity و DTO‌های منوی رستوران

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// =====================================
// Entities
// =====================================
/// Entity محصول
///
/// # مفاهیم:
/// - `#[derive(FromRow)]`: تبدیل خودکار از ردیف دیتابیس
/// - شناسه‌ها به صورت TEXT (UUID) ذخیره میشن
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,

    /// قیمت به واحد پول خرد (عدد صحیح)
    pub price: i64,

    pub category_id: String,
    pub image_id: String,
}

/// Entity دسته‌بندی
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Entity تصویر
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Image {
    pub id: String,
    pub url: String,
}

// =====================================
// API Request DTOs
// =====================================
/// درخواست ساخت محصول
///
/// # مفاهیم:
/// - `#[derive(Validate)]`: اعتبارسنجی خودکار
/// - UUID‌های نامعتبر همون موقع deserialize رد میشن
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "description is too long"))]
    pub description: String,

    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,

    pub category_id: Uuid,
    pub image_id: Uuid,
}

/// درخواست بروزرسانی جزئی محصول
///
/// هر فیلد `Option` هست: `None` یعنی "تغییر نده".
/// برخلاف مقادیر sentinel، `Some(0)` برای قیمت یعنی واقعا صفر.
///
/// ```json
/// { "price": 0 }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "description is too long"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,

    pub category_id: Option<Uuid>,
    pub image_id: Option<Uuid>,
}

impl UpdateProductRequest {
    /// آیا هیچ فیلدی برای تغییر نیومده؟
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category_id.is_none()
            && self.image_id.is_none()
    }
}

/// درخواست ساخت دسته‌بندی
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
}

/// درخواست ثبت تصویر
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateImageRequest {
    #[validate(length(min = 1, message = "url is required"))]
    pub url: String,
}

/// پارامترهای query برای `GET /products/sorted`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortParams {
    /// `asc` یا `desc`؛ پیش‌فرض صعودی
    #[serde(default)]
    pub order: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_zero_from_missing() {
        let zero: UpdateProductRequest = serde_json::from_str(r#"{"price": 0}"#).unwrap();
        assert_eq!(zero.price, Some(0));
        assert!(!zero.is_empty());

        let missing: UpdateProductRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.price, None);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateProductRequest {
            name: String::new(),
            description: String::new(),
            price: -1,
            category_id: Uuid::new_v4(),
            image_id: Uuid::new_v4(),
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_invalid_uuid_is_rejected_on_deserialize() {
        let raw = r#"{"name":"Soup","price":5,"category_id":"nope","image_id":"nope"}"#;
        assert!(serde_json::from_str::<CreateProductRequest>(raw).is_err());
    }
}

//! # سرویس محصولات
//!
//! منطق کسب‌وکار مربوط به منوی رستوران
//!
//! ## مفاهیم Rust:
//! - Business Logic: قوانین برنامه اینجا پیاده‌سازی میشن
//! - Separation of Concerns: جداسازی از لایه داده
//! - هر متد عمومی داخل `with_deadline` اجرا میشه

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    database::{ProductRepository, Repository},
    error::{OptionExt, Result},
    models::{CreateProductRequest, Product, SortOrder, UpdateProductRequest},
    utils,
};

use super::{with_deadline, Service};

// =====================================
// Product Service
// =====================================
/// سرویس مدیریت محصولات
///
/// # مسئولیت‌ها:
/// - ساخت، بروزرسانی و حذف محصول
/// - لیست کامل، فیلتر بر اساس دسته و مرتب‌سازی بر اساس قیمت
#[derive(Debug, Clone)]
pub struct ProductService {
    repo: ProductRepository,
}

impl Service for ProductService {}

impl ProductService {
    /// ساخت سرویس جدید
    #[must_use]
    pub fn new(repo: ProductRepository) -> Self {
        Self { repo }
    }

    /// ساخت محصول جدید
    ///
    /// # Errors
    /// - `Validation`: فیلدهای نامعتبر
    /// - `NotFound`: دسته یا تصویر وجود نداره
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateProductRequest) -> Result<String> {
        request.validate()?;

        let product = Product {
            id: utils::new_id(),
            name: request.name,
            description: request.description,
            price: request.price,
            category_id: request.category_id.to_string(),
            image_id: request.image_id.to_string(),
        };

        let id = with_deadline("create_product", self.repo.create(&product)).await?;

        info!(product_id = %id, "Created new product");
        Ok(id)
    }

    /// همه محصولات
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>> {
        with_deadline("list_products", self.repo.find_all()).await
    }

    /// یک محصول با شناسه
    ///
    /// # Errors
    /// `NotFound("product not found")`
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Product> {
        let id = id.to_string();

        with_deadline("get_product", self.repo.find_by_id(&id))
            .await?
            .ok_or_not_found("product not found")
    }

    /// محصولات یک دسته با نام دسته
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category_name: &str) -> Result<Vec<Product>> {
        with_deadline(
            "list_products_by_category",
            self.repo.find_by_category_name(category_name),
        )
        .await
    }

    /// همه محصولات مرتب شده بر اساس قیمت
    #[instrument(skip(self))]
    pub async fn list_sorted_by_price(&self, order: SortOrder) -> Result<Vec<Product>> {
        with_deadline("list_products_sorted", self.repo.find_sorted_by_price(order)).await
    }

    /// بروزرسانی جزئی
    ///
    /// بروزرسانی بدون فیلد هم اگه محصول وجود داشته باشه موفقه؛
    /// در اون حالت هیچ UPDATE ای اجرا نمیشه
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: Uuid, changes: UpdateProductRequest) -> Result<Product> {
        changes.validate()?;

        if changes.is_empty() {
            return self.get(id).await;
        }

        let id = id.to_string();

        let product = with_deadline("update_product", self.repo.update(&id, &changes)).await?;

        info!(product_id = %product.id, "Updated product");
        Ok(product)
    }

    /// حذف محصول
    ///
    /// حذف شناسه‌ای که وجود نداره خطا نیست؛ خروجی میگه ردیفی حذف شد یا نه
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let id = id.to_string();
        let deleted = with_deadline("delete_product", self.repo.delete(&id)).await?;

        if deleted {
            info!(product_id = %id, "Deleted product");
        }

        Ok(deleted)
    }

    /// parse کردن ترتیب مرتب‌سازی از query
    ///
    /// # Errors
    /// `BadRequest("invalid sort order")`
    pub fn parse_order(raw: Option<&str>) -> Result<SortOrder> {
        match raw {
            None => Ok(SortOrder::default()),
            Some(value) if value.trim().is_empty() => Ok(SortOrder::default()),
            Some(value) => value.trim().parse::<SortOrder>(),
        }
    }
}

//! # سرویس دسته‌بندی و تصویر
//!
//! فقط ساخت پشتیبانی میشه؛ ویرایش، حذف و لیست نداریم.

use tracing::{info, instrument};
use validator::Validate;

use crate::{
    database::CatalogRepository,
    error::{AppError, Result},
    models::{Category, CreateCategoryRequest, CreateImageRequest, Image},
    utils,
};

use super::{with_deadline, Service};

/// سرویس دسته‌ها و تصاویر
#[derive(Debug, Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl Service for CatalogService {}

impl CatalogService {
    #[must_use]
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    /// ساخت دسته‌بندی جدید
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<String> {
        request.validate()?;

        let category = Category {
            id: utils::new_id(),
            name: request.name.trim().to_string(),
        };

        let id = with_deadline("create_category", self.repo.create_category(&category)).await?;

        info!(category_id = %id, "Created new category");
        Ok(id)
    }

    /// ثبت تصویر جدید
    ///
    /// # Errors
    /// `BadRequest("invalid image URL")` اگه آدرس http/https مطلق نباشه
    #[instrument(skip(self, request))]
    pub async fn create_image(&self, request: CreateImageRequest) -> Result<String> {
        request.validate()?;

        let url = request.url.trim();
        if !utils::is_valid_image_url(url) {
            return Err(AppError::BadRequest("invalid image URL".to_string()));
        }

        let image = Image {
            id: utils::new_id(),
            url: url.to_string(),
        };

        let id = with_deadline("create_image", self.repo.create_image(&image)).await?;

        info!(image_id = %id, "Created new image");
        Ok(id)
    }
}

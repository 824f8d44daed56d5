//! # Repository Pattern
//!
//! این فایل الگوی Repository رو پیاده‌سازی میکنه.
//!
//! ## Repository Pattern چیه؟
//! یه لایه انتزاعی بین منطق برنامه و دیتابیس.
//! - منطق برنامه نمیدونه داده کجا ذخیره میشه
//! - تست کردن راحت‌تر میشه
//!
//! ## مفاهیم Rust:
//! - **Traits**: تعریف interface
//! - **async_trait**: امکان async در traits
//! - **Associated Types**: نوع‌های مرتبط با trait
//! - **Transactions**: چک کردن ارجاع‌ها و نوشتن در یک واحد اتمیک

use async_trait::async_trait;
use sqlx::SqliteConnection;
use tracing::info;

use super::Database;
use crate::error::{AppError, Result};
use crate::models::{Category, CreateUser, Image, Product, SortOrder, UpdateProductRequest, User};

// =====================================
// Base Repository Trait
// =====================================
/// Trait پایه برای Repository‌ها
///
/// # مفاهیم:
/// - `#[async_trait]`: macro برای async در traits
/// - `Send + Sync`: امکان ارسال بین threads
/// - Associated Types: `type Entity` و `type Id`
#[async_trait]
pub trait Repository: Send + Sync {
    /// نوع Entity که این repository باهاش کار میکنه
    type Entity: Send + Sync;

    /// نوع شناسه (ID)
    type Id: Send + Sync + ?Sized;

    /// پیدا کردن با ID
    async fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>>;

    /// پیدا کردن همه
    async fn find_all(&self) -> Result<Vec<Self::Entity>>;

    /// حذف با ID
    ///
    /// `true` اگه رکوردی حذف شد
    async fn delete(&self, id: &Self::Id) -> Result<bool>;
}

// =====================================
// Reference Checks
// =====================================
const CATEGORY_EXISTS: &str = "SELECT COUNT(*) FROM categories WHERE id = ?";
const IMAGE_EXISTS: &str = "SELECT COUNT(*) FROM images WHERE id = ?";
const PRODUCT_EXISTS: &str = "SELECT COUNT(*) FROM products WHERE id = ?";

/// بررسی وجود یک رکورد داخل تراکنش جاری
///
/// اگه رکورد نباشه `NotFound` با پیام `missing` برمیگرده
async fn ensure_exists(
    conn: &mut SqliteConnection,
    query: &'static str,
    id: &str,
    missing: &str,
) -> Result<()> {
    let count = sqlx::query_scalar::<_, i64>(query)
        .bind(id)
        .fetch_one(conn)
        .await?;

    if count == 0 {
        return Err(AppError::NotFound(missing.to_string()));
    }

    Ok(())
}

// =====================================
// Product Repository
// =====================================
const PRODUCT_COLUMNS: &str = "id, name, description, price, category_id, image_id";

/// Repository برای مدیریت محصولات
///
/// # مفاهیم:
/// - Struct با dependency injection
/// - Database به عنوان dependency تزریق میشه
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: Database,
}

impl ProductRepository {
    /// ساخت repository جدید
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// ایجاد محصول جدید
    ///
    /// وجود دسته و تصویر و خود insert در یک تراکنش انجام میشن،
    /// پس حذف همزمان دسته نمیتونه محصول یتیم بسازه.
    ///
    /// # Errors
    /// - `NotFound("category not found")` یا `NotFound("image not found")`
    /// - خطای دیتابیس
    pub async fn create(&self, product: &Product) -> Result<String> {
        let mut tx = self.db.begin().await?;

        ensure_exists(&mut tx, CATEGORY_EXISTS, &product.category_id, "category not found").await?;
        ensure_exists(&mut tx, IMAGE_EXISTS, &product.image_id, "image not found").await?;

        info!(product_id = %product.id, "Inserting product into database");

        let id = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO products (id, name, description, price, category_id, image_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category_id)
        .bind(&product.image_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    /// محصولات یک دسته (بر اساس نام دسته)
    ///
    /// # مفاهیم:
    /// - JOIN: اتصال دو جدول
    /// - چند دسته با یک نام همه شامل میشن
    pub async fn find_by_category_name(&self, category_name: &str) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.category_id, p.image_id
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE c.name = ?
            ORDER BY p.name, p.id
            "#
        )
        .bind(category_name)
        .fetch_all(self.db.pool())
        .await?;

        Ok(products)
    }

    /// همه محصولات مرتب شده بر اساس قیمت
    ///
    /// قیمت‌های برابر با شناسه مرتب میشن تا ترتیب پایدار باشه
    pub async fn find_sorted_by_price(&self, order: SortOrder) -> Result<Vec<Product>> {
        // as_sql فقط ASC یا DESC برمیگردونه، پس format امن هست
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY price {}, id",
            order.as_sql()
        );

        let products = sqlx::query_as::<_, Product>(&query)
            .fetch_all(self.db.pool())
            .await?;

        Ok(products)
    }

    /// بروزرسانی جزئی محصول
    ///
    /// # مفاهیم:
    /// - `COALESCE(?, col)`: اگه مقدار NULL بود، مقدار قبلی میمونه
    /// - همه چک‌ها و UPDATE در یک تراکنش
    ///
    /// # Errors
    /// - `NotFound("product not found")` اگه محصول نباشه
    /// - `NotFound("category not found")` / `NotFound("image not found")` برای ارجاع نامعتبر
    pub async fn update(&self, id: &str, changes: &UpdateProductRequest) -> Result<Product> {
        let mut tx = self.db.begin().await?;

        ensure_exists(&mut tx, PRODUCT_EXISTS, id, "product not found").await?;

        let category_id = changes.category_id.map(|c| c.to_string());
        let image_id = changes.image_id.map(|i| i.to_string());

        if let Some(category_id) = &category_id {
            ensure_exists(&mut tx, CATEGORY_EXISTS, category_id, "category not found").await?;
        }
        if let Some(image_id) = &image_id {
            ensure_exists(&mut tx, IMAGE_EXISTS, image_id, "image not found").await?;
        }

        let query = format!(
            r#"
            UPDATE products SET
                name        = COALESCE(?, name),
                description = COALESCE(?, description),
                price       = COALESCE(?, price),
                category_id = COALESCE(?, category_id),
                image_id    = COALESCE(?, image_id)
            WHERE id = ?
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let product = sqlx::query_as::<_, Product>(&query)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(changes.price)
            .bind(category_id)
            .bind(image_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(product)
    }
}

#[async_trait]
impl Repository for ProductRepository {
    type Entity = Product;
    type Id = str;

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?");

        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(product)
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id");

        let products = sqlx::query_as::<_, Product>(&query)
            .fetch_all(self.db.pool())
            .await?;

        Ok(products)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =====================================
// Catalog Repository (Categories & Images)
// =====================================
/// Repository برای دسته‌بندی‌ها و تصاویر
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: Database,
}

impl CatalogRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// ایجاد دسته‌بندی
    pub async fn create_category(&self, category: &Category) -> Result<String> {
        info!(category_id = %category.id, "Inserting category into database");

        let id = sqlx::query_scalar::<_, String>(
            "INSERT INTO categories (id, name) VALUES (?, ?) RETURNING id"
        )
        .bind(&category.id)
        .bind(&category.name)
        .fetch_one(self.db.pool())
        .await?;

        Ok(id)
    }

    /// ثبت تصویر
    pub async fn create_image(&self, image: &Image) -> Result<String> {
        info!(image_id = %image.id, "Inserting image into database");

        let id = sqlx::query_scalar::<_, String>(
            "INSERT INTO images (id, url) VALUES (?, ?) RETURNING id"
        )
        .bind(&image.id)
        .bind(&image.url)
        .fetch_one(self.db.pool())
        .await?;

        Ok(id)
    }
}

// =====================================
// User Repository
// =====================================
/// Repository برای مدیریت کاربران
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// پیدا کردن با نام کاربری
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role
            FROM users
            WHERE username = ?
            "#
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    /// ایجاد کاربر جدید
    ///
    /// نام کاربری تکراری به خطای UNIQUE دیتابیس میخوره
    pub async fn create(&self, create_user: &CreateUser) -> Result<String> {
        info!(user_id = %create_user.id, "Inserting user into database");

        let id = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO users (id, username, password_hash, role)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#
        )
        .bind(&create_user.id)
        .bind(&create_user.username)
        .bind(&create_user.password_hash)
        .bind(&create_user.role)
        .fetch_one(self.db.pool())
        .await?;

        Ok(id)
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::new_id;

    async fn seeded() -> (ProductRepository, CatalogRepository, Category, Image) {
        let db = Database::in_memory().await.unwrap();
        let catalog = CatalogRepository::new(db.clone());

        let category = Category { id: new_id(), name: "Soups".to_string() };
        let image = Image { id: new_id(), url: "https://cdn.example.com/soup.png".to_string() };
        catalog.create_category(&category).await.unwrap();
        catalog.create_image(&image).await.unwrap();

        (ProductRepository::new(db), catalog, category, image)
    }

    fn product(name: &str, price: i64, category: &Category, image: &Image) -> Product {
        Product {
            id: new_id(),
            name: name.to_string(),
            description: String::new(),
            price,
            category_id: category.id.clone(),
            image_id: image.id.clone(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (repo, _, category, image) = seeded().await;

        let soup = product("Tomato soup", 450, &category, &image);
        let id = repo.create(&soup).await.unwrap();

        assert_eq!(id, soup.id);
        assert_eq!(repo.find_by_id(&id).await.unwrap(), Some(soup));
    }

    #[tokio::test]
    async fn test_create_with_missing_category() {
        let (repo, _, _, image) = seeded().await;
        let ghost = Category { id: new_id(), name: "Ghost".to_string() };

        let err = repo.create(&product("Orphan", 1, &ghost, &image)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "category not found"));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_missing_fields() {
        let (repo, _, category, image) = seeded().await;
        let soup = product("Tomato soup", 450, &category, &image);
        repo.create(&soup).await.unwrap();

        let changes = UpdateProductRequest { price: Some(0), ..Default::default() };
        let updated = repo.update(&soup.id, &changes).await.unwrap();

        assert_eq!(updated.price, 0);
        assert_eq!(updated.name, soup.name);
        assert_eq!(updated.category_id, soup.category_id);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let (repo, _, _, _) = seeded().await;
        let err = repo.update(&new_id(), &UpdateProductRequest::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "product not found"));
    }

    #[tokio::test]
    async fn test_delete_reports_rows() {
        let (repo, _, category, image) = seeded().await;
        let soup = product("Tomato soup", 450, &category, &image);
        repo.create(&soup).await.unwrap();

        assert!(repo.delete(&soup.id).await.unwrap());
        assert!(!repo.delete(&soup.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_fails() {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db);

        let user = CreateUser {
            id: new_id(),
            username: "chef".to_string(),
            password_hash: "hash".to_string(),
            role: "admin".to_string(),
        };
        users.create(&user).await.unwrap();

        let again = CreateUser { id: new_id(), ..user };
        assert!(users.create(&again).await.is_err());

        let found = users.find_by_username("chef").await.unwrap().unwrap();
        assert_eq!(found.role, "admin");
    }
}

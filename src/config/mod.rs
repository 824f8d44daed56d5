//! # ماژول تنظیمات (Configuration)
//!
//! این ماژول مسئول خوندن و مدیریت تنظیمات برنامه هست.
//!
//! ## ترتیب لایه‌ها
//!
//! 1. مقادیر پیش‌فرض (`Config::default()`)
//! 2. فایل YAML اختیاری (`CONFIG_PATH` یا `config.yaml`)
//! 3. متغیرهای محیطی (`HOST`, `PORT`, `DATABASE_URL`, ...)
//!
//! هر لایه روی لایه قبلی override میشه.
//!
//! ## مفاهیم Rust:
//! - **Derive Macros**: تولید خودکار کد با `#[derive(...)]`
//! - **Default Trait**: مقادیر پیش‌فرض
//! - **Serde**: سریالایز/دسریالایز
//! - **Builder Pattern**: ساخت تدریجی آبجکت

use std::env;
use serde::{Deserialize, Serialize};
use crate::error::{AppError, Result};

/// مسیر پیش‌فرض فایل تنظیمات
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// سقف مدت اعتبار توکن (یک سال)
pub const MAX_JWT_EXPIRATION_HOURS: u64 = 8760;

/// secret پیش‌فرض که در production مجاز نیست
const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// تنظیمات اصلی برنامه
///
/// # مثال
/// ```rust
/// use restaurant_backend::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.port, 8080);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// آدرس هاست سرور
    pub host: String,

    /// پورت سرور
    pub port: u16,

    /// آدرس اتصال به دیتابیس
    pub database_url: String,

    /// کلید مخفی JWT
    pub jwt_secret: String,

    /// مدت اعتبار توکن JWT (ساعت)
    pub jwt_expiration_hours: u64,

    /// سطح لاگ (debug, info, warn, error)
    pub log_level: String,

    /// محیط اجرا (development, production)
    pub environment: Environment,
}

/// محیط اجرای برنامه
///
/// # مفاهیم:
/// - `#[serde(from = "String")]`: دسریالایز از طریق `From<String>`،
///   پس `"PROD"` هم به `Production` تبدیل میشه
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Environment {
    /// محیط توسعه
    #[default]
    Development,

    /// محیط تست
    Testing,

    /// محیط تولید
    Production,
}

impl Environment {
    /// آیا در محیط تولید هستیم؟
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// تبدیل String به Environment
impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "sqlite://data/restaurant.db?mode=rwc".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiration_hours: 24,
            log_level: "info".to_string(),
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// لود کردن تنظیمات از فایل YAML و متغیرهای محیطی
    ///
    /// مسیر فایل از `CONFIG_PATH` خونده میشه. نبودن فایل خطا نیست.
    ///
    /// # Errors
    /// خطا برمیگردونه اگه فایل YAML خراب باشه یا مقداری قابل parse نباشه
    pub fn load() -> Result<Self> {
        let path = env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// لود کردن تنظیمات با مسیر فایل مشخص
    ///
    /// # Errors
    /// مثل [`Config::load`]
    pub fn load_from(path: &str) -> Result<Self> {
        let defaults = Config::default();

        let settings = ::config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiration_hours", defaults.jwt_expiration_hours as i64)?
            .set_default("log_level", defaults.log_level)?
            .set_default("environment", "development")?
            // `required(false)`: اگه فایل نبود، فقط از env و default استفاده میشه
            .add_source(::config::File::with_name(path).required(false))
            .add_source(::config::Environment::default().try_parsing(true))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// اعتبارسنجی تنظیمات
    ///
    /// # Errors
    /// - secret پیش‌فرض در production
    /// - پورت صفر
    /// - مدت اعتبار توکن صفر یا بیشتر از [`MAX_JWT_EXPIRATION_HOURS`]
    pub fn validate(&self) -> Result<()> {
        if self.environment.is_production() && self.jwt_secret == DEFAULT_JWT_SECRET {
            return Err(AppError::Config(
                "JWT_SECRET must be changed in production".to_string()
            ));
        }

        if self.port == 0 {
            return Err(AppError::Config("PORT cannot be 0".to_string()));
        }

        if self.jwt_expiration_hours == 0 {
            return Err(AppError::Config(
                "JWT_EXPIRATION_HOURS must be positive".to_string()
            ));
        }

        if self.jwt_expiration_hours > MAX_JWT_EXPIRATION_HOURS {
            return Err(AppError::Config(format!(
                "JWT_EXPIRATION_HOURS cannot exceed {MAX_JWT_EXPIRATION_HOURS}"
            )));
        }

        Ok(())
    }

    /// آدرس کامل سرور
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// فیلتر پیش‌فرض tracing بر اساس `log_level`
    ///
    /// سطح‌های ناشناخته به `info` برمیگردن
    #[must_use]
    pub fn log_filter(&self) -> String {
        let level = match self.log_level.to_lowercase().as_str() {
            "debug" => "debug",
            "warn" => "warn",
            "error" => "error",
            _ => "info",
        };
        format!("restaurant_backend={level},tower_http={level}")
    }
}

// =====================================
// Builder Pattern
// =====================================
/// ساخت Config با Builder Pattern
///
/// # مثال
/// ```rust
/// use restaurant_backend::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .port(9090)
///     .jwt_secret("test-secret")
///     .build();
/// assert_eq!(config.port, 9090);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// ساخت builder جدید
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// تنظیم پورت
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// تنظیم هاست
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// تنظیم database_url
    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    /// تنظیم jwt_secret
    #[must_use]
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    /// تنظیم مدت اعتبار توکن
    #[must_use]
    pub fn jwt_expiration_hours(mut self, hours: u64) -> Self {
        self.config.jwt_expiration_hours = hours;
        self
    }

    /// تنظیم سطح لاگ
    #[must_use]
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// تنظیم محیط
    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.config.environment = env;
        self
    }

    /// ساخت Config نهایی
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}

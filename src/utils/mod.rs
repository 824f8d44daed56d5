//! # ماژول توابع کمکی (Utilities)
//!
//! این ماژول توابع و ثابت‌های کمکی رو ارائه میده:
//! هش کردن رمز عبور، اعتبارسنجی نام کاربری و آدرس تصویر، و parse کردن شناسه‌ها.
//!
//! ## مفاهیم Rust:
//! - **static**: متغیرهای با عمر 'static
//! - **once_cell**: مقداردهی اولیه تنبل
//! - **Regex**: عبارات منظم

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::error::{AppError, Result};

// =====================================
// Constants
// =====================================
/// حداقل طول نام کاربری
pub const MIN_USERNAME_LENGTH: usize = 3;

/// حداکثر طول نام کاربری
pub const MAX_USERNAME_LENGTH: usize = 50;

/// حداکثر طول آدرس تصویر
pub const MAX_IMAGE_URL_LENGTH: usize = 2048;

/// نقشی که دسترسی ادمین میده
pub const ADMIN_ROLE: &str = "admin";

// =====================================
// Lazy Statics (Regex patterns)
// =====================================
/// الگوی معتبر برای نام کاربری: حروف، اعداد، `_`، `-` و `.`
pub static VALID_USERNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("Invalid regex pattern")
});

// =====================================
// Password Hashing
// =====================================
/// هش کردن رمز عبور با Argon2
///
/// # مفاهیم:
/// - Salt تصادفی برای هر رمز (`OsRng`)
/// - خروجی در فرمت PHC ذخیره میشه، پس الگوریتم و salt داخلش هست
///
/// # Errors
/// خطا برمیگردونه اگه hashing fail بشه
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();

    Ok(hash)
}

/// بررسی رمز عبور در برابر هش ذخیره شده
///
/// هش خراب هم `false` حساب میشه تا مسیر خطا با رمز اشتباه یکی باشه.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// =====================================
// Validation Functions
// =====================================
/// اعتبارسنجی نام کاربری
///
/// # مثال
/// ```rust
/// use restaurant_backend::utils::is_valid_username;
///
/// assert!(is_valid_username("chef_anna"));
/// assert!(!is_valid_username("chef anna"));
/// ```
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();

    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return false;
    }

    VALID_USERNAME.is_match(username)
}

/// اعتبارسنجی آدرس تصویر
///
/// فقط آدرس‌های مطلق http و https قبول میشن
#[must_use]
pub fn is_valid_image_url(url_str: &str) -> bool {
    if url_str.len() > MAX_IMAGE_URL_LENGTH {
        return false;
    }

    match url::Url::parse(url_str) {
        Ok(url) => {
            let scheme = url.scheme();
            (scheme == "http" || scheme == "https") && url.host().is_some()
        }
        Err(_) => false,
    }
}

/// parse کردن شناسه از مسیر URL
///
/// # Errors
/// `BadRequest` با پیام ثابت `message` اگه شناسه UUID معتبر نباشه
pub fn parse_id(raw: &str, message: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(message.to_string()))
}

/// تولید شناسه جدید برای رکوردها
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =====================================
// String Utilities
// =====================================
/// Mask کردن بخشی از متن (برای لاگ‌ها)
///
/// # مثال
/// ```rust
/// use restaurant_backend::utils::mask_string;
///
/// assert_eq!(mask_string("secret123", 3), "sec***");
/// ```
#[must_use]
pub fn mask_string(text: &str, visible_chars: usize) -> String {
    if text.chars().count() <= visible_chars {
        return "*".repeat(text.chars().count());
    }

    let visible: String = text.chars().take(visible_chars).collect();
    format!("{}***", visible)
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("s3cret-pass").unwrap();

        assert_ne!(hash, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong-pass", &hash));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_with_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_valid_username() {
        assert!(is_valid_username("admin"));
        assert!(is_valid_username("chef.anna-2"));
        assert!(!is_valid_username("ab")); // too short
        assert!(!is_valid_username("with space"));
        assert!(!is_valid_username("bad@name"));
    }

    #[test]
    fn test_valid_image_url() {
        assert!(is_valid_image_url("https://cdn.example.com/pizza.png"));
        assert!(is_valid_image_url("http://localhost:9000/img/1.jpg"));
        assert!(!is_valid_image_url("ftp://example.com/pizza.png"));
        assert!(!is_valid_image_url("pizza.png"));
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "invalid product ID").unwrap(), id);

        let err = parse_id("42", "invalid product ID").unwrap_err();
        assert_eq!(err.public_message(), "invalid product ID");
    }

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string("secret123", 3), "sec***");
        assert_eq!(mask_string("ab", 5), "**");
    }
}

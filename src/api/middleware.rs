//! # Middleware
//!
//! Middleware‌های سفارشی برای پردازش request/response
//!
//! ## مفاهیم:
//! - **Middleware**: کد که قبل/بعد از handler اجرا میشه
//! - **Tower**: کتابخانه middleware در اکوسیستم Rust
//! - **`axum::middleware::from_fn`**: ساخت middleware از یک async fn

use axum::{
    body::Body,
    extract::State,
    http::{header::HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::error::AppError;

/// نام header شناسه request
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =====================================
// Request Timing Middleware
// =====================================
/// اندازه‌گیری زمان پردازش request
///
/// # مفاهیم:
/// - `Next`: ادامه زنجیره middleware
/// - `Instant`: اندازه‌گیری زمان
///
/// # استفاده:
/// ```rust,ignore
/// let app = Router::new()
///     .layer(axum::middleware::from_fn(request_timing));
/// ```
pub async fn request_timing(
    request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

// =====================================
// Request Deadline Middleware
// =====================================
/// سقف زمانی کل request
///
/// بعد از `limit` پردازش handler رها میشه و کلاینت
/// `504 {"error": "request timed out"}` میگیره
///
/// # استفاده:
/// ```rust,ignore
/// let app = Router::new()
///     .layer(axum::middleware::from_fn_with_state(REQUEST_TIMEOUT, request_deadline));
/// ```
pub async fn request_deadline(
    State(limit): State<Duration>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let uri = request.uri().clone();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(uri = %uri, limit_ms = %limit.as_millis(), "Request deadline exceeded");
            AppError::Timeout(uri.to_string()).into_response()
        }
    }
}

// =====================================
// Request ID Middleware
// =====================================
/// اضافه کردن Request ID به هر request
///
/// # مفاهیم:
/// - اگه کلاینت ID فرستاده باشه همون استفاده میشه، وگرنه `nanoid`
/// - ID هم به request و هم به response اضافه میشه
pub async fn request_id(
    mut request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| nanoid::nanoid!(12));

    let header_value = HeaderValue::from_str(&request_id).ok();

    if let Some(value) = &header_value {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(request).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

// =====================================
// Security Headers Middleware
// =====================================
/// اضافه کردن header‌های امنیتی
///
/// # Headers:
/// - X-Content-Type-Options
/// - X-Frame-Options
/// - Referrer-Policy
pub async fn security_headers(
    request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // جلوگیری از MIME sniffing
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );

    // جلوگیری از clickjacking
    headers.insert(
        "x-frame-options",
        HeaderValue::from_static("DENY"),
    );

    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

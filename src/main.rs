//! # Restaurant Backend - نقطه ورود برنامه
//!
//! این فایل نقطه شروع اجرای برنامه است.
//! در Rust، `main.rs` برای باینری‌ها و `lib.rs` برای کتابخانه‌ها استفاده میشه.
//!
//! ## مفاهیم Rust در این فایل:
//! - `async fn main()`: تابع اصلی غیرهمزمان با tokio
//! - `Result<T, E>`: مدیریت خطا
//! - `?` operator: انتشار خطا به بالا
//! - Graceful shutdown با `tokio::signal`

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use restaurant_backend::{
    api::create_router,
    config::Config,
    database::Database,
    error::{AppError, Result},
};

/// نقطه ورود اصلی برنامه
///
/// # Errors
/// خطا برمیگردونه اگه:
/// - تنظیمات لود یا اعتبارسنجی نشن
/// - دیتابیس متصل نشه
/// - سرور استارت نشه
#[tokio::main]
async fn main() -> Result<()> {
    // لود کردن متغیرهای محیطی از فایل .env
    // اگه فایل نباشه اوکیه
    dotenvy::dotenv().ok();

    // لود کردن تنظیمات: پیش‌فرض‌ها ← فایل YAML ← متغیرهای محیطی
    let config = Config::load()?;

    // لاگینگ بعد از config راه میفته چون سطح لاگ از config میاد
    init_tracing(&config);

    info!("🚀 Starting restaurant backend...");
    config.validate()?;
    info!(environment = ?config.environment, "✅ Configuration loaded successfully");

    // اتصال به دیتابیس
    let database = Database::connect(&config.database_url).await?;
    info!("✅ Database connected successfully");

    // اجرای migration‌ها
    database.migrate().await?;
    info!("✅ Database migrations applied");

    // ساخت router با تمام route‌ها و middleware‌ها
    let app = create_router(database.clone(), config.clone());

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("🌐 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    database.close().await;
    info!("👋 Server stopped");

    Ok(())
}

/// راه‌اندازی سیستم tracing برای لاگینگ
///
/// # مفاهیم:
/// - Structured Logging: لاگ‌ها به صورت ساختاریافته ذخیره میشن
/// - EnvFilter: `RUST_LOG` اگه باشه برنده‌ست، وگرنه `log_level` از config
/// - در production خروجی JSON، در development فرمت خوانا
fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.environment.is_production() {
        registry
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)           // نمایش نام ماژول
                    .with_thread_ids(true)       // نمایش ID ترد
                    .with_line_number(true)      // نمایش شماره خط
                    .pretty(),
            )
            .init();
    }
}

/// منتظر Ctrl+C میمونه تا سرور با آرامش خاموش بشه
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received");
}

//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::analytics::ClickManager;
use crate::api::services::{
    AppStartTime, analytics_routes, default_not_found, health_routes, redirect_routes,
    shorten_routes,
};
use crate::cache;
use crate::config::StaticConfig;
use crate::runtime::shutdown;
use crate::services::{AnalyticsService, LinkService};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 服务器启动上下文
struct StartupContext {
    storage: Arc<SeaOrmStorage>,
    link_service: Arc<LinkService>,
    analytics_service: Arc<AnalyticsService>,
    click_manager: Arc<ClickManager>,
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、点击缓冲和业务服务
async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    // 初始化点击缓冲
    let click_manager = Arc::new(ClickManager::new(
        storage.as_click_sink(),
        Duration::from_secs(config.clicks.flush_interval_secs),
        config.clicks.max_buffered,
    ));

    // 启动后台刷新任务，并保持强引用以确保任务不会被过早销毁
    let mgr_for_task = click_manager.clone();
    tokio::spawn(async move {
        mgr_for_task.start_background_task().await;
    });
    debug!(
        "ClickManager initialized with {} seconds and {} max clicks before flush",
        config.clicks.flush_interval_secs, config.clicks.max_buffered
    );

    // 初始化短链缓存
    let cache = cache::from_config(&config.cache);

    // Create LinkService for unified link management
    let link_service = Arc::new(LinkService::new(storage.clone(), cache));

    // Create AnalyticsService for analytics queries
    let analytics_service = Arc::new(AnalyticsService::new(storage.clone()));

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        link_service,
        analytics_service,
        click_manager,
    })
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Prepares server components (storage, cache, click buffer, routes)
/// 3. Configures and starts the HTTP server
/// 4. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: StaticConfig) -> Result<()> {
    // Record application start time
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    // Prepare server startup (storage, cache, services)
    let startup = prepare_server_startup(&config).await.map_err(|e| {
        tracing::error!("Server startup failed: {}", e);
        e
    })?;

    let storage = startup.storage.clone();
    let link_service = startup.link_service.clone();
    let analytics_service = startup.analytics_service.clone();
    let click_manager = startup.click_manager.clone();

    let cpu_count = config.server.cpu_count.min(32);
    warn!("Using {} CPU cores for the server", cpu_count);

    // Clone manager reference before it moves into the HttpServer closure
    let manager_for_shutdown = click_manager.clone();

    // Configure HTTP server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::Data::new(analytics_service.clone()))
            .app_data(web::Data::new(click_manager.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .service(shorten_routes())
            .service(analytics_routes())
            .service(health_routes())
            .service(redirect_routes())
            .default_service(web::route().to(default_not_found))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = shutdown::listen_for_shutdown(&manager_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}

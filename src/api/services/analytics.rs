//! Analytics API 端点
//!
//! 返回全量点击统计摘要：按天点击数、Top 来源、总点击数。

use actix_web::{Responder, guard, web};
use std::sync::Arc;
use tracing::error;

use super::helpers::{error_from_snaplink, success_response};
use crate::services::AnalyticsService;

/// GET /analytics 处理器
pub async fn get_summary(service: web::Data<Arc<AnalyticsService>>) -> impl Responder {
    match service.get_summary().await {
        Ok(summary) => success_response(summary),
        Err(e) => {
            error!("Analytics API: failed to aggregate clicks: {}", e);
            error_from_snaplink(&e)
        }
    }
}

/// Analytics 路由配置
pub fn analytics_routes() -> actix_web::Scope {
    web::scope("/analytics")
        .guard(guard::Any(guard::Get()).or(guard::Head()))
        .route("", web::get().to(get_summary))
        .route("", web::head().to(get_summary))
}

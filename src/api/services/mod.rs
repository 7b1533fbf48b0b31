use actix_web::HttpResponse;

use crate::errors::SnaplinkError;

pub mod analytics;
pub mod health;
mod helpers;
pub mod redirect;
pub mod shorten;

pub use analytics::analytics_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use shorten::{ShortenService, shorten_routes};

/// 兜底路由：未匹配任何已注册路径时返回 404
pub async fn default_not_found() -> HttpResponse {
    let err = SnaplinkError::route_not_found("no handler for the requested path");
    helpers::error_from_snaplink(&err)
}

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::analytics::{ClickEvent, ClickManager};
use crate::errors::SnaplinkError;
use crate::services::LinkService;
use crate::storage::ShortLink;
use crate::utils::is_valid_slug;

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        link_service: web::Data<Arc<LinkService>>,
        click_manager: web::Data<Arc<ClickManager>>,
    ) -> impl Responder {
        let slug = path.into_inner();

        if !is_valid_slug(&slug) {
            // 非法短码，直接 404（不查缓存、不查存储）
            trace!("Invalid slug rejected: {}", &slug);
            return Self::not_found_response(&SnaplinkError::not_found("Not Found"));
        }

        match link_service.resolve(&slug).await {
            Some(link) => {
                Self::record_click(&slug, &req, &click_manager);
                Self::finish_redirect(link)
            }
            None => {
                debug!("Redirect slug not found: {}", &slug);
                Self::not_found_response(&SnaplinkError::not_found("Not Found"))
            }
        }
    }

    /// 未知短码的 404 从领域错误映射状态码，负缓存头照常携带
    #[inline]
    fn not_found_response(err: &SnaplinkError) -> HttpResponse {
        HttpResponse::build(err.http_status())
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body(err.message().to_owned())
    }

    /// 记录点击事件（缓冲写入，不阻塞重定向）
    #[inline]
    fn record_click(slug: &str, req: &HttpRequest, manager: &ClickManager) {
        let referrer = req
            .headers()
            .get("referer")
            .and_then(|h| h.to_str().ok())
            .map(String::from);
        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(String::from);

        manager.record(ClickEvent::new(slug.to_string()).with_request_info(referrer, user_agent));
    }

    fn finish_redirect(link: ShortLink) -> HttpResponse {
        HttpResponse::build(StatusCode::FOUND)
            .insert_header(("Location", link.target_url))
            .finish()
    }

    /// 短码路径上非 GET/HEAD 的访问按未知路由处理
    async fn not_found_fallback() -> HttpResponse {
        Self::not_found_response(&SnaplinkError::route_not_found("Not Found"))
    }
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("").service(
        web::resource("/{slug}")
            .route(web::get().to(RedirectService::handle_redirect))
            .route(web::head().to(RedirectService::handle_redirect))
            .default_service(web::route().to(RedirectService::not_found_fallback)),
    )
}

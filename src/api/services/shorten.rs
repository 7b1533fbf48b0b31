use actix_web::{Responder, guard, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, trace};

use super::helpers::{error_from_snaplink, success_response};
use crate::services::{CreateLinkRequest, LinkService};

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    pub url: String,
    pub custom_slug: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortenResponse {
    pub slug: String,
}

pub struct ShortenService;

impl ShortenService {
    pub async fn post_shorten(
        payload: web::Json<ShortenRequest>,
        link_service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let req = payload.into_inner();
        trace!("Shorten API: create request for target: {}", req.url);

        match link_service
            .create_link(CreateLinkRequest {
                target_url: req.url,
                custom_slug: req.custom_slug,
            })
            .await
        {
            Ok(result) => {
                info!(
                    "Shorten API: issued slug '{}' ({})",
                    result.link.slug,
                    if result.generated_slug {
                        "generated"
                    } else {
                        "custom"
                    }
                );
                success_response(ShortenResponse {
                    slug: result.link.slug,
                })
            }
            Err(e) => {
                error!("Shorten API: create failed: {}", e);
                error_from_snaplink(&e)
            }
        }
    }
}

/// Shorten 路由配置
///
/// Scope 带 POST guard，其它方法交还路由器按未知路径兜底。
pub fn shorten_routes() -> actix_web::Scope {
    web::scope("/shorten")
        .guard(guard::Post())
        .route("", web::post().to(ShortenService::post_shorten))
}

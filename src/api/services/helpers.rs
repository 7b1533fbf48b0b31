//! API 响应帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::SnaplinkError;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, data)
}

/// 从 SnaplinkError 构建错误响应（自动映射 HTTP 状态码，携带错误代码）
pub fn error_from_snaplink(err: &SnaplinkError) -> HttpResponse {
    json_response(
        err.http_status(),
        serde_json::json!({ "code": err.code(), "error": err.message() }),
    )
}

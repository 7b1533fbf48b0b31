use std::fmt;

#[derive(Debug, Clone)]
pub enum SnaplinkError {
    Validation(String),
    NotFound(String),
    RouteNotFound(String),
    Storage(String),
    Config(String),
}

impl SnaplinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SnaplinkError::Validation(_) => "E001",
            SnaplinkError::NotFound(_) => "E002",
            SnaplinkError::RouteNotFound(_) => "E003",
            SnaplinkError::Storage(_) => "E004",
            SnaplinkError::Config(_) => "E005",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SnaplinkError::Validation(_) => "Validation Error",
            SnaplinkError::NotFound(_) => "Resource Not Found",
            SnaplinkError::RouteNotFound(_) => "Route Not Found",
            SnaplinkError::Storage(_) => "Storage Error",
            SnaplinkError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SnaplinkError::Validation(msg) => msg,
            SnaplinkError::NotFound(msg) => msg,
            SnaplinkError::RouteNotFound(msg) => msg,
            SnaplinkError::Storage(msg) => msg,
            SnaplinkError::Config(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            SnaplinkError::Validation(_) => StatusCode::BAD_REQUEST,
            SnaplinkError::NotFound(_) | SnaplinkError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            SnaplinkError::Storage(_) | SnaplinkError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端提示）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SnaplinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SnaplinkError {}

// 便捷的构造函数
impl SnaplinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::NotFound(msg.into())
    }

    pub fn route_not_found<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::RouteNotFound(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Storage(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SnaplinkError>;
